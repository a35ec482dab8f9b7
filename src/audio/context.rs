//! Audio processing context state.

use tracing::debug;

use crate::error::{Result, VizError};

/// Lifecycle of the processing context.
///
/// Contexts start suspended and only run after a user-initiated play, the
/// same way browsers gate autoplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Suspended,
    Running,
    Closed,
}

#[derive(Debug)]
pub struct AudioContext {
    state: ContextState,
}

impl AudioContext {
    pub fn new() -> Self {
        Self {
            state: ContextState::Suspended,
        }
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ContextState::Running
    }

    pub fn resume(&mut self) -> Result<()> {
        match self.state {
            ContextState::Closed => Err(VizError::ContextClosed),
            ContextState::Running => Ok(()),
            ContextState::Suspended => {
                debug!("audio context resumed");
                self.state = ContextState::Running;
                Ok(())
            }
        }
    }

    /// Release the context. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.state != ContextState::Closed {
            debug!("audio context closed");
            self.state = ContextState::Closed;
        }
    }
}

impl Default for AudioContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_lifecycle() {
        let mut ctx = AudioContext::new();
        assert_eq!(ctx.state(), ContextState::Suspended);
        ctx.resume().unwrap();
        assert!(ctx.is_running());
        ctx.close();
        ctx.close();
        assert_eq!(ctx.state(), ContextState::Closed);
        assert!(matches!(ctx.resume(), Err(VizError::ContextClosed)));
    }
}
