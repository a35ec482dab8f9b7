//! Per-mode renderers. Each one is a pure function from shaped intensities,
//! a theme and canvas geometry to draw commands.

pub mod bars;
pub mod circular;
pub mod placeholder;
pub mod wave;

use std::{fmt, str::FromStr};

/// Geometric layout drawn each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    #[default]
    Bars,
    Circular,
    Wave,
}

impl DrawMode {
    pub const ALL: [DrawMode; 3] = [DrawMode::Bars, DrawMode::Circular, DrawMode::Wave];

    /// Sensitivity used when the mode is selected.
    pub fn default_sensitivity(self) -> f32 {
        match self {
            DrawMode::Bars => 1.5,
            DrawMode::Circular => 1.2,
            DrawMode::Wave => 1.0,
        }
    }

    pub fn next(self) -> Self {
        match self {
            DrawMode::Bars => DrawMode::Circular,
            DrawMode::Circular => DrawMode::Wave,
            DrawMode::Wave => DrawMode::Bars,
        }
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DrawMode::Bars => "bars",
            DrawMode::Circular => "circular",
            DrawMode::Wave => "wave",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for DrawMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bars" | "bar" => Ok(DrawMode::Bars),
            "circular" | "circle" | "radial" => Ok(DrawMode::Circular),
            "wave" | "oscilloscope" => Ok(DrawMode::Wave),
            other => Err(format!("unknown draw mode '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_round() {
        for mode in DrawMode::ALL {
            assert_eq!(mode.to_string().parse::<DrawMode>(), Ok(mode));
        }
        assert_eq!("Radial".parse::<DrawMode>(), Ok(DrawMode::Circular));
        assert!("spiral".parse::<DrawMode>().is_err());
    }

    #[test]
    fn test_cycle_visits_all_modes() {
        let mut mode = DrawMode::Bars;
        for expected in [DrawMode::Circular, DrawMode::Wave, DrawMode::Bars] {
            mode = mode.next();
            assert_eq!(mode, expected);
        }
    }
}
