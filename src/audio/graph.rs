//! Connection of a media element's source to the analyser and output.

use tracing::debug;

use super::analyser::AnalyserNode;
use super::media::MediaElement;
use super::sample_capture::SampleTap;
use crate::error::Result;

/// Source node wrapping a media element's sample tap.
pub struct MediaSourceNode {
    element_id: u64,
    tap: SampleTap,
}

impl MediaSourceNode {
    /// Wrap `media`. Fails if another source node already holds it.
    pub fn new(media: &MediaElement) -> Result<Self> {
        media.claim_source()?;
        Ok(Self {
            element_id: media.id(),
            tap: media.sample_tap(),
        })
    }

    pub fn element_id(&self) -> u64 {
        self.element_id
    }
}

/// Live source -> analyser -> destination chain. Playback to the
/// destination is the element's own sink, so the graph only owns the
/// analysis side.
pub struct AudioGraph {
    source: MediaSourceNode,
    analyser: AnalyserNode,
    connected: bool,
}

impl AudioGraph {
    pub fn connect(source: MediaSourceNode, analyser: AnalyserNode) -> Self {
        debug!(
            element = source.element_id(),
            fft_size = analyser.fft_size(),
            "audio graph connected"
        );
        Self {
            source,
            analyser,
            connected: true,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Write both byte snapshots. With `live` set the newest samples are
    /// pulled from the source; otherwise the analyser sees silence and the
    /// spectrum decays.
    pub fn sample_into(&mut self, frequency: &mut [u8], time: &mut [u8], live: bool) {
        if !self.connected {
            return;
        }
        if live {
            self.analyser.capture(&self.source.tap);
        } else {
            self.analyser.process_silence();
        }
        self.analyser.get_byte_frequency_data(frequency);
        self.analyser.get_byte_time_domain_data(time);
    }

    pub fn disconnect(&mut self) {
        if self.connected {
            debug!(element = self.source.element_id(), "audio graph disconnected");
            self.connected = false;
            self.analyser.reset();
        }
    }
}
