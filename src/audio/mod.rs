//! Audio module - playback transport, sample capture and per-frame analysis.

pub mod analyser;
pub mod context;
pub mod driver;
pub mod graph;
pub mod media;
pub mod metadata;
pub mod sample_capture;

// Re-export commonly used types
pub use analyser::{validate_fft_size, AnalyserNode, DEFAULT_FFT_SIZE};
pub use context::{AudioContext, ContextState};
pub use driver::{AnalysisDriver, AnalysisFrame, PlaybackState};
pub use graph::{AudioGraph, MediaSourceNode};
pub use media::{MediaElement, MediaEvent, MediaObserver};
pub use metadata::TrackInfo;
pub use sample_capture::{SampleCapture, SampleTap};
