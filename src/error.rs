//! Error types for the analysis and rendering core.

use thiserror::Error;

/// Errors surfaced by the visualizer core.
///
/// Only lifecycle violations and file validation failures are errors. Empty
/// buffers, a suspended context and non-finite playback times are ordinary
/// states handled where they occur.
#[derive(Error, Debug)]
pub enum VizError {
    /// A second source node was requested for a media element that already has one.
    #[error("media element is already connected to an audio graph")]
    GraphAlreadyConnected,

    /// FFT size is not a power of two within the analyser's supported range.
    #[error("invalid FFT size {0}: expected a power of two between 32 and 32768")]
    InvalidFftSize(usize),

    /// The processing context was closed and can no longer be resumed.
    #[error("audio context is closed")]
    ContextClosed,

    /// The selected file is not recognised as audio.
    #[error("unsupported media type: {mime}")]
    UnsupportedMedia { mime: String },

    /// The selected file exceeds the accepted size ceiling.
    #[error("file is {size} bytes, larger than the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for visualizer core operations
pub type Result<T> = std::result::Result<T, VizError>;
