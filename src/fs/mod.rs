//! Filesystem module - audio file type detection and validation.

pub mod detection;

pub use detection::{detect_mime, validate_audio_file, MAX_FILE_SIZE};
