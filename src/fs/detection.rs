//! Audio file validation using magic numbers and extension-based fallback.

use std::path::Path;

use infer::{Infer, MatcherType};
use mime_guess::MimeGuess;
use tracing::debug;

use crate::error::{Result, VizError};

/// Largest file accepted for playback (30 MB).
pub const MAX_FILE_SIZE: u64 = 30 * 1024 * 1024;

/// Detect the MIME type of `path`, sniffing content first.
pub fn detect_mime(path: &Path) -> Result<String> {
    if let Some(kind) = Infer::new().get_from_path(path)? {
        // sniffed audio wins; other kinds fall through to the extension so
        // containers like ogg are not misreported as application/*
        if kind.matcher_type() == MatcherType::Audio {
            return Ok(kind.mime_type().to_string());
        }
    }

    Ok(MimeGuess::from_path(path)
        .first_or_octet_stream()
        .to_string())
}

/// Accept `path` only if it is audio and no larger than [`MAX_FILE_SIZE`].
pub fn validate_audio_file(path: &Path) -> Result<String> {
    check_size(std::fs::metadata(path)?.len(), MAX_FILE_SIZE)?;

    let mime = detect_mime(path)?;
    if !mime.starts_with("audio/") {
        return Err(VizError::UnsupportedMedia { mime });
    }
    debug!(path = %path.display(), %mime, "accepted audio file");
    Ok(mime)
}

fn check_size(size: u64, limit: u64) -> Result<()> {
    if size > limit {
        Err(VizError::FileTooLarge { size, limit })
    } else {
        Ok(())
    }
}
