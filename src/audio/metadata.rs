//! Track tag and duration probing using Lofty.

use std::path::Path;

use anyhow::Result;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::Accessor;

/// What the player panel shows about the current track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackInfo {
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Total length in seconds, 0 when unknown.
    pub duration_secs: f64,
}

impl TrackInfo {
    /// Title from tags, falling back to the file stem.
    pub fn display_title(&self, path: &Path) -> String {
        self.title.clone().unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }
}

/// Read tags and properties for `path`. Blocking; call from a background
/// thread.
pub fn probe_track(path: &Path) -> Result<TrackInfo> {
    let tagged_file = Probe::open(path)?.read()?;

    let (title, artist) = tagged_file
        .primary_tag()
        .map(|tag| {
            (
                tag.title().map(|t| t.into_owned()),
                tag.artist().map(|a| a.into_owned()),
            )
        })
        .unwrap_or((None, None));

    Ok(TrackInfo {
        title,
        artist,
        duration_secs: tagged_file.properties().duration().as_secs_f64(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_falls_back_to_stem() {
        let info = TrackInfo::default();
        assert_eq!(info.display_title(Path::new("/music/intro.flac")), "intro");

        let tagged = TrackInfo {
            title: Some("Overture".into()),
            ..TrackInfo::default()
        };
        assert_eq!(tagged.display_title(Path::new("/music/intro.flac")), "Overture");
    }

    #[test]
    fn test_probe_missing_file_fails() {
        assert!(probe_track(Path::new("/nonexistent/track.mp3")).is_err());
    }
}
