//! Playback time labels.

/// Format seconds as `MM:SS`.
///
/// NaN, infinite and negative inputs (common right after a source swap)
/// format as `00:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Playback progress in `[0, 1]`, zero when either value is unusable.
pub fn progress_ratio(current: f64, duration: f64) -> f64 {
    if !current.is_finite() || !duration.is_finite() || duration <= 0.0 {
        return 0.0;
    }
    (current / duration).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(f64::INFINITY), "00:00");
        assert_eq!(format_time(f64::NEG_INFINITY), "00:00");
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(65.0), "01:05");
        assert_eq!(format_time(59.99), "00:59");
        assert_eq!(format_time(3725.0), "62:05");
        assert_eq!(format_time(-4.0), "00:00");
    }

    #[test]
    fn test_progress_ratio() {
        assert_eq!(progress_ratio(30.0, 120.0), 0.25);
        assert_eq!(progress_ratio(30.0, f64::NAN), 0.0);
        assert_eq!(progress_ratio(f64::INFINITY, 10.0), 0.0);
        assert_eq!(progress_ratio(5.0, 0.0), 0.0);
        assert_eq!(progress_ratio(15.0, 10.0), 1.0);
    }
}
