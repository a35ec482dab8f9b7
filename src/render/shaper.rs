//! Signal shaping: raw analyser bins to normalized per-element intensities.

use std::f32::consts::PI;

/// Spatial smoothing applied to bar intensities.
pub const BAR_SMOOTHING: f32 = 0.5;
/// Spatial smoothing applied to circular intensities (less smoothing, more responsive).
pub const CIRCULAR_SMOOTHING: f32 = 0.4;

/// Shape a frequency buffer into `n` bar intensities in `[0, 1]`.
///
/// Low indices are weighted quieter than high ones (`0.7 + (i/n)*0.6`) so the
/// bass-heavy left side does not dominate the display.
pub fn shape_bars(freq: &[u8], n: usize, sensitivity: f32) -> Vec<f32> {
    let shaped = shape_windows(freq, n, sensitivity, |i| {
        0.7 + (i as f32 / n as f32) * 0.6
    });
    clamp_unit(smooth(&shaped, BAR_SMOOTHING))
}

/// Shape a frequency buffer into `n` radial intensities in `[0, 1]`.
///
/// The weight is an angular ripple `1 + 0.3*sin(3*angle)`, which gives the
/// ring three lobes instead of a left-to-right ramp.
pub fn shape_circular(freq: &[u8], n: usize, sensitivity: f32) -> Vec<f32> {
    let shaped = shape_windows(freq, n, sensitivity, |i| {
        let angle = 2.0 * PI * i as f32 / n as f32;
        1.0 + 0.3 * (3.0 * angle).sin()
    });
    clamp_unit(smooth(&shaped, CIRCULAR_SMOOTHING))
}

// Rounding in the smoothing blend can land a hair above 1.0.
fn clamp_unit(mut values: Vec<f32>) -> Vec<f32> {
    for v in values.iter_mut() {
        *v = v.clamp(0.0, 1.0);
    }
    values
}

/// Windowed mean of `freq` scaled by `sensitivity` and a per-index weight.
fn shape_windows(freq: &[u8], n: usize, sensitivity: f32, weight: impl Fn(usize) -> f32) -> Vec<f32> {
    if freq.is_empty() || n == 0 {
        return vec![0.0; n];
    }

    // NaN and negative sensitivities collapse to silence
    let sensitivity = if sensitivity.is_finite() { sensitivity.max(0.0) } else { 0.0 };
    let window = (freq.len() / n).max(1);

    (0..n)
        .map(|i| {
            let start = i * window;
            if start >= freq.len() {
                return 0.0;
            }
            let end = (start + window).min(freq.len());
            let slice = &freq[start..end];
            let sum: u32 = slice.iter().map(|&b| b as u32).sum();
            let mean = sum as f32 / slice.len() as f32;

            (mean / 255.0 * sensitivity * weight(i)).clamp(0.0, 1.0)
        })
        .collect()
}

/// Single-pass 3-tap spatial smoothing across neighbouring elements.
///
/// Interior element `i` becomes `v[i]*(1-factor) + avg(v[i-1], v[i+1])*factor`,
/// computed from the original neighbours. Endpoints are left untouched.
/// `factor <= 0` returns the input unchanged and `factor >= 1` flattens the
/// whole array to its mean.
pub fn smooth(values: &[f32], factor: f32) -> Vec<f32> {
    if values.is_empty() || factor.is_nan() || factor <= 0.0 {
        return values.to_vec();
    }

    if factor >= 1.0 {
        let mean = values.iter().sum::<f32>() / values.len() as f32;
        return vec![mean; values.len()];
    }

    let mut out = values.to_vec();
    for i in 1..values.len().saturating_sub(1) {
        let neighbours = (values[i - 1] + values[i + 1]) / 2.0;
        out[i] = values[i] * (1.0 - factor) + neighbours * factor;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input_gives_zeros() {
        for n in 1..20 {
            let bars = shape_bars(&[], n, 1.5);
            assert_eq!(bars.len(), n);
            assert!(bars.iter().all(|&v| v == 0.0));

            let ring = shape_circular(&[], n, 1.2);
            assert_eq!(ring.len(), n);
            assert!(ring.iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_full_scale_bars() {
        let bars = shape_bars(&[255, 255, 255, 255], 2, 1.0);
        assert_eq!(bars.len(), 2);
        assert!((bars[0] - 0.7).abs() < 1e-6, "first bar was {}", bars[0]);
        assert!((bars[1] - 1.0).abs() < 1e-6, "second bar was {}", bars[1]);
    }

    #[test]
    fn test_bars_use_floor_division_windows() {
        // 5 bins into 2 bars: windows [0..2] and [2..4], the last bin is ignored
        let bars = shape_windows(&[255, 255, 0, 0, 255], 2, 1.0, |_| 1.0);
        assert_eq!(bars, vec![1.0, 0.0]);
    }

    #[test]
    fn test_more_bars_than_bins() {
        let bars = shape_windows(&[255, 255], 4, 1.0, |_| 1.0);
        assert_eq!(bars, vec![1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_circular_ripple_weight() {
        // Uniform half-scale input; weights are 1 + 0.3*sin(3*angle)
        let freq = vec![51u8; 64];
        let raw = shape_windows(&freq, 4, 1.0, |i| {
            let angle = 2.0 * PI * i as f32 / 4.0;
            1.0 + 0.3 * (3.0 * angle).sin()
        });
        let base = 51.0 / 255.0;
        assert!((raw[0] - base).abs() < 1e-6);
        // angle = pi/2 -> sin(3pi/2) = -1
        assert!((raw[1] - base * 0.7).abs() < 1e-5);
        // angle = 3pi/2 -> sin(9pi/2) = 1
        assert!((raw[3] - base * 1.3).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_sensitivity_is_silent() {
        let freq = vec![200u8; 32];
        assert!(shape_bars(&freq, 8, f32::NAN).iter().all(|&v| v == 0.0));
        assert!(shape_bars(&freq, 8, -3.0).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_smooth_endpoints_unchanged() {
        let values = [0.1, 0.9, 0.2, 0.8, 0.3];
        let out = smooth(&values, 0.5);
        assert_eq!(out[0], values[0]);
        assert_eq!(out[4], values[4]);
        // interior uses the original neighbours
        assert!((out[1] - (0.9 * 0.5 + 0.15 * 0.5)).abs() < 1e-6);
        assert!((out[2] - (0.2 * 0.5 + 0.85 * 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_smooth_factor_bounds() {
        let values = [0.0, 1.0, 0.5, 0.25];
        assert_eq!(smooth(&values, 0.0), values.to_vec());
        assert_eq!(smooth(&values, -1.0), values.to_vec());

        let flat = smooth(&values, 1.0);
        assert_eq!(flat.len(), values.len());
        assert!(flat.iter().all(|&v| (v - 0.4375).abs() < 1e-6));
    }

    #[test]
    fn test_smooth_short_arrays() {
        assert!(smooth(&[], 0.5).is_empty());
        assert_eq!(smooth(&[0.3], 0.5), vec![0.3]);
        assert_eq!(smooth(&[0.7, 1.0], 0.5), vec![0.7, 1.0]);
    }

    proptest! {
        #[test]
        fn prop_shaped_values_in_unit_range(
            freq in proptest::collection::vec(any::<u8>(), 0..512),
            n in 1usize..160,
            sensitivity in 0.0f32..20.0,
        ) {
            for v in shape_bars(&freq, n, sensitivity) {
                prop_assert!((0.0..=1.0).contains(&v));
            }
            for v in shape_circular(&freq, n, sensitivity) {
                prop_assert!((0.0..=1.0).contains(&v));
            }
        }

        #[test]
        fn prop_smooth_interior_between_value_and_neighbours(
            values in proptest::collection::vec(0.0f32..1.0, 3..64),
            factor in 0.01f32..0.99,
        ) {
            let out = smooth(&values, factor);
            prop_assert_eq!(out.len(), values.len());
            prop_assert_eq!(out[0], values[0]);
            prop_assert_eq!(out[values.len() - 1], values[values.len() - 1]);
            for i in 1..values.len() - 1 {
                let avg = (values[i - 1] + values[i + 1]) / 2.0;
                let lo = values[i].min(avg) - 1e-6;
                let hi = values[i].max(avg) + 1e-6;
                prop_assert!(out[i] >= lo && out[i] <= hi);
                if (values[i] - avg).abs() > 1e-3 {
                    prop_assert!(out[i] != values[i] && out[i] != avg);
                }
            }
        }

        #[test]
        fn prop_full_smoothing_is_mean(values in proptest::collection::vec(0.0f32..1.0, 1..64)) {
            let mean = values.iter().sum::<f32>() / values.len() as f32;
            let out = smooth(&values, 1.0);
            prop_assert_eq!(out.len(), values.len());
            for v in out {
                prop_assert!((v - mean).abs() < 1e-5);
            }
        }
    }
}
