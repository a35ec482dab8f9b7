//! Oscilloscope layout drawn straight from the time-domain buffer.

use crate::render::commands::{DrawCommand, Glow, Paint, PathSegment, Point, Stroke};
use crate::render::surface::CanvasGeometry;
use crate::render::theme::ColorTheme;

/// Alpha of the mirrored trace.
const MIRROR_ALPHA: f32 = 0.4;

/// Trace points for `samples`, mirrored around the horizontal center when
/// `invert` is set.
///
/// Samples are unsigned bytes centred on 128; amplitude is scaled by
/// `sensitivity * volume` without any normalisation.
pub fn trace(
    samples: &[u8],
    geometry: &CanvasGeometry,
    sensitivity: f32,
    volume: f32,
    invert: bool,
) -> Vec<Point> {
    if samples.is_empty() {
        return Vec::new();
    }

    let center_y = geometry.height / 2.0;
    let slice_width = geometry.width / samples.len() as f32;
    let gain = center_y * sensitivity * volume;
    let sign = if invert { -1.0 } else { 1.0 };

    samples
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let v = s as f32 / 128.0 - 1.0;
            Point::new(i as f32 * slice_width, center_y + sign * v * gain)
        })
        .collect()
}

fn polyline(points: &[Point]) -> Vec<PathSegment> {
    points
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            if i == 0 {
                PathSegment::MoveTo(p)
            } else {
                PathSegment::LineTo(p)
            }
        })
        .collect()
}

pub fn render(
    samples: &[u8],
    theme: &ColorTheme,
    geometry: &CanvasGeometry,
    sensitivity: f32,
    volume: f32,
) -> Vec<DrawCommand> {
    if samples.is_empty() {
        return Vec::new();
    }

    let sensitivity = if sensitivity.is_finite() { sensitivity.max(0.0) } else { 0.0 };
    let gradient = Paint::HorizontalGradient(theme.gradient());

    let primary = trace(samples, geometry, sensitivity, volume, false);
    let mirrored = trace(samples, geometry, sensitivity, volume, true);

    vec![
        DrawCommand::Path {
            segments: polyline(&mirrored),
            closed: false,
            stroke: Stroke {
                paint: gradient.clone(),
                width: 1.5,
                alpha: MIRROR_ALPHA,
            },
            glow: None,
        },
        DrawCommand::Path {
            segments: polyline(&primary),
            closed: false,
            stroke: Stroke {
                paint: gradient,
                width: 2.0,
                alpha: 1.0,
            },
            glow: Some(Glow {
                color: theme.glow,
                blur: 10.0,
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::theme::theme;

    #[test]
    fn test_silence_is_flat_line() {
        let geometry = CanvasGeometry::from_client(100, 80, 1.0);
        let points = trace(&[128; 10], &geometry, 1.0, 1.0, false);
        assert_eq!(points.len(), 10);
        assert!(points.iter().all(|p| p.y == 40.0));
        assert_eq!(points[1].x, 10.0);
    }

    #[test]
    fn test_amplitude_scaling_and_mirror() {
        let geometry = CanvasGeometry::from_client(100, 80, 1.0);
        // 192/128 - 1 = 0.5 -> 40 + 0.5 * 40 * 1.5 * 0.5 = 55
        let primary = trace(&[192], &geometry, 1.5, 0.5, false);
        let mirrored = trace(&[192], &geometry, 1.5, 0.5, true);
        assert!((primary[0].y - 55.0).abs() < 1e-4);
        assert!((mirrored[0].y - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_render_two_gradient_traces() {
        let geometry = CanvasGeometry::from_client(100, 80, 1.0);
        let commands = render(&[100, 150, 200], theme("sunset"), &geometry, 1.0, 0.7);
        assert_eq!(commands.len(), 2);

        let alphas: Vec<f32> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Path { stroke, .. } => {
                    assert!(matches!(stroke.paint, Paint::HorizontalGradient(_)));
                    Some(stroke.alpha)
                }
                _ => None,
            })
            .collect();
        assert_eq!(alphas, vec![MIRROR_ALPHA, 1.0]);
    }

    #[test]
    fn test_empty_samples_draw_nothing() {
        let geometry = CanvasGeometry::from_client(100, 80, 1.0);
        assert!(render(&[], theme("neon"), &geometry, 1.0, 1.0).is_empty());
    }
}
