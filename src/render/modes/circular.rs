//! Circular radial burst layout.

use std::f32::consts::PI;

use crate::render::commands::{DrawCommand, Glow, Paint, PathSegment, Point, Stroke};
use crate::render::surface::CanvasGeometry;
use crate::render::theme::{color_for, ColorTheme};

/// Number of points around the ring.
pub const POINT_COUNT: usize = 64;

/// Radial distance of each ring point from the canvas center.
///
/// The `0.2*sin(3*angle + 2t)` term rotates continuously with wall-clock time
/// so the ring keeps moving even when the input is steady.
pub fn ring_points(
    values: &[f32],
    geometry: &CanvasGeometry,
    volume: f32,
    elapsed: f32,
) -> Vec<Point> {
    let center = Point::new(geometry.width / 2.0, geometry.height / 2.0);
    let base_radius = base_radius(geometry);
    let n = values.len();

    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let angle = 2.0 * PI * i as f32 / n as f32;
            let wave = 0.2 * (3.0 * angle + 2.0 * elapsed).sin();
            let distance = base_radius + (value + wave) * base_radius * 0.8 * volume;
            Point::new(
                center.x + angle.cos() * distance,
                center.y + angle.sin() * distance,
            )
        })
        .collect()
}

pub fn base_radius(geometry: &CanvasGeometry) -> f32 {
    geometry.width.min(geometry.height) * 0.35
}

/// Closed curve through the midpoints of consecutive ring points, using each
/// point as the quadratic control.
pub fn smooth_ring(points: &[Point]) -> Vec<PathSegment> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }

    let mut segments = Vec::with_capacity(n + 1);
    segments.push(PathSegment::MoveTo(points[n - 1].midpoint(points[0])));
    for i in 0..n {
        segments.push(PathSegment::QuadTo {
            control: points[i],
            to: points[i].midpoint(points[(i + 1) % n]),
        });
    }
    segments
}

pub fn render(
    values: &[f32],
    theme: &ColorTheme,
    geometry: &CanvasGeometry,
    volume: f32,
    elapsed: f32,
) -> Vec<DrawCommand> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let center = Point::new(geometry.width / 2.0, geometry.height / 2.0);
    let base = base_radius(geometry);
    let average = values.iter().sum::<f32>() / n as f32;
    let points = ring_points(values, geometry, volume, elapsed);
    let mut commands = Vec::with_capacity(n + 3);

    // spokes sit underneath the ring
    for (i, (&value, &point)) in values.iter().zip(points.iter()).enumerate() {
        commands.push(DrawCommand::Line {
            from: center,
            to: point,
            stroke: Stroke {
                paint: Paint::Solid(color_for(theme, i as f32 / n as f32, value)),
                width: 1.0 + value * 2.0,
                alpha: value,
            },
        });
    }

    let segments = smooth_ring(&points);
    let ring_color = color_for(theme, 0.5, average);
    commands.push(DrawCommand::Path {
        segments: segments.clone(),
        closed: true,
        stroke: Stroke {
            paint: Paint::Solid(ring_color),
            width: 2.0,
            alpha: 1.0,
        },
        glow: None,
    });
    commands.push(DrawCommand::Path {
        segments,
        closed: true,
        stroke: Stroke {
            paint: Paint::Solid(theme.glow),
            width: 8.0,
            alpha: 0.3,
        },
        glow: Some(Glow {
            color: theme.glow,
            blur: 15.0 + average * 25.0,
        }),
    });

    commands.push(DrawCommand::Circle {
        center,
        radius: base * (0.2 + 0.15 * average * volume),
        fill: Some(color_for(theme, average, average)),
        stroke: None,
        glow: Some(Glow {
            color: theme.glow,
            blur: 10.0 + average * 30.0,
        }),
    });

    commands
}
