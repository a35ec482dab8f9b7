//! Idle animation shown while there is no audio to draw.

use crate::render::commands::{DrawCommand, Glow, Point};
use crate::render::surface::CanvasGeometry;
use crate::render::theme::{dynamic_color, Color};

pub const HINT: &str = "No audio yet - press space to play";

const GLOW_RINGS: usize = 4;

/// Radius of the breathing core at `elapsed` seconds.
pub fn breathing_radius(geometry: &CanvasGeometry, elapsed: f32) -> f32 {
    let elapsed = if elapsed.is_finite() { elapsed } else { 0.0 };
    geometry.width.min(geometry.height) * 0.12 * (1.0 + 0.25 * (elapsed * 2.0).sin())
}

pub fn render(geometry: &CanvasGeometry, elapsed: f32) -> Vec<DrawCommand> {
    let elapsed = if elapsed.is_finite() { elapsed } else { 0.0 };
    let center = Point::new(geometry.width / 2.0, geometry.height / 2.0);
    let radius = breathing_radius(geometry, elapsed);
    let breath = ((elapsed * 2.0).sin() + 1.0) / 2.0;
    let color = dynamic_color(breath, 200.0, 280.0);

    let mut commands = Vec::with_capacity(GLOW_RINGS + 2);
    for k in (1..=GLOW_RINGS).rev() {
        commands.push(DrawCommand::Circle {
            center,
            radius: radius * (1.0 + k as f32 * 0.35),
            fill: Some(color.fade(0.08 * (GLOW_RINGS + 1 - k) as f32)),
            stroke: None,
            glow: None,
        });
    }
    commands.push(DrawCommand::Circle {
        center,
        radius,
        fill: Some(color.fade(0.6)),
        stroke: None,
        glow: Some(Glow {
            color,
            blur: 20.0 + breath * 20.0,
        }),
    });
    commands.push(DrawCommand::Text {
        at: Point::new(center.x, (center.y + radius * 2.6).min(geometry.height - 1.0)),
        text: HINT.to_string(),
        color: Color::Rgba {
            r: 200,
            g: 200,
            b: 220,
            a: 0.8,
        },
    });
    commands
}
