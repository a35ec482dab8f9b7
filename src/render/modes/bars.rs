//! Linear bar layout.

use std::f32::consts::PI;

use crate::render::commands::{DrawCommand, Glow};
use crate::render::surface::CanvasGeometry;
use crate::render::theme::{color_for, ColorTheme};

/// Upper bound on the number of bars.
pub const MAX_BARS: usize = 128;
/// Horizontal space taken by one bar including its gap, in CSS pixels.
pub const BAR_SLOT: f32 = 8.0;
const BAR_WIDTH: f32 = 6.0;
const BAR_GAP: f32 = BAR_SLOT - BAR_WIDTH;
const MIN_BAR_HEIGHT: f32 = 4.0;

/// Number of bars that fit the canvas width.
pub fn bar_count(geometry: &CanvasGeometry) -> usize {
    MAX_BARS.min((geometry.width / BAR_SLOT).floor().max(0.0) as usize)
}

/// Lay out shaped bar intensities as bottom-anchored rounded bars.
///
/// Bars are tallest in the middle of the canvas and shorter towards the
/// edges (`0.7 + 0.6*sin(position*pi)`).
pub fn render(
    values: &[f32],
    theme: &ColorTheme,
    geometry: &CanvasGeometry,
    volume: f32,
) -> Vec<DrawCommand> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let total = n as f32 * BAR_SLOT - BAR_GAP;
    let start_x = (geometry.width - total) / 2.0;
    let mut commands = Vec::with_capacity(n * 2);

    for (i, &value) in values.iter().enumerate() {
        let position = i as f32 / n as f32;
        let position_effect = 0.7 + 0.6 * (position * PI).sin();
        let height =
            (value * geometry.height * 0.8 * volume * position_effect).max(MIN_BAR_HEIGHT);
        let x = start_x + i as f32 * BAR_SLOT;
        let y = geometry.height - height;

        commands.push(DrawCommand::Bar {
            x,
            y,
            width: BAR_WIDTH,
            height,
            radius: BAR_WIDTH / 2.0,
            fill: color_for(theme, position, value),
            glow: (value > 0.0).then(|| Glow {
                color: theme.glow,
                blur: value * 20.0,
            }),
        });

        if value > 0.1 {
            commands.push(DrawCommand::Rect {
                x,
                y,
                width: BAR_WIDTH,
                height: 2.0,
                fill: theme.highlight.fade(value),
            });
        }
    }

    commands
}
