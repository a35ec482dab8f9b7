//! Executes a recorded frame's draw commands on a braille canvas.

use ratatui::{
    layout::Rect,
    style::{Color as TermColor, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Circle as CanvasCircle, Context, Line as CanvasLine},
        Block, Borders,
    },
    Frame,
};

use crate::render::commands::{flatten, DrawCommand, Point, Stroke};
use crate::render::{CanvasGeometry, Color, FrameBuffer};

/// Canvas pixels covered by one braille dot (cells are 2x4 dots).
const DOT: f64 = 2.0;
/// Samples per quadratic curve when flattening paths
const CURVE_STEPS: usize = 6;

/// Area inside the widget border, the region the canvas geometry describes.
pub fn canvas_area(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

/// Render the visualizer section.
pub fn render_visualizer(f: &mut Frame<'_>, area: Rect, frame: &FrameBuffer, title: &str) {
    let inner = canvas_area(area);
    f.render_widget(Block::default().borders(Borders::ALL).title(title), area);
    f.render_widget(visualizer_canvas(frame, inner), inner);
}

/// Build the canvas widget for `frame`, sized to `area` cells.
pub fn visualizer_canvas(
    frame: &FrameBuffer,
    area: Rect,
) -> Canvas<'_, impl Fn(&mut Context<'_>) + '_> {
    let geometry = *frame.geometry();
    let background = frame
        .commands()
        .iter()
        .find_map(|c| match c {
            DrawCommand::Clear { color } => Some(*color),
            _ => None,
        })
        .unwrap_or(Color::rgb(0, 0, 0));
    let cell_width = if area.width > 0 {
        geometry.width as f64 / area.width as f64
    } else {
        0.0
    };

    Canvas::default()
        .marker(Marker::Braille)
        .background_color(term_color(background, 1.0, background))
        .x_bounds([0.0, geometry.width as f64])
        .y_bounds([0.0, geometry.height as f64])
        .paint(move |ctx| {
            let mut painter = CommandPainter {
                geometry,
                background,
                cell_width,
            };
            for command in frame.commands() {
                painter.execute(ctx, command);
            }
        })
}

/// Composite `color` at `alpha` over `background`.
fn term_color(color: Color, alpha: f32, background: Color) -> TermColor {
    let a = (color.alpha() * alpha).clamp(0.0, 1.0);
    let (r, g, b) = color.to_rgb8();
    let (br, bg, bb) = background.to_rgb8();
    let mix = |fg: u8, bgc: u8| (bgc as f32 + (fg as f32 - bgc as f32) * a).round() as u8;
    TermColor::Rgb(mix(r, br), mix(g, bg), mix(b, bb))
}

struct CommandPainter {
    geometry: CanvasGeometry,
    background: Color,
    cell_width: f64,
}

impl CommandPainter {
    /// Our y grows downwards; the canvas y grows upwards.
    fn flip(&self, y: f32) -> f64 {
        (self.geometry.height - y) as f64
    }

    fn color(&self, color: Color, alpha: f32) -> TermColor {
        term_color(color, alpha, self.background)
    }

    fn execute(&mut self, ctx: &mut Context<'_>, command: &DrawCommand) {
        match command {
            // becomes the canvas background
            DrawCommand::Clear { .. } => {}
            DrawCommand::Bar {
                x,
                y,
                width,
                height,
                fill,
                glow,
                ..
            } => {
                if let Some(glow) = glow {
                    // soft halo above the cap
                    let halo = (glow.blur * 0.5).min(*y);
                    self.fill_rect(ctx, *x, y - halo, *width, halo, glow.color, 0.3);
                }
                self.fill_rect(ctx, *x, *y, *width, *height, *fill, 1.0);
            }
            DrawCommand::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => self.fill_rect(ctx, *x, *y, *width, *height, *fill, 1.0),
            DrawCommand::Path {
                segments,
                closed,
                stroke,
                ..
            } => {
                let mut points = flatten(segments, CURVE_STEPS);
                if *closed {
                    if let Some(&first) = points.first() {
                        points.push(first);
                    }
                }
                for pair in points.windows(2) {
                    self.stroke_segment(ctx, pair[0], pair[1], stroke);
                }
            }
            DrawCommand::Line { from, to, stroke } => self.stroke_segment(ctx, *from, *to, stroke),
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke,
                glow,
            } => {
                let x = center.x as f64;
                let y = self.flip(center.y);
                if let Some(glow) = glow {
                    ctx.draw(&CanvasCircle {
                        x,
                        y,
                        radius: (*radius + glow.blur * 0.5) as f64,
                        color: self.color(glow.color, 0.35),
                    });
                }
                if let Some(fill) = fill {
                    let color = self.color(*fill, 1.0);
                    let mut r = *radius as f64;
                    while r > 0.0 {
                        ctx.draw(&CanvasCircle {
                            x,
                            y,
                            radius: r,
                            color,
                        });
                        r -= DOT * 0.75;
                    }
                }
                if let Some(stroke) = stroke {
                    ctx.draw(&CanvasCircle {
                        x,
                        y,
                        radius: *radius as f64,
                        color: self.color(stroke.paint.color_at(0.0), stroke.alpha),
                    });
                }
            }
            DrawCommand::Text { at, text, color } => {
                let half = text.chars().count() as f64 * self.cell_width / 2.0;
                let x = (at.x as f64 - half).max(0.0);
                ctx.print(
                    x,
                    self.flip(at.y),
                    Line::styled(text.clone(), Style::default().fg(self.color(*color, 1.0))),
                );
            }
        }
    }

    fn fill_rect(
        &self,
        ctx: &mut Context<'_>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Color,
        alpha: f32,
    ) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let color = self.color(fill, alpha);
        let (top, bottom) = (self.flip(y), self.flip(y + height));
        let mut cx = x as f64;
        let right = (x + width) as f64;
        while cx < right {
            ctx.draw(&CanvasLine {
                x1: cx,
                y1: bottom,
                x2: cx,
                y2: top,
                color,
            });
            cx += DOT;
        }
    }

    fn stroke_segment(&self, ctx: &mut Context<'_>, from: Point, to: Point, stroke: &Stroke) {
        let t = if self.geometry.width > 0.0 {
            from.midpoint(to).x / self.geometry.width
        } else {
            0.0
        };
        let color = self.color(stroke.paint.color_at(t), stroke.alpha);

        // wide strokes get a second pass one dot lower
        let passes: &[f64] = if stroke.width >= 4.0 { &[0.0, -DOT] } else { &[0.0] };
        for offset in passes {
            ctx.draw(&CanvasLine {
                x1: from.x as f64,
                y1: self.flip(from.y) + offset,
                x2: to.x as f64,
                y2: self.flip(to.y) + offset,
                color,
            });
        }
    }
}
