//! Drawing commands produced by the renderers.
//!
//! Coordinates are in CSS pixels with the origin at the top-left corner and
//! y growing downwards. A surface applies the device pixel ratio.

use super::theme::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// How a stroke or fill is colored.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Gradient across the full canvas width; stops are `(offset in [0,1], color)`.
    HorizontalGradient(Vec<(f32, Color)>),
}

impl Paint {
    /// Resolve the paint at horizontal offset `t` in `[0, 1]`.
    pub fn color_at(&self, t: f32) -> Color {
        match self {
            Paint::Solid(c) => *c,
            Paint::HorizontalGradient(stops) => {
                let Some(first) = stops.first() else {
                    return Color::rgb(255, 255, 255);
                };
                let t = t.clamp(0.0, 1.0);
                stops
                    .windows(2)
                    .find(|w| t >= w[0].0 && t <= w[1].0)
                    .map(|w| lerp_color(w[0].1, w[1].1, (t - w[0].0) / (w[1].0 - w[0].0).max(1e-6)))
                    .unwrap_or(if t < first.0 { first.1 } else { stops[stops.len() - 1].1 })
            }
        }
    }
}

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let (ar, ag, ab) = a.to_rgb8();
    let (br, bg, bb) = b.to_rgb8();
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round().clamp(0.0, 255.0) as u8;
    Color::Rgba {
        r: mix(ar, br),
        g: mix(ag, bg),
        b: mix(ab, bb),
        a: a.alpha() + (b.alpha() - a.alpha()) * t,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f32,
    pub alpha: f32,
}

/// Soft shadow around a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Color,
    pub blur: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { control: Point, to: Point },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole canvas.
    Clear { color: Color },
    /// Bar with a rounded top edge, anchored at its bottom.
    Bar {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: Color,
        glow: Option<Glow>,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Color,
    },
    Path {
        segments: Vec<PathSegment>,
        closed: bool,
        stroke: Stroke,
        glow: Option<Glow>,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Circle {
        center: Point,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
        glow: Option<Glow>,
    },
    /// Single line of text horizontally centred on `at`.
    Text {
        at: Point,
        text: String,
        color: Color,
    },
}

/// Flatten path segments into a polyline, sampling each quadratic curve
/// `steps` times.
pub fn flatten(segments: &[PathSegment], steps: usize) -> Vec<Point> {
    let steps = steps.max(1);
    let mut points = Vec::with_capacity(segments.len() * steps);
    let mut cursor = Point::new(0.0, 0.0);

    for segment in segments {
        match *segment {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => {
                points.push(p);
                cursor = p;
            }
            PathSegment::QuadTo { control, to } => {
                for s in 1..=steps {
                    let t = s as f32 / steps as f32;
                    let u = 1.0 - t;
                    points.push(Point::new(
                        u * u * cursor.x + 2.0 * u * t * control.x + t * t * to.x,
                        u * u * cursor.y + 2.0 * u * t * control.y + t * t * to.y,
                    ));
                }
                cursor = to;
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_quad_ends_at_target() {
        let segments = [
            PathSegment::MoveTo(Point::new(0.0, 0.0)),
            PathSegment::QuadTo {
                control: Point::new(5.0, 10.0),
                to: Point::new(10.0, 0.0),
            },
        ];
        let points = flatten(&segments, 4);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], Point::new(0.0, 0.0));
        assert_eq!(points[4], Point::new(10.0, 0.0));
        // curve apex is halfway to the control point
        assert!((points[2].y - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_gradient_resolves_between_stops() {
        let paint = Paint::HorizontalGradient(vec![
            (0.0, Color::rgb(0, 0, 0)),
            (1.0, Color::rgb(200, 100, 0)),
        ]);
        assert_eq!(paint.color_at(0.0).to_rgb8(), (0, 0, 0));
        assert_eq!(paint.color_at(0.5).to_rgb8(), (100, 50, 0));
        assert_eq!(paint.color_at(2.0).to_rgb8(), (200, 100, 0));
    }

    #[test]
    fn test_empty_gradient_is_white() {
        let paint = Paint::HorizontalGradient(Vec::new());
        assert_eq!(paint.color_at(0.3).to_rgb8(), (255, 255, 255));
    }
}
