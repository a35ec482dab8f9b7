//! Canvas geometry and the surfaces draw commands are issued to.

use super::commands::DrawCommand;

/// Size of the drawing canvas.
///
/// `width`/`height` are the CSS (client) dimensions renderers draw in; the
/// backing store is the device-pixel resolution actually rasterised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
    pub backing_width: u32,
    pub backing_height: u32,
}

impl CanvasGeometry {
    /// Geometry for a container of `client_width` x `client_height` CSS pixels.
    pub fn from_client(client_width: u32, client_height: u32, pixel_ratio: f32) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        Self {
            width: client_width as f32,
            height: client_height as f32,
            pixel_ratio,
            backing_width: (client_width as f64 * pixel_ratio as f64) as u32,
            backing_height: (client_height as f64 * pixel_ratio as f64) as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.backing_width == 0 || self.backing_height == 0
    }
}

impl Default for CanvasGeometry {
    fn default() -> Self {
        Self::from_client(0, 0, 1.0)
    }
}

/// Target for draw commands.
pub trait Surface {
    /// Clear the surface and apply the pixel-ratio transform for a new frame.
    fn begin_frame(&mut self, geometry: &CanvasGeometry);

    fn draw(&mut self, command: DrawCommand);
}

/// Surface that records one frame's commands for later execution.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    geometry: CanvasGeometry,
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geometry(&self) -> &CanvasGeometry {
        &self.geometry
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of frames begun on this buffer.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Count the recorded commands matching `pred`.
    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Surface for FrameBuffer {
    fn begin_frame(&mut self, geometry: &CanvasGeometry) {
        self.geometry = *geometry;
        self.commands.clear();
        self.frames += 1;
    }

    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::theme::Color;

    #[test]
    fn test_backing_store_scaled_by_ratio() {
        let g = CanvasGeometry::from_client(300, 150, 2.0);
        assert_eq!(g.width, 300.0);
        assert_eq!(g.height, 150.0);
        assert_eq!(g.backing_width, 600);
        assert_eq!(g.backing_height, 300);
    }

    #[test]
    fn test_fractional_ratio_truncates() {
        let g = CanvasGeometry::from_client(101, 33, 1.5);
        assert_eq!(g.backing_width, 151);
        assert_eq!(g.backing_height, 49);
    }

    #[test]
    fn test_invalid_ratio_defaults_to_one() {
        let g = CanvasGeometry::from_client(10, 10, f32::NAN);
        assert_eq!(g.pixel_ratio, 1.0);
        assert_eq!(g.backing_width, 10);
        assert!(CanvasGeometry::from_client(0, 10, 2.0).is_empty());
    }

    #[test]
    fn test_begin_frame_discards_previous_commands() {
        let mut fb = FrameBuffer::new();
        fb.begin_frame(&CanvasGeometry::from_client(10, 10, 1.0));
        fb.draw(DrawCommand::Clear { color: Color::rgb(0, 0, 0) });
        assert_eq!(fb.commands().len(), 1);

        fb.begin_frame(&CanvasGeometry::from_client(20, 10, 1.0));
        assert!(fb.commands().is_empty());
        assert_eq!(fb.frames(), 2);
        assert_eq!(fb.geometry().width, 20.0);
    }
}
