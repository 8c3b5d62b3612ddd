//! Drawing surface abstraction
//!
//! The engine is handed a 2-D drawing surface bound to a fixed-size bitmap;
//! it reads the bitmap's pixel dimensions and issues draw commands. Nothing
//! else about the host environment is assumed, so the simulation runs (and
//! tests run) without a real rendering host.

/// Minimal 2-D drawing surface the engine draws through
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Resize the backing bitmap
    fn set_size(&mut self, width: f32, height: f32);

    /// Clear the whole surface
    fn clear(&mut self);

    /// Fill an axis-aligned rectangle
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: &str);

    /// Draw a text label centered at (x, y)
    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: &str);
}

/// Headless surface that tracks dimensions and discards draw commands
///
/// Used by the demo driver and anywhere the simulation runs without a
/// rendering host.
#[derive(Debug, Clone)]
pub struct NullSurface {
    width: f32,
    height: f32,
}

impl NullSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Surface for NullSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {}

    fn fill_rect(&mut self, _x: f32, _y: f32, _width: f32, _height: f32, _color: &str) {}

    fn draw_text(&mut self, _text: &str, _x: f32, _y: f32, _color: &str) {}
}
