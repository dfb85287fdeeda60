//! The non-raytraced render paths and the pixel buffers they share.

pub mod filter;
pub mod framebuffer;
pub mod scanline;
pub mod wireframe;

pub use framebuffer::Framebuffer;

use crate::colors::Color;
use crate::math::vec2::Vec2;
use crate::projector::CanvasPoint;

/// A projected triangle ready for scanline filling.
#[derive(Clone, Copy, Debug)]
pub struct CanvasTriangle {
    pub points: [CanvasPoint; 3],
    pub color: Color,
    /// Texture UVs per corner, present only for textured surfaces.
    pub texture_points: Option<[Vec2; 3]>,
}

impl CanvasTriangle {
    pub fn new(points: [CanvasPoint; 3], color: Color) -> Self {
        Self {
            points,
            color,
            texture_points: None,
        }
    }

    pub fn with_texture_points(mut self, uvs: [Vec2; 3]) -> Self {
        self.texture_points = Some(uvs);
        self
    }
}
