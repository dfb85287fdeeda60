//! Colour and depth buffers.
//!
//! The depth buffer stores reciprocal camera-space depth (1/z), so larger
//! values are closer to the camera and the clear sentinel 0.0 reads as
//! "infinitely far". Reciprocal depth is the quantity that interpolates
//! linearly in screen space, which is what makes the rasterizer's
//! barycentric depth blend perspective-correct.

use crate::colors;

pub struct Framebuffer {
    color_buffer: Vec<u32>,
    inv_depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            color_buffer: vec![colors::BACKGROUND; size],
            inv_depth_buffer: vec![0.0; size], // 0.0 = infinitely far
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Clears the colour buffer and resets every depth to the far
    /// sentinel.
    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
        self.inv_depth_buffer.fill(0.0);
    }

    /// Set a pixel without depth testing (wireframe and point-cloud
    /// paths). Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.color_buffer[(y as u32 * self.width + x as u32) as usize] = color;
        }
    }

    /// Set a pixel with depth testing. The write happens only when the
    /// new reciprocal depth is greater than the stored one (closer to the
    /// camera). Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, inv_depth: f32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let idx = (y as u32 * self.width + x as u32) as usize;
            if inv_depth > self.inv_depth_buffer[idx] {
                self.inv_depth_buffer[idx] = inv_depth;
                self.color_buffer[idx] = color;
            }
        }
    }

    /// Get the colour at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(self.color_buffer[(y as u32 * self.width + x as u32) as usize])
        } else {
            None
        }
    }

    /// The whole colour buffer, for row-partitioned parallel writes.
    pub fn color_buffer_mut(&mut self) -> &mut [u32] {
        &mut self.color_buffer
    }

    pub fn color_buffer(&self) -> &[u32] {
        &self.color_buffer
    }

    /// Replaces the colour buffer contents (post-filter output).
    ///
    /// # Panics
    /// Panics if the lengths differ.
    pub fn overwrite_colors(&mut self, colors: &[u32]) {
        self.color_buffer.copy_from_slice(colors);
    }

    /// The frame as raw ARGB8888 bytes for presentation.
    pub fn as_bytes(&self) -> &[u8] {
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }
}
