//! Texture map storage and sampling.
//!
//! A texture is a flat array of packed ARGB pixels, the same layout the
//! framebuffer uses, so sampled texels can be written to the canvas
//! without conversion. Sampling is nearest-neighbour against the
//! perspective-resolved UVs the rasterizer and ray tracer feed in.

use std::path::Path;

pub struct Texture {
    data: Vec<u32>,
    width: u32,
    height: u32,
}

impl Texture {
    /// Decodes an image file into packed ARGB pixels.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, image::ImageError> {
        let decoded = image::open(path)?.into_rgba8();
        let (width, height) = decoded.dimensions();

        let data = decoded
            .pixels()
            .map(|pixel| {
                let [red, green, blue, alpha] = pixel.0;
                u32::from_be_bytes([alpha, red, green, blue])
            })
            .collect();

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Wraps an already-decoded flat pixel array.
    ///
    /// # Panics
    /// Panics if `data.len() != width * height`.
    pub fn from_raw(data: Vec<u32>, width: u32, height: u32) -> Self {
        assert_eq!(
            data.len(),
            (width * height) as usize,
            "pixel array does not match dimensions"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Nearest texel for a UV pair. UVs follow the OBJ convention of a
    /// bottom-left origin, so V is flipped against the top-down pixel
    /// rows; coordinates outside [0, 1] wrap around.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let u = u.rem_euclid(1.0);
        let v = (1.0 - v).rem_euclid(1.0);

        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);

        self.data[(y * self.width + x) as usize]
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
