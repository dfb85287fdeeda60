//! Colour arithmetic and ARGB8888 packing.
//!
//! Lighting sums several independent contributions (ambient + diffuse +
//! specular), so addition and scalar multiplication saturate each channel
//! at 255 instead of wrapping.

use std::ops::{Add, Mul};

/// Packed background colour written wherever no geometry is visible.
pub const BACKGROUND: u32 = 0xFF00_0000;
/// Colour used for wireframe strokes and point-cloud dots.
pub const WIREFRAME: u32 = 0xFFFF_FFFF;

/// An 8-bit-per-channel RGB colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Packs into ARGB8888 with full alpha.
    pub fn as_argb(self) -> u32 {
        0xFF00_0000 | ((self.red as u32) << 16) | ((self.green as u32) << 8) | self.blue as u32
    }

    pub fn from_argb(argb: u32) -> Self {
        Self {
            red: ((argb >> 16) & 0xFF) as u8,
            green: ((argb >> 8) & 0xFF) as u8,
            blue: (argb & 0xFF) as u8,
        }
    }
}

/// Channel-wise saturating addition.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Self::Output {
        Self {
            red: self.red.saturating_add(rhs.red),
            green: self.green.saturating_add(rhs.green),
            blue: self.blue.saturating_add(rhs.blue),
        }
    }
}

/// Scalar multiplication, clamped to [0, 255] per channel. Negative
/// scales clamp to black rather than wrapping.
impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            red: (self.red as f32 * rhs).clamp(0.0, 255.0) as u8,
            green: (self.green as f32 * rhs).clamp(0.0, 255.0) as u8,
            blue: (self.blue as f32 * rhs).clamp(0.0, 255.0) as u8,
        }
    }
}
