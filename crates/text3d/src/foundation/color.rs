//! RGBA8 colors
//!
//! Tints are carried as 8-bit RGBA all the way to the rasterizer. Shading
//! happens in normalized floats via [`Color::to_vec4`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::math::{constants, Vec4};

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color {
    /// Light gray
    pub const LIGHTGRAY: Self = Self::new(200, 200, 200, 255);
    /// Gray
    pub const GRAY: Self = Self::new(130, 130, 130, 255);
    /// Dark gray
    pub const DARKGRAY: Self = Self::new(80, 80, 80, 255);
    /// Red
    pub const RED: Self = Self::new(230, 41, 55, 255);
    /// Maroon
    pub const MAROON: Self = Self::new(190, 33, 55, 255);
    /// Green
    pub const GREEN: Self = Self::new(0, 228, 48, 255);
    /// Dark blue
    pub const DARKBLUE: Self = Self::new(0, 82, 172, 255);
    /// Violet, used for letter boundary boxes
    pub const VIOLET: Self = Self::new(135, 60, 190, 255);
    /// White
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Black
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Fully transparent black
    pub const BLANK: Self = Self::new(0, 0, 0, 0);
    /// Off-white background
    pub const RAYWHITE: Self = Self::new(245, 245, 245, 255);

    /// Create a color from its channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from hue (degrees), saturation and value
    ///
    /// Saturation and value are expected in `[0, 1]`.
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let channel = |n: f32| {
            let k = (n + hue / 60.0).rem_euclid(6.0);
            let k = k.min(4.0 - k).clamp(0.0, 1.0);
            ((value - value * saturation * k) * 255.0) as u8
        };

        Self::new(channel(5.0), channel(3.0), channel(1.0), 255)
    }

    /// The same color with alpha replaced by `alpha` in `[0, 1]`
    pub fn fade(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0) as u8,
            ..self
        }
    }

    /// The same color with alpha replaced by a raw channel value
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Component-wise product of two colors
    pub fn modulate(self, other: Self) -> Self {
        let mul = |a: u8, b: u8| ((u16::from(a) * u16::from(b)) / 255) as u8;
        Self::new(
            mul(self.r, other.r),
            mul(self.g, other.g),
            mul(self.b, other.b),
            mul(self.a, other.a),
        )
    }

    /// Normalized channels
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        )
    }

    /// Normalized channels as a plain array
    pub fn to_array(self) -> [f32; 4] {
        let v = self.to_vec4();
        [v.x, v.y, v.z, v.w]
    }

    /// Build a color from normalized channels, clamping to `[0, 1]`
    pub fn from_vec4(v: Vec4) -> Self {
        let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(to_u8(v.x), to_u8(v.y), to_u8(v.z), to_u8(v.w))
    }
}

/// Generate a pleasant color with a random hue
///
/// The hue is spread with the golden ratio conjugate so that consecutive
/// colors tend to land far apart on the color wheel.
pub fn generate_random_color<R: Rng + ?Sized>(rng: &mut R, saturation: f32, value: f32) -> Color {
    let h = rng.gen_range(0..=360) as f32;
    let h = (h + h * constants::GOLDEN_RATIO_CONJUGATE) % 360.0;
    Color::from_hsv(h, saturation, value)
}
