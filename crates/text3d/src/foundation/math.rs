//! Math utilities and types
//!
//! Provides the vector aliases and the plane rectangle used by the text pipeline.

use serde::{Deserialize, Serialize};

pub use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Axis-aligned rectangle
///
/// Used both for source rectangles in atlas pixels and for destination
/// rectangles in world units on the text plane. A negative `width` means the
/// rectangle is traversed right-to-left, i.e. horizontally mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent (negative when mirrored)
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// The same pixels traversed right-to-left
    ///
    /// The origin moves to the old right edge and the width is negated, so the
    /// covered area is unchanged.
    pub fn mirrored(&self) -> Self {
        Self {
            x: self.x + self.width,
            y: self.y,
            width: -self.width,
            height: self.height,
        }
    }

    /// Whether this rectangle covers no area
    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Smallest and largest x, independent of mirroring
    pub fn x_span(&self) -> (f32, f32) {
        let other = self.x + self.width;
        (self.x.min(other), self.x.max(other))
    }
}

/// Math constants
pub mod constants {
    /// Golden ratio conjugate, used to spread random hues
    pub const GOLDEN_RATIO_CONJUGATE: f32 = 0.618_034;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}
