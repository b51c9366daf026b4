//! Host rasterizer contract
//!
//! Everything the text pipeline needs from a renderer: a 3D block bracketed
//! by a camera, an optional shader block, and textured quads lying on
//! horizontal planes.

use crate::foundation::color::Color;
use crate::foundation::math::{utils, Rect, Vec2, Vec3};

use super::camera::Camera;
use super::shader::AlphaDiscardShader;
use super::texture::AtlasImage;
use super::RenderResult;

/// Handle to a texture owned by a rasterizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

/// Handle to a shader owned by a rasterizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderHandle(pub u32);

/// One textured quad on a horizontal plane
///
/// The destination rectangle's `x` maps to world X and its `y` maps to world
/// Z; the plane sits at world Y = `elevation`. A negative source width
/// samples the atlas region right-to-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturedQuad {
    /// Atlas texture
    pub texture: TextureHandle,
    /// Region of the atlas in pixels
    pub source: Rect,
    /// Placement on the plane in world units
    pub dest: Rect,
    /// World Y of the plane
    pub elevation: f32,
    /// Pivot relative to the destination's top-left corner
    pub origin: Vec2,
    /// Rotation around the pivot in degrees
    pub rotation: f32,
    /// Color multiplied with every texel
    pub tint: Color,
    /// Whether this quad is the mirrored underside of a glyph
    pub backface: bool,
}

impl TexturedQuad {
    /// World-space corners: top-left, bottom-left, bottom-right, top-right
    pub fn corners(&self) -> [Vec3; 4] {
        let (sin, cos) = utils::deg_to_rad(self.rotation).sin_cos();
        let Rect {
            x,
            y,
            width,
            height,
        } = self.dest;

        [(0.0, 0.0), (0.0, height), (width, height), (width, 0.0)].map(|(dx, dy)| {
            let lx = dx - self.origin.x;
            let ly = dy - self.origin.y;
            Vec3::new(
                x + lx * cos - ly * sin,
                self.elevation,
                y + lx * sin + ly * cos,
            )
        })
    }

    /// Texture coordinates matching [`TexturedQuad::corners`]
    pub fn uv_corners(&self, texture_width: u32, texture_height: u32) -> [Vec2; 4] {
        let tw = texture_width.max(1) as f32;
        let th = texture_height.max(1) as f32;
        let left = self.source.x / tw;
        let right = (self.source.x + self.source.width) / tw;
        let top = self.source.y / th;
        let bottom = (self.source.y + self.source.height) / th;

        [
            Vec2::new(left, top),
            Vec2::new(left, bottom),
            Vec2::new(right, bottom),
            Vec2::new(right, top),
        ]
    }

    /// Center of the destination rectangle in world space
    pub fn center(&self) -> Vec3 {
        let corners = self.corners();
        (corners[0] + corners[2]) * 0.5
    }
}

/// Immediate-mode 3D drawing surface
pub trait Rasterizer {
    /// Start drawing with the given camera
    fn begin_3d(&mut self, camera: &Camera);

    /// Finish the current 3D block
    fn end_3d(&mut self);

    /// Bind a shader for subsequent quads
    fn begin_shader(&mut self, shader: ShaderHandle) -> RenderResult<()>;

    /// Unbind the current shader
    fn end_shader(&mut self);

    /// Draw one textured quad
    fn draw_textured_quad(&mut self, quad: &TexturedQuad) -> RenderResult<()>;

    /// Draw the edges of an axis-aligned box
    ///
    /// Only used for debug overlays, so backends may ignore it.
    fn draw_cube_wires(&mut self, _center: Vec3, _size: Vec3, _color: Color) -> RenderResult<()> {
        Ok(())
    }
}

/// Receives atlas images and hands back texture handles
pub trait TextureUploader {
    /// Make `image` available for drawing
    fn upload_texture(&mut self, image: &AtlasImage) -> RenderResult<TextureHandle>;
}

/// Compiles or registers fragment shaders
pub trait ShaderLoader {
    /// Make `shader` available for `begin_shader`
    fn load_shader(&mut self, shader: &AlphaDiscardShader) -> RenderResult<ShaderHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad(dest: Rect) -> TexturedQuad {
        TexturedQuad {
            texture: TextureHandle(0),
            source: Rect::new(8.0, 0.0, 8.0, 16.0),
            dest,
            elevation: 2.0,
            origin: Vec2::zeros(),
            rotation: 0.0,
            tint: Color::WHITE,
            backface: false,
        }
    }

    #[test]
    fn test_corners_lie_on_plane() {
        let corners = quad(Rect::new(1.0, 3.0, 0.5, 1.0)).corners();

        assert_eq!(corners[0], Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(corners[1], Vec3::new(1.0, 2.0, 4.0));
        assert_eq!(corners[2], Vec3::new(1.5, 2.0, 4.0));
        assert_eq!(corners[3], Vec3::new(1.5, 2.0, 3.0));
    }

    #[test]
    fn test_rotation_about_pivot() {
        let mut q = quad(Rect::new(0.0, 0.0, 2.0, 2.0));
        q.origin = Vec2::new(1.0, 1.0);
        q.rotation = 90.0;

        let corners = q.corners();
        assert_relative_eq!(corners[0].x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(corners[0].z, -1.0, epsilon = 1e-5);
        assert_relative_eq!(q.center(), Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_mirrored_source_swaps_u() {
        let mut q = quad(Rect::new(0.0, 0.0, 1.0, 1.0));
        let front = q.uv_corners(32, 16);
        q.source = q.source.mirrored();
        let back = q.uv_corners(32, 16);

        assert_relative_eq!(front[0].x, back[3].x);
        assert_relative_eq!(front[3].x, back[0].x);
        assert_relative_eq!(front[1].y, back[1].y);
    }
}
