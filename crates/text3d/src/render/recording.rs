//! Rasterizer that records calls instead of drawing them

use std::collections::HashMap;

use crate::foundation::color::Color;
use crate::foundation::math::Vec3;

use super::camera::Camera;
use super::rasterizer::{
    Rasterizer, ShaderHandle, ShaderLoader, TextureHandle, TextureUploader, TexturedQuad,
};
use super::shader::AlphaDiscardShader;
use super::texture::AtlasImage;
use super::RenderResult;

/// A single recorded rasterizer call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// `begin_3d` with the camera it was given
    Begin3d(Camera),
    /// `end_3d`
    End3d,
    /// `begin_shader`
    BeginShader(ShaderHandle),
    /// `end_shader`
    EndShader,
    /// `draw_textured_quad`
    Quad(TexturedQuad),
    /// `draw_cube_wires`
    CubeWires {
        /// Box center
        center: Vec3,
        /// Box extent along each axis
        size: Vec3,
        /// Line color
        color: Color,
    },
}

/// Records every call in order
///
/// Nothing is validated: quads are accepted outside of 3D blocks so that
/// text output can be inspected without setting up a camera.
#[derive(Debug, Default)]
pub struct RecordingRasterizer {
    commands: Vec<DrawCommand>,
    textures: HashMap<TextureHandle, (u32, u32)>,
    shaders: Vec<AlphaDiscardShader>,
}

impl RecordingRasterizer {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Recorded quads in submission order
    pub fn quads(&self) -> impl Iterator<Item = &TexturedQuad> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Quad(quad) => Some(quad),
            _ => None,
        })
    }

    /// Recorded front-facing quads
    pub fn front_quads(&self) -> impl Iterator<Item = &TexturedQuad> {
        self.quads().filter(|quad| !quad.backface)
    }

    /// Number of recorded quads
    pub fn quad_count(&self) -> usize {
        self.quads().count()
    }

    /// Recorded wire boxes as `(center, size, color)`
    pub fn cube_wires(&self) -> impl Iterator<Item = (Vec3, Vec3, Color)> + '_ {
        self.commands.iter().filter_map(|command| match *command {
            DrawCommand::CubeWires {
                center,
                size,
                color,
            } => Some((center, size, color)),
            _ => None,
        })
    }

    /// Dimensions of an uploaded texture
    pub fn texture_size(&self, texture: TextureHandle) -> Option<(u32, u32)> {
        self.textures.get(&texture).copied()
    }

    /// A loaded shader
    pub fn shader(&self, shader: ShaderHandle) -> Option<&AlphaDiscardShader> {
        self.shaders.get(shader.0 as usize)
    }

    /// Forget all recorded calls, keeping uploaded resources
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Rasterizer for RecordingRasterizer {
    fn begin_3d(&mut self, camera: &Camera) {
        self.commands.push(DrawCommand::Begin3d(camera.clone()));
    }

    fn end_3d(&mut self) {
        self.commands.push(DrawCommand::End3d);
    }

    fn begin_shader(&mut self, shader: ShaderHandle) -> RenderResult<()> {
        self.commands.push(DrawCommand::BeginShader(shader));
        Ok(())
    }

    fn end_shader(&mut self) {
        self.commands.push(DrawCommand::EndShader);
    }

    fn draw_textured_quad(&mut self, quad: &TexturedQuad) -> RenderResult<()> {
        self.commands.push(DrawCommand::Quad(*quad));
        Ok(())
    }

    fn draw_cube_wires(&mut self, center: Vec3, size: Vec3, color: Color) -> RenderResult<()> {
        self.commands.push(DrawCommand::CubeWires {
            center,
            size,
            color,
        });
        Ok(())
    }
}

impl TextureUploader for RecordingRasterizer {
    fn upload_texture(&mut self, image: &AtlasImage) -> RenderResult<TextureHandle> {
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.insert(handle, (image.width(), image.height()));
        Ok(handle)
    }
}

impl ShaderLoader for RecordingRasterizer {
    fn load_shader(&mut self, shader: &AlphaDiscardShader) -> RenderResult<ShaderHandle> {
        self.shaders.push(shader.clone());
        Ok(ShaderHandle(self.shaders.len() as u32 - 1))
    }
}
