//! Glyph mesh building
//!
//! Packs emitted quads into one vertex/index buffer pair that a GPU backend
//! can upload as-is. Quads are batched by texture and shader so a host needs
//! one draw call per batch.

use std::collections::HashMap;
use std::ops::Range;

use crate::foundation::math::Vec3;

use super::camera::Camera;
use super::rasterizer::{
    Rasterizer, ShaderHandle, ShaderLoader, TextureHandle, TextureUploader, TexturedQuad,
};
use super::shader::AlphaDiscardShader;
use super::texture::AtlasImage;
use super::{RenderError, RenderResult};

/// Vertex data for text rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextVertex {
    /// Position in world space
    pub position: [f32; 3],
    /// UV texture coordinates
    pub uv: [f32; 2],
    /// Normalized RGBA tint
    pub color: [f32; 4],
}

impl TextVertex {
    /// Number of floats in one vertex
    pub const FLOATS: usize = 9;

    /// Size of one vertex in bytes
    pub const STRIDE: usize = Self::FLOATS * std::mem::size_of::<f32>();

    /// Interleaved attributes in upload order
    pub fn to_floats(&self) -> [f32; Self::FLOATS] {
        let [x, y, z] = self.position;
        let [u, v] = self.uv;
        let [r, g, b, a] = self.color;
        [x, y, z, u, v, r, g, b, a]
    }
}

/// A contiguous index range sharing texture and shader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshBatch {
    /// Texture to bind
    pub texture: TextureHandle,
    /// Shader to bind, if any
    pub shader: Option<ShaderHandle>,
    /// Range into the index buffer
    pub indices: Range<u32>,
}

/// Rasterizer that turns quads into indexed triangles
///
/// Each quad produces 4 vertices and 6 indices. Backfaces keep the same
/// corners but reverse the winding, so a host with face culling enabled shows
/// exactly one side of every glyph.
#[derive(Debug, Default)]
pub struct GlyphMeshBuilder {
    textures: HashMap<TextureHandle, (u32, u32)>,
    shader_count: u32,
    active_shader: Option<ShaderHandle>,
    vertices: Vec<TextVertex>,
    indices: Vec<u32>,
    batches: Vec<MeshBatch>,
}

impl GlyphMeshBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Built vertices
    pub fn vertices(&self) -> &[TextVertex] {
        &self.vertices
    }

    /// Built indices, six per quad
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Draw batches in submission order
    pub fn batches(&self) -> &[MeshBatch] {
        &self.batches
    }

    /// Vertex buffer contents ready for upload
    pub fn vertex_bytes(&self) -> Vec<u8> {
        let floats: Vec<f32> = self.vertices.iter().flat_map(TextVertex::to_floats).collect();
        bytemuck::cast_slice(&floats).to_vec()
    }

    /// Index buffer contents ready for upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Drop all geometry, keeping known textures
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.batches.clear();
    }

    fn push_indices(&mut self, texture: TextureHandle, quad_indices: [u32; 6]) {
        let start = self.indices.len() as u32;
        self.indices.extend_from_slice(&quad_indices);
        let end = self.indices.len() as u32;

        match self.batches.last_mut() {
            Some(batch)
                if batch.texture == texture
                    && batch.shader == self.active_shader
                    && batch.indices.end == start =>
            {
                batch.indices.end = end;
            }
            _ => self.batches.push(MeshBatch {
                texture,
                shader: self.active_shader,
                indices: start..end,
            }),
        }
    }
}

impl Rasterizer for GlyphMeshBuilder {
    fn begin_3d(&mut self, _camera: &Camera) {}

    fn end_3d(&mut self) {}

    fn begin_shader(&mut self, shader: ShaderHandle) -> RenderResult<()> {
        if shader.0 >= self.shader_count {
            return Err(RenderError::UnknownShader(shader));
        }
        if let Some(bound) = self.active_shader {
            return Err(RenderError::ShaderAlreadyBound(bound));
        }
        self.active_shader = Some(shader);
        Ok(())
    }

    fn end_shader(&mut self) {
        self.active_shader = None;
    }

    fn draw_textured_quad(&mut self, quad: &TexturedQuad) -> RenderResult<()> {
        let &(width, height) = self
            .textures
            .get(&quad.texture)
            .ok_or(RenderError::UnknownTexture(quad.texture))?;

        if quad.dest.is_degenerate() {
            return Ok(());
        }

        let base = self.vertices.len() as u32;
        let color = quad.tint.to_array();
        let corners = quad.corners();
        let uvs = quad.uv_corners(width, height);

        self.vertices
            .extend(corners.iter().zip(uvs.iter()).map(|(p, uv)| TextVertex {
                position: [p.x, p.y, p.z],
                uv: [uv.x, uv.y],
                color,
            }));

        let quad_indices = if quad.backface {
            [base, base + 2, base + 1, base, base + 3, base + 2]
        } else {
            [base, base + 1, base + 2, base, base + 2, base + 3]
        };
        self.push_indices(quad.texture, quad_indices);

        Ok(())
    }
}

impl TextureUploader for GlyphMeshBuilder {
    fn upload_texture(&mut self, image: &AtlasImage) -> RenderResult<TextureHandle> {
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.insert(handle, (image.width(), image.height()));
        log::debug!(
            "Registered {}x{} texture as {:?}",
            image.width(),
            image.height(),
            handle
        );
        Ok(handle)
    }
}

impl ShaderLoader for GlyphMeshBuilder {
    fn load_shader(&mut self, _shader: &AlphaDiscardShader) -> RenderResult<ShaderHandle> {
        self.shader_count += 1;
        Ok(ShaderHandle(self.shader_count - 1))
    }
}

/// Face normal of a triangle given by three vertices
pub fn triangle_normal(a: &TextVertex, b: &TextVertex, c: &TextVertex) -> Vec3 {
    let a = Vec3::from(a.position);
    let b = Vec3::from(b.position);
    let c = Vec3::from(c.position);
    (b - a).cross(&(c - a))
}
