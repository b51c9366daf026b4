//! # Rendering
//!
//! The text pipeline never touches a graphics API directly. It emits textured
//! quads through the [`Rasterizer`] trait, and the host decides what a quad
//! becomes: a recorded command, vertices in a mesh, or pixels in a frame.
//!
//! ## Backends
//!
//! - [`RecordingRasterizer`]: keeps every call, used to inspect output
//! - [`GlyphMeshBuilder`]: packs quads into a vertex/index buffer for GPU upload
//! - [`SoftwareRasterizer`]: depth-tested, alpha-discarding CPU rasterizer
//!   that can write PNG frames

pub mod camera;
pub mod mesh;
pub mod rasterizer;
pub mod recording;
pub mod shader;
pub mod software;
pub mod text;
pub mod texture;

pub use camera::{Camera, Projection};
pub use mesh::{GlyphMeshBuilder, MeshBatch, TextVertex};
pub use rasterizer::{
    Rasterizer, ShaderHandle, ShaderLoader, TextureHandle, TextureUploader, TexturedQuad,
};
pub use recording::{DrawCommand, RecordingRasterizer};
pub use shader::{AlphaDiscardShader, ShaderConfig, ShaderDialect, ShaderError};
pub use software::{RasterStats, SoftwareRasterizer};
pub use texture::AtlasImage;

use thiserror::Error;

/// Errors raised while submitting draw calls
#[derive(Error, Debug)]
pub enum RenderError {
    /// A quad referenced a texture the backend never received
    #[error("Unknown texture: {0:?}")]
    UnknownTexture(TextureHandle),

    /// A shader handle that was never loaded
    #[error("Unknown shader: {0:?}")]
    UnknownShader(ShaderHandle),

    /// Geometry was submitted outside of a 3D block
    ///
    /// Backends that project geometry need a camera, which is only known
    /// between `begin_3d` and `end_3d`.
    #[error("Draw call outside of 3D mode")]
    NotIn3dMode,

    /// Shader blocks do not nest
    #[error("A shader is already bound: {0:?}")]
    ShaderAlreadyBound(ShaderHandle),

    /// Texture data does not match its declared dimensions
    #[error("Invalid texture data: {0}")]
    InvalidTexture(String),

    /// Encoding or writing an image failed
    #[error("Image error: {0}")]
    Image(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
