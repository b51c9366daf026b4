//! # text3d
//!
//! Text rendered as textured quads in 3D world space.
//!
//! ## Features
//!
//! - **Per-glyph quads**: every character is an independent quad on a horizontal plane
//! - **Wave markup**: `~` delimits spans whose letters bob on a sinusoid
//! - **Layered extrusion**: stacked copies with optional per-layer colors
//! - **Alpha discard**: a fragment shader that keeps transparent texels out of the depth buffer
//! - **Pluggable rasterizers**: record calls, build a GPU mesh, or render PNG frames on the CPU
//!
//! ## Quick Start
//!
//! ```rust
//! use text3d::prelude::*;
//!
//! let mut raster = SoftwareRasterizer::new(320, 180);
//! let mut font = BitmapFontAtlas::default_font()?;
//! font.upload(&mut raster)?;
//! let shader = raster.load_shader(&AlphaDiscardShader::default())?;
//!
//! let renderer = TextRenderer::new(&font, TextStyle::default())
//!     .with_wave(WaveConfig::default())
//!     .with_compositor(LayerCompositor::new(4, 0.01))
//!     .with_shader(shader);
//!
//! raster.clear(Color::RAYWHITE);
//! raster.begin_3d(&Camera::default());
//! renderer.draw_centered(&mut raster, "Hello ~World~ in 3D!", 2.5, 0.0)?;
//! raster.end_3d();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, SceneConfig},
        foundation::{
            color::{generate_random_color, Color},
            math::{Rect, Vec2, Vec3},
        },
        render::{
            text::{
                draw_layered, draw_text, draw_text_wave, emit_codepoint, measure_wave,
                BitmapFontAtlas, FontAtlas, LayerCompositor, TextDebugFlags, TextRenderer,
                TextStyle, WaveConfig, MAX_LAYERS,
            },
            AlphaDiscardShader, Camera, GlyphMeshBuilder, Rasterizer, RecordingRasterizer,
            RenderError, ShaderLoader, SoftwareRasterizer, TextureUploader,
        },
    };
}
