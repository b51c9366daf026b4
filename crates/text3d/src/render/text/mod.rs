//! Text rendering system
//!
//! Text is drawn as one textured quad per glyph lying on a horizontal plane
//! in world space, so it can be transformed, animated per letter and mixed
//! with other 3D geometry.
//!
//! # Architecture
//!
//! - [`FontAtlas`]: glyph texture and metrics, implemented by [`BitmapFontAtlas`]
//! - [`emit_codepoint`]: one glyph to one or two quads
//! - [`draw_text`]: fixed-advance line layout
//! - [`draw_text_wave`]: `~`-delimited wave spans
//! - [`draw_layered`]: stacked copies for a faux extrusion
//! - [`measure_wave`]: advisory extents for centering and debug boxes
//! - [`TextRenderer`]: all of the above behind one call
//!
//! # Example
//!
//! ```
//! use text3d::foundation::math::Vec3;
//! use text3d::render::text::{BitmapFontAtlas, TextRenderer, TextStyle, WaveConfig};
//! use text3d::render::RecordingRasterizer;
//!
//! let mut raster = RecordingRasterizer::new();
//! let mut font = BitmapFontAtlas::default_font()?;
//! font.upload(&mut raster)?;
//!
//! let renderer = TextRenderer::new(&font, TextStyle::default()).with_wave(WaveConfig::default());
//! renderer.draw(&mut raster, "Hello ~World~", Vec3::zeros(), 0.0)?;
//! assert_eq!(raster.quad_count(), 2 * 11);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bmfont;
mod default_font;
mod emitter;
mod font_atlas;
mod layers;
mod layout;
mod measure;
mod style;
mod text_renderer;
mod wave;

pub use bmfont::BmFontDescriptor;
pub use emitter::{draw_letter_boundary, emit_codepoint, glyph_quads, GlyphQuads};
pub use font_atlas::{BitmapFontAtlas, FontAtlas, FontError, FontResult, GlyphInfo};
pub use layers::{draw_layered, LayerCompositor, LayerPalette, MAX_LAYERS};
pub use layout::{draw_text, LayoutWalker, PlacedGlyph, TextDrawSummary};
pub use measure::{centered_position, draw_text_boundary, measure_wave};
pub use style::{
    TextDebugFlags, TextStyle, LETTER_BOUNDARY_COLOR, LETTER_BOUNDARY_SIZE, TEXT_BOUNDARY_COLOR,
};
pub use text_renderer::TextRenderer;
pub use wave::{draw_text_wave, WaveConfig, WAVE_SENTINEL};

#[cfg(test)]
pub(crate) mod test_support {
    use super::{BitmapFontAtlas, GlyphInfo};
    use crate::foundation::math::Rect;
    use crate::render::texture::AtlasImage;

    /// Printable ASCII in 6x10 cells on an 8x12 grid, 10px baseline
    fn atlas_with_offsets(offset_x: f32, offset_y: f32) -> BitmapFontAtlas {
        let mut image = AtlasImage::new(128, 128);
        let glyphs = (' '..='~')
            .enumerate()
            .map(|(i, codepoint)| {
                let x = (i % 16) as u32 * 8;
                let y = (i / 16) as u32 * 12;
                if codepoint != ' ' {
                    image.blit_coverage(x, y, 6, 10, &[255; 60]);
                }
                GlyphInfo {
                    codepoint,
                    source_rect: Rect::new(x as f32, y as f32, 6.0, 10.0),
                    offset_x,
                    offset_y,
                    advance_x: 7.0,
                }
            })
            .collect();

        BitmapFontAtlas::from_parts(10, glyphs, image).expect("test atlas")
    }

    /// Glyphs offset by (1, 2) atlas pixels
    pub fn grid_atlas() -> BitmapFontAtlas {
        atlas_with_offsets(1.0, 2.0)
    }

    /// Glyphs with their top-left on the cursor
    pub fn flush_atlas() -> BitmapFontAtlas {
        atlas_with_offsets(0.0, 0.0)
    }
}
