//! Single glyph emission
//!
//! A glyph becomes one quad lying on the horizontal plane through the pen
//! position, plus an optional mirrored quad so the text reads correctly from
//! below.

use crate::foundation::color::Color;
use crate::foundation::math::{Rect, Vec2, Vec3};
use crate::render::rasterizer::{Rasterizer, TexturedQuad};
use crate::render::RenderResult;

use super::font_atlas::FontAtlas;
use super::style::{LETTER_BOUNDARY_COLOR, LETTER_BOUNDARY_SIZE};

/// The quads one glyph produces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuads {
    /// Quad readable from above
    pub front: TexturedQuad,
    /// Mirrored quad readable from below
    pub back: Option<TexturedQuad>,
}

impl GlyphQuads {
    /// Number of quads
    pub fn count(&self) -> usize {
        1 + usize::from(self.back.is_some())
    }
}

/// Compute the quads for `codepoint` without drawing them
///
/// Atlas pixels are scaled by `font_size / baseline_size`. The destination
/// rectangle's `y` runs along world Z, the plane sits at `position.y`.
/// Returns `None` when neither the codepoint nor the fallback resolve to a
/// glyph, or when the scaled quad covers no area.
pub fn glyph_quads<F: FontAtlas + ?Sized>(
    font: &F,
    codepoint: char,
    position: Vec3,
    font_size: f32,
    backface: bool,
    tint: Color,
) -> Option<GlyphQuads> {
    let index = font.lookup(codepoint);
    let Some(glyph) = font.glyph(index) else {
        log::warn!("Glyph {index} for {codepoint:?} is missing from the atlas, skipped");
        return None;
    };
    let scale = font_size / font.baseline_size().max(1) as f32;
    let source = glyph.source_rect;

    let dest = Rect::new(
        position.x + glyph.offset_x * scale,
        position.z + glyph.offset_y * scale,
        source.width * scale,
        source.height * scale,
    );

    if dest.is_degenerate() {
        return None;
    }

    let front = TexturedQuad {
        texture: font.texture(),
        source,
        dest,
        elevation: position.y,
        origin: Vec2::zeros(),
        rotation: 0.0,
        tint,
        backface: false,
    };

    let back = backface.then(|| TexturedQuad {
        source: source.mirrored(),
        backface: true,
        ..front
    });

    Some(GlyphQuads { front, back })
}

/// Draw one glyph at `position`
///
/// Returns the glyph's destination rectangle, or `None` if nothing was drawn.
pub fn emit_codepoint<F, R>(
    rasterizer: &mut R,
    font: &F,
    codepoint: char,
    position: Vec3,
    font_size: f32,
    backface: bool,
    tint: Color,
) -> RenderResult<Option<Rect>>
where
    F: FontAtlas + ?Sized,
    R: Rasterizer + ?Sized,
{
    let Some(quads) = glyph_quads(font, codepoint, position, font_size, backface, tint) else {
        log::trace!("Nothing to draw for {:?}", codepoint);
        return Ok(None);
    };

    rasterizer.draw_textured_quad(&quads.front)?;
    if let Some(back) = &quads.back {
        rasterizer.draw_textured_quad(back)?;
    }

    Ok(Some(quads.front.dest))
}

/// Wire box around one glyph quad
pub fn draw_letter_boundary<R: Rasterizer + ?Sized>(
    rasterizer: &mut R,
    dest: Rect,
    elevation: f32,
) -> RenderResult<()> {
    let center = Vec3::new(dest.x + dest.width / 2.0, elevation, dest.y + dest.height / 2.0);
    let size = Vec3::new(dest.width, LETTER_BOUNDARY_SIZE, dest.height);
    rasterizer.draw_cube_wires(center, size, LETTER_BOUNDARY_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::RecordingRasterizer;
    use crate::render::text::test_support::grid_atlas;
    use approx::assert_relative_eq;

    #[test]
    fn test_dest_rect_scales_atlas_pixels() {
        // 10px baseline, 'A' is 6x10 with offsets (1, 2)
        let atlas = grid_atlas();
        let quads = glyph_quads(&atlas, 'A', Vec3::new(1.0, 2.0, 3.0), 0.5, false, Color::WHITE).unwrap();

        let dest = quads.front.dest;
        assert_relative_eq!(dest.x, 1.05, epsilon = 1e-6);
        assert_relative_eq!(dest.y, 3.1, epsilon = 1e-6);
        assert_relative_eq!(dest.width, 0.3, epsilon = 1e-6);
        assert_relative_eq!(dest.height, 0.5, epsilon = 1e-6);
        assert_relative_eq!(quads.front.elevation, 2.0);
        assert!(quads.back.is_none());
    }

    #[test]
    fn test_backface_mirrors_source_only() {
        let atlas = grid_atlas();
        let quads = glyph_quads(&atlas, 'A', Vec3::zeros(), 1.0, true, Color::RED).unwrap();
        let back = quads.back.unwrap();

        assert_eq!(quads.count(), 2);
        assert!(back.backface);
        assert_eq!(back.dest, quads.front.dest);
        assert_eq!(back.source, quads.front.source.mirrored());
        assert_eq!(back.tint, Color::RED);
    }

    #[test]
    fn test_unknown_codepoint_uses_fallback() {
        let atlas = grid_atlas();
        let fallback = atlas.glyph(atlas.fallback_index()).unwrap().source_rect;
        let quads = glyph_quads(&atlas, '\u{00e9}', Vec3::zeros(), 1.0, false, Color::WHITE).unwrap();

        assert_eq!(quads.front.source, fallback);
    }

    #[test]
    fn test_zero_size_emits_nothing() {
        let atlas = grid_atlas();
        let mut raster = RecordingRasterizer::new();

        let drawn = emit_codepoint(&mut raster, &atlas, 'A', Vec3::zeros(), 0.0, true, Color::WHITE).unwrap();

        assert!(drawn.is_none());
        assert_eq!(raster.quad_count(), 0);
    }

    #[test]
    fn test_emit_draws_both_faces_and_boundary() {
        let atlas = grid_atlas();
        let mut raster = RecordingRasterizer::new();

        let dest = emit_codepoint(&mut raster, &atlas, 'B', Vec3::zeros(), 1.0, true, Color::WHITE)
            .unwrap()
            .unwrap();
        draw_letter_boundary(&mut raster, dest, 0.0).unwrap();

        assert_eq!(raster.quad_count(), 2);
        let (center, size, color) = raster.cube_wires().next().unwrap();
        assert_relative_eq!(center.x, dest.x + dest.width / 2.0, epsilon = 1e-6);
        assert_relative_eq!(size.y, LETTER_BOUNDARY_SIZE);
        assert_eq!(color, LETTER_BOUNDARY_COLOR);
    }
}
