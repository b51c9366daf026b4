//! Advisory text measurement
//!
//! Extents are used for centering and for the debug boundary box. Wave
//! displacement is ignored.

use crate::foundation::math::Vec3;
use crate::render::rasterizer::Rasterizer;
use crate::render::RenderResult;

use super::emitter::glyph_quads;
use super::font_atlas::FontAtlas;
use super::layout::LayoutWalker;
use super::style::{TextStyle, LETTER_BOUNDARY_SIZE, TEXT_BOUNDARY_COLOR};

/// Extent of `text` as `(width, height, depth)` along X, Y and Z
///
/// Width is the furthest a line reaches: the last glyph cell of the line
/// without trailing spacing, or the right edge of a glyph quad that sticks
/// out of its cell. Depth covers every line, each `font_size` deep. Height is
/// the thickness of the boundary box. Text with no glyphs measures zero.
pub fn measure_wave<F: FontAtlas + ?Sized>(
    font: &F,
    text: &str,
    font_size: f32,
    font_spacing: f32,
    line_spacing: f32,
) -> Vec3 {
    let style = TextStyle {
        font_size,
        font_spacing,
        line_spacing,
        backface: false,
        ..TextStyle::default()
    };

    let mut width = 0.0f32;
    let mut max_z = None::<f32>;

    for placed in LayoutWalker::new(text, Vec3::zeros(), &style).with_markup() {
        let cell_right = placed.cursor.x + font_size;
        let quad_right = glyph_quads(font, placed.codepoint, placed.cursor, font_size, false, style.tint)
            .map_or(cell_right, |quads| {
                let (_, right) = quads.front.dest.x_span();
                right
            });

        width = width.max(cell_right).max(quad_right);
        max_z = Some(max_z.map_or(placed.cursor.z, |z| z.max(placed.cursor.z)));
    }

    match max_z {
        Some(z) => Vec3::new(width, LETTER_BOUNDARY_SIZE, z + font_size),
        None => Vec3::zeros(),
    }
}

/// Top-left position that centers text of `extent` on the origin
pub fn centered_position(extent: Vec3, elevation: f32) -> Vec3 {
    Vec3::new(-extent.x / 2.0, elevation, -extent.z / 2.0)
}

/// Wire box around text of `extent` drawn at `position`
pub fn draw_text_boundary<R: Rasterizer + ?Sized>(
    rasterizer: &mut R,
    position: Vec3,
    extent: Vec3,
) -> RenderResult<()> {
    let center = Vec3::new(
        position.x + extent.x / 2.0,
        position.y,
        position.z + extent.z / 2.0,
    );
    rasterizer.draw_cube_wires(center, extent, TEXT_BOUNDARY_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::text::test_support::flush_atlas;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_and_sentinel_only_text_measure_zero() {
        let atlas = flush_atlas();
        assert_eq!(measure_wave(&atlas, "", 1.0, 0.1, 0.0), Vec3::zeros());
        assert_eq!(measure_wave(&atlas, "~~\n", 1.0, 0.1, 0.0), Vec3::zeros());
    }

    #[test]
    fn test_single_line_width_excludes_trailing_spacing() {
        let atlas = flush_atlas();
        let extent = measure_wave(&atlas, "abc", 1.0, 0.5, 0.0);

        assert_relative_eq!(extent.x, 3.0 * 1.5 - 0.5);
        assert_relative_eq!(extent.y, LETTER_BOUNDARY_SIZE);
        assert_relative_eq!(extent.z, 1.0);
    }

    #[test]
    fn test_sentinels_do_not_widen() {
        let atlas = flush_atlas();
        assert_eq!(
            measure_wave(&atlas, "a~bc~", 1.0, 0.2, 0.0),
            measure_wave(&atlas, "abc", 1.0, 0.2, 0.0)
        );
    }

    #[test]
    fn test_multiline_takes_widest_line_and_all_lines_deep() {
        let atlas = flush_atlas();
        let extent = measure_wave(&atlas, "ab\nabcd\nc", 1.0, 0.0, 0.5);

        assert_relative_eq!(extent.x, 4.0);
        assert_relative_eq!(extent.z, 2.0 * 1.5 + 1.0);
    }

    #[test]
    fn test_centered_position() {
        let position = centered_position(Vec3::new(4.0, 0.25, 2.0), 1.5);
        assert_eq!(position, Vec3::new(-2.0, 1.5, -1.0));
    }
}
