// Shared fixtures for the integration tests.

#![allow(dead_code)]

use text3d::foundation::math::Rect;
use text3d::render::text::{BitmapFontAtlas, GlyphInfo, TextStyle};
use text3d::render::AtlasImage;

/// Atlas baseline in pixels
pub const BASELINE: u32 = 10;

/// Printable ASCII in opaque 6x10 cells, except a fully transparent space
pub fn atlas_with_offsets(offset_x: f32, offset_y: f32) -> BitmapFontAtlas {
    let mut image = AtlasImage::new(128, 128);
    let glyphs: Vec<GlyphInfo> = (' '..='~')
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

    BitmapFontAtlas::from_parts(BASELINE, glyphs, image).unwrap()
}

/// Glyph quads start exactly at the cursor
pub fn flush_atlas() -> BitmapFontAtlas {
    atlas_with_offsets(0.0, 0.0)
}

/// Glyph quads are offset from the cursor
pub fn offset_atlas() -> BitmapFontAtlas {
    atlas_with_offsets(1.0, 2.0)
}

/// One world unit per cell, no spacing, no backfaces
pub fn unit_style() -> TextStyle {
    TextStyle {
        font_size: 1.0,
        font_spacing: 0.0,
        line_spacing: 0.0,
        backface: false,
        ..TextStyle::default()
    }
}
