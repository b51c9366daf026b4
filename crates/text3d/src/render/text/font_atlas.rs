//! Font atlas system for text rendering
//!
//! A font atlas is one texture holding every glyph plus per-glyph metadata:
//! where the glyph sits in the texture and how to place it relative to the
//! pen position. Atlases come from TrueType/OpenType fonts rasterized with
//! `fontdue`, from AngelCode BMFont descriptors, or from the built-in font.

use std::collections::HashMap;
use std::path::Path;

use fontdue::{Font, FontSettings};

use crate::foundation::math::Rect;
use crate::render::rasterizer::{TextureHandle, TextureUploader};
use crate::render::texture::AtlasImage;
use crate::render::RenderError;

use super::bmfont::BmFontDescriptor;

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur during font operations
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Failed to load font from file or data
    #[error("Failed to load font: {0}")]
    LoadError(String),

    /// A BMFont descriptor could not be parsed
    #[error("Malformed BMFont descriptor at line {line}: {reason}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What was wrong
        reason: String,
    },

    /// The file extension names no known font format
    #[error("Unsupported font format: {0}")]
    UnsupportedFormat(String),

    /// An atlas needs at least one glyph
    #[error("Font atlas has no glyphs")]
    EmptyAtlas,

    /// Failed to create or upload the atlas texture
    #[error("Failed to create atlas texture: {0}")]
    AtlasCreationError(#[from] RenderError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Information about a single glyph in the atlas
///
/// Offsets and sizes are in atlas pixels at [`FontAtlas::baseline_size`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphInfo {
    /// Character this glyph draws
    pub codepoint: char,
    /// Region of the atlas texture
    pub source_rect: Rect,
    /// Left bearing from the pen position
    pub offset_x: f32,
    /// Distance from the top of the line to the top of the glyph
    pub offset_y: f32,
    /// Natural advance of the font; layout uses a fixed cell instead
    pub advance_x: f32,
}

/// Read access to a glyph atlas
pub trait FontAtlas {
    /// Pixel height the atlas was built for
    fn baseline_size(&self) -> u32;

    /// Index of the glyph for `codepoint`, if the atlas has one
    fn glyph_index(&self, codepoint: char) -> Option<usize>;

    /// Index used for codepoints the atlas lacks
    fn fallback_index(&self) -> usize;

    /// Glyph metadata by index
    fn glyph(&self, index: usize) -> Option<&GlyphInfo>;

    /// Number of glyphs
    fn glyph_count(&self) -> usize;

    /// Texture holding the glyph pixels
    fn texture(&self) -> TextureHandle;

    /// Glyph index for `codepoint`, falling back for unknown codepoints
    fn lookup(&self, codepoint: char) -> usize {
        self.glyph_index(codepoint)
            .unwrap_or_else(|| self.fallback_index())
    }
}

/// Codepoints rasterized from outline fonts
const ASCII_START: u32 = 32; // Space character
const ASCII_END: u32 = 126; // Tilde character

/// Pixels left empty around every packed glyph
const GLYPH_PADDING: u32 = 1;

/// One glyph's coverage bitmap before packing
#[derive(Debug, Clone)]
pub(crate) struct RasterGlyph {
    pub codepoint: char,
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
    pub offset_x: f32,
    pub offset_y: f32,
    pub advance_x: f32,
}

/// Glyph atlas held in CPU memory
///
/// The texture handle is unset (handle 0) until
/// [`BitmapFontAtlas::upload`] hands the image to a rasterizer.
#[derive(Debug, Clone)]
pub struct BitmapFontAtlas {
    baseline_size: u32,
    glyphs: Vec<GlyphInfo>,
    index: HashMap<char, usize>,
    fallback: usize,
    image: AtlasImage,
    texture: TextureHandle,
}

impl BitmapFontAtlas {
    /// Assemble an atlas from glyph metadata and its texture
    ///
    /// The fallback glyph is `?` when present, otherwise the first glyph.
    pub fn from_parts(baseline_size: u32, glyphs: Vec<GlyphInfo>, image: AtlasImage) -> FontResult<Self> {
        if glyphs.is_empty() {
            return Err(FontError::EmptyAtlas);
        }

        let mut index = HashMap::with_capacity(glyphs.len());
        for (i, glyph) in glyphs.iter().enumerate() {
            index.entry(glyph.codepoint).or_insert(i);
        }
        let fallback = index.get(&'?').copied().unwrap_or(0);

        Ok(Self {
            baseline_size,
            glyphs,
            index,
            fallback,
            image,
            texture: TextureHandle(0),
        })
    }

    /// Rasterize printable ASCII from TrueType/OpenType font data
    ///
    /// # Example
    ///
    /// ```no_run
    /// use text3d::render::text::BitmapFontAtlas;
    ///
    /// let font_bytes = std::fs::read("resources/fonts/default.ttf")?;
    /// let atlas = BitmapFontAtlas::from_ttf(&font_bytes, 48.0)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_ttf(font_data: &[u8], pixel_size: f32) -> FontResult<Self> {
        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| FontError::LoadError(format!("fontdue error: {e}")))?;

        let ascent = font
            .horizontal_line_metrics(pixel_size)
            .map_or(pixel_size, |metrics| metrics.ascent);

        let rasterized: Vec<RasterGlyph> = (ASCII_START..=ASCII_END)
            .filter_map(char::from_u32)
            .map(|codepoint| {
                let (metrics, coverage) = font.rasterize(codepoint, pixel_size);
                RasterGlyph {
                    codepoint,
                    width: metrics.width as u32,
                    height: metrics.height as u32,
                    coverage,
                    offset_x: metrics.xmin as f32,
                    offset_y: ascent - (metrics.ymin as f32 + metrics.height as f32),
                    advance_x: metrics.advance_width,
                }
            })
            .collect();

        log::info!(
            "Rasterized {} glyphs at {}px",
            rasterized.len(),
            pixel_size
        );

        Self::from_raster_glyphs(pixel_size.round().max(1.0) as u32, &rasterized)
    }

    /// Build an atlas from a BMFont text descriptor and its page image
    pub fn from_bmfont(descriptor: &str, page: AtlasImage) -> FontResult<Self> {
        let descriptor = BmFontDescriptor::parse(descriptor)?;
        Self::from_parts(descriptor.line_height, descriptor.glyphs, page)
    }

    /// Load a font file, picking the format from its extension
    ///
    /// `.ttf` and `.otf` files are rasterized at `pixel_size`; `.fnt` files
    /// carry their own size and reference their page image relative to the
    /// descriptor.
    pub fn load(path: impl AsRef<Path>, pixel_size: f32) -> FontResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let atlas = match extension.as_deref() {
            Some("ttf" | "otf") => Self::from_ttf(&std::fs::read(path)?, pixel_size)?,
            Some("fnt") => Self::load_bmfont(path)?,
            _ => return Err(FontError::UnsupportedFormat(path.display().to_string())),
        };

        log::info!(
            "Loaded font {} ({} glyphs, baseline {}px)",
            path.display(),
            atlas.glyph_count(),
            atlas.baseline_size()
        );
        Ok(atlas)
    }

    fn load_bmfont(path: &Path) -> FontResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let descriptor = BmFontDescriptor::parse(&text)?;

        let page_file = descriptor
            .pages
            .first()
            .ok_or_else(|| FontError::LoadError("BMFont descriptor names no page".to_string()))?;
        if descriptor.pages.len() > 1 {
            log::warn!(
                "{} has {} pages, only the first is used",
                path.display(),
                descriptor.pages.len()
            );
        }

        let page_path = path.parent().unwrap_or_else(|| Path::new("")).join(page_file);
        let page = load_page_image(&page_path)?;
        Self::from_parts(descriptor.line_height, descriptor.glyphs, page)
    }

    /// Pack coverage bitmaps into a fresh atlas
    pub(crate) fn from_raster_glyphs(baseline_size: u32, rasterized: &[RasterGlyph]) -> FontResult<Self> {
        if rasterized.is_empty() {
            return Err(FontError::EmptyAtlas);
        }

        let (width, height, placements) = pack_shelves(rasterized);
        let mut image = AtlasImage::new(width, height);
        let mut glyphs = Vec::with_capacity(rasterized.len());

        for (glyph, (x, y)) in rasterized.iter().zip(placements) {
            image.blit_coverage(x, y, glyph.width, glyph.height, &glyph.coverage);
            glyphs.push(GlyphInfo {
                codepoint: glyph.codepoint,
                source_rect: Rect::new(x as f32, y as f32, glyph.width as f32, glyph.height as f32),
                offset_x: glyph.offset_x,
                offset_y: glyph.offset_y,
                advance_x: glyph.advance_x,
            });
        }

        log::debug!("Atlas packed: {}x{}, {} glyphs", width, height, glyphs.len());
        Self::from_parts(baseline_size, glyphs, image)
    }

    /// Hand the atlas image to a rasterizer and remember the texture handle
    pub fn upload<U: TextureUploader + ?Sized>(&mut self, uploader: &mut U) -> FontResult<TextureHandle> {
        let handle = uploader.upload_texture(&self.image)?;
        self.texture = handle;
        log::info!("Font atlas uploaded: {:?}", handle);
        Ok(handle)
    }

    /// Atlas pixels
    pub fn image(&self) -> &AtlasImage {
        &self.image
    }

    /// Glyph metadata for a codepoint
    pub fn glyph_for(&self, codepoint: char) -> Option<&GlyphInfo> {
        self.glyph_index(codepoint).and_then(|i| self.glyphs.get(i))
    }
}

impl FontAtlas for BitmapFontAtlas {
    fn baseline_size(&self) -> u32 {
        self.baseline_size
    }

    fn glyph_index(&self, codepoint: char) -> Option<usize> {
        self.index.get(&codepoint).copied()
    }

    fn fallback_index(&self) -> usize {
        self.fallback
    }

    fn glyph(&self, index: usize) -> Option<&GlyphInfo> {
        self.glyphs.get(index)
    }

    fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    fn texture(&self) -> TextureHandle {
        self.texture
    }
}

/// Decode a BMFont page; images without alpha use their luminance as coverage
fn load_page_image(path: &Path) -> FontResult<AtlasImage> {
    let decoded = image::open(path)
        .map_err(|e| FontError::LoadError(format!("{}: {e}", path.display())))?;

    let page = if decoded.color().has_alpha() {
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        AtlasImage::from_rgba8(width, height, rgba.into_raw())?
    } else {
        let luma = decoded.to_luma8();
        let (width, height) = luma.dimensions();
        AtlasImage::from_coverage(width, height, luma.as_raw())?
    };

    Ok(page)
}

/// Place glyphs left-to-right in rows, growing a square power-of-two texture
fn pack_shelves(glyphs: &[RasterGlyph]) -> (u32, u32, Vec<(u32, u32)>) {
    let widest = glyphs.iter().map(|g| g.width).max().unwrap_or(0) + 2 * GLYPH_PADDING;
    let mut size = widest.next_power_of_two().max(64);

    loop {
        let mut placements = Vec::with_capacity(glyphs.len());
        let (mut x, mut y, mut row_height) = (GLYPH_PADDING, GLYPH_PADDING, 0);

        for glyph in glyphs {
            if x + glyph.width + GLYPH_PADDING > size {
                x = GLYPH_PADDING;
                y += row_height + GLYPH_PADDING;
                row_height = 0;
            }
            placements.push((x, y));
            x += glyph.width + GLYPH_PADDING;
            row_height = row_height.max(glyph.height);
        }

        let used_height = y + row_height + GLYPH_PADDING;
        if used_height <= size {
            return (size, used_height.next_power_of_two(), placements);
        }
        size *= 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(codepoint: char, width: u32, height: u32) -> RasterGlyph {
        RasterGlyph {
            codepoint,
            width,
            height,
            coverage: vec![255; (width * height) as usize],
            offset_x: 0.0,
            offset_y: 0.0,
            advance_x: width as f32,
        }
    }

    #[test]
    fn test_packed_glyphs_do_not_overlap() {
        let glyphs: Vec<_> = "ABCDEFGHIJ".chars().map(|c| glyph(c, 30, 40)).collect();
        let atlas = BitmapFontAtlas::from_raster_glyphs(40, &glyphs).unwrap();

        let rects: Vec<Rect> = (0..atlas.glyph_count())
            .map(|i| atlas.glyph(i).unwrap().source_rect)
            .collect();
        for (i, a) in rects.iter().enumerate() {
            assert!(a.x + a.width <= atlas.image().width() as f32);
            assert!(a.y + a.height <= atlas.image().height() as f32);
            for b in &rects[i + 1..] {
                let disjoint = a.x + a.width <= b.x
                    || b.x + b.width <= a.x
                    || a.y + a.height <= b.y
                    || b.y + b.height <= a.y;
                assert!(disjoint, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_fallback_prefers_question_mark() {
        let glyphs = vec![glyph('A', 4, 4), glyph('?', 4, 4)];
        let atlas = BitmapFontAtlas::from_raster_glyphs(4, &glyphs).unwrap();

        assert_eq!(atlas.fallback_index(), 1);
        assert_eq!(atlas.lookup('A'), 0);
        assert_eq!(atlas.lookup('\u{2603}'), 1);
    }

    #[test]
    fn test_fallback_without_question_mark_is_first_glyph() {
        let atlas = BitmapFontAtlas::from_raster_glyphs(4, &[glyph('x', 2, 2)]).unwrap();
        assert_eq!(atlas.lookup('y'), 0);
    }

    #[test]
    fn test_empty_atlas_is_rejected() {
        assert!(matches!(
            BitmapFontAtlas::from_raster_glyphs(4, &[]),
            Err(FontError::EmptyAtlas)
        ));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        assert!(matches!(
            BitmapFontAtlas::load("font.woff2", 32.0),
            Err(FontError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_invalid_ttf_data_is_a_load_error() {
        assert!(matches!(
            BitmapFontAtlas::from_ttf(b"not a font", 32.0),
            Err(FontError::LoadError(_))
        ));
    }
}
