//! Line layout
//!
//! Walks text once with a world-space cursor. Every glyph cell is
//! `font_size + font_spacing` wide no matter what the font's own advance is,
//! so animated text keeps a fixed grid. A newline returns the cursor to the
//! starting x and moves it `font_size + line_spacing` along Z.

use std::str::Chars;

use crate::foundation::math::Vec3;
use crate::render::rasterizer::Rasterizer;
use crate::render::RenderResult;

use super::emitter::{draw_letter_boundary, emit_codepoint};
use super::font_atlas::FontAtlas;
use super::style::{TextDebugFlags, TextStyle};
use super::wave::WAVE_SENTINEL;

/// A glyph and the cursor position it is drawn at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    /// Codepoint to draw
    pub codepoint: char,
    /// Cursor before advancing past this glyph
    pub cursor: Vec3,
    /// Whether a wave span was open when the glyph was reached
    pub waving: bool,
}

/// Iterator over the glyphs of a text and where they go
///
/// Newlines move the cursor and yield nothing. With markup enabled, the wave
/// sentinel toggles the wave flag and also yields nothing; the flag carries
/// across newlines.
#[derive(Debug, Clone)]
pub struct LayoutWalker<'t> {
    chars: Chars<'t>,
    origin_x: f32,
    cursor: Vec3,
    advance: f32,
    line_advance: f32,
    markup: bool,
    wave_active: bool,
}

impl<'t> LayoutWalker<'t> {
    /// Walk `text` starting at `origin`, spaced by `style`
    pub fn new(text: &'t str, origin: Vec3, style: &TextStyle) -> Self {
        Self {
            chars: text.chars(),
            origin_x: origin.x,
            cursor: origin,
            advance: style.advance(),
            line_advance: style.line_advance(),
            markup: false,
            wave_active: false,
        }
    }

    /// Treat the wave sentinel as markup instead of a glyph
    #[must_use]
    pub fn with_markup(mut self) -> Self {
        self.markup = true;
        self
    }

    /// Where the next glyph would go
    pub fn cursor(&self) -> Vec3 {
        self.cursor
    }

    /// Whether a wave span is currently open
    pub fn wave_active(&self) -> bool {
        self.wave_active
    }
}

impl Iterator for LayoutWalker<'_> {
    type Item = PlacedGlyph;

    fn next(&mut self) -> Option<PlacedGlyph> {
        loop {
            let codepoint = self.chars.next()?;

            if codepoint == '\n' {
                self.cursor.x = self.origin_x;
                self.cursor.z += self.line_advance;
                continue;
            }

            if self.markup && codepoint == WAVE_SENTINEL {
                self.wave_active = !self.wave_active;
                continue;
            }

            let placed = PlacedGlyph {
                codepoint,
                cursor: self.cursor,
                waving: self.wave_active,
            };
            self.cursor.x += self.advance;
            return Some(placed);
        }
    }
}

/// What a text draw produced
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextDrawSummary {
    /// Cursor after the last codepoint
    pub cursor: Vec3,
    /// Glyph cells walked (sentinels and newlines excluded)
    pub glyphs: usize,
    /// Quads submitted to the rasterizer
    pub quads: usize,
    /// Wave flag at the end of the text
    pub wave_active: bool,
}

impl TextDrawSummary {
    /// Fold another summary into this one, keeping the later cursor
    pub fn merge(&mut self, other: Self) {
        self.cursor = other.cursor;
        self.glyphs += other.glyphs;
        self.quads += other.quads;
        self.wave_active = other.wave_active;
    }
}

/// Draw `text` with its first glyph's top-left at `position`
pub fn draw_text<F, R>(
    rasterizer: &mut R,
    font: &F,
    text: &str,
    position: Vec3,
    style: &TextStyle,
) -> RenderResult<TextDrawSummary>
where
    F: FontAtlas + ?Sized,
    R: Rasterizer + ?Sized,
{
    let mut walker = LayoutWalker::new(text, position, style);
    let mut summary = TextDrawSummary::default();

    for placed in walker.by_ref() {
        summary.glyphs += 1;
        summary.quads += draw_glyph(rasterizer, font, placed.codepoint, placed.cursor, style)?;
    }

    summary.cursor = walker.cursor();
    Ok(summary)
}

/// Emit one glyph plus its debug box, returning the number of quads drawn
pub(crate) fn draw_glyph<F, R>(
    rasterizer: &mut R,
    font: &F,
    codepoint: char,
    at: Vec3,
    style: &TextStyle,
) -> RenderResult<usize>
where
    F: FontAtlas + ?Sized,
    R: Rasterizer + ?Sized,
{
    let Some(dest) = emit_codepoint(
        rasterizer,
        font,
        codepoint,
        at,
        style.font_size,
        style.backface,
        style.tint,
    )?
    else {
        return Ok(0);
    };

    if style.debug.contains(TextDebugFlags::LETTER_BOUNDARY) {
        draw_letter_boundary(rasterizer, dest, at.y)?;
    }

    Ok(1 + usize::from(style.backface))
}
