//! Wave markup
//!
//! `~` opens and closes wave spans. Glyphs inside a span are drawn displaced
//! by a per-axis sinusoid of time and of their undisplaced cursor position,
//! so neighbouring letters bob out of phase while the baseline stays put.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::render::rasterizer::Rasterizer;
use crate::render::RenderResult;

use super::font_atlas::FontAtlas;
use super::layout::{draw_glyph, LayoutWalker, TextDrawSummary};
use super::style::TextStyle;

/// Markup codepoint toggling wave spans
pub const WAVE_SENTINEL: char = '~';

/// Per-axis wave parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Amplitude in world units
    pub range: Vec3,
    /// Angular speed in radians per second
    pub speed: Vec3,
    /// Phase change per world unit of cursor travel
    pub offset: Vec3,
}

impl WaveConfig {
    /// A wave with no amplitude
    pub fn still() -> Self {
        Self {
            range: Vec3::zeros(),
            ..Self::default()
        }
    }

    /// Displacement for a glyph whose cursor is at `cursor`
    pub fn displacement(&self, cursor: Vec3, time: f32) -> Vec3 {
        Vec3::new(
            (time * self.speed.x + cursor.x * self.offset.x).sin() * self.range.x,
            (time * self.speed.y + cursor.y * self.offset.y).sin() * self.range.y,
            (time * self.speed.z + cursor.z * self.offset.z).sin() * self.range.z,
        )
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            range: Vec3::new(0.45, 0.45, 0.45),
            speed: Vec3::new(3.0, 3.0, 0.5),
            offset: Vec3::new(0.35, 0.35, 0.35),
        }
    }
}

/// Draw `text`, animating spans delimited by [`WAVE_SENTINEL`]
///
/// Sentinels draw nothing and do not move the cursor. An odd number of them
/// leaves the last span open to the end of the text.
pub fn draw_text_wave<F, R>(
    rasterizer: &mut R,
    font: &F,
    text: &str,
    position: Vec3,
    style: &TextStyle,
    wave: &WaveConfig,
    time: f32,
) -> RenderResult<TextDrawSummary>
where
    F: FontAtlas + ?Sized,
    R: Rasterizer + ?Sized,
{
    let mut walker = LayoutWalker::new(text, position, style).with_markup();
    let mut summary = TextDrawSummary::default();

    for placed in walker.by_ref() {
        let at = if placed.waving {
            placed.cursor + wave.displacement(placed.cursor, time)
        } else {
            placed.cursor
        };

        summary.glyphs += 1;
        summary.quads += draw_glyph(rasterizer, font, placed.codepoint, at, style)?;
    }

    summary.cursor = walker.cursor();
    summary.wave_active = walker.wave_active();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::RecordingRasterizer;
    use crate::render::text::test_support::flush_atlas;
    use approx::assert_relative_eq;

    fn style() -> TextStyle {
        TextStyle {
            font_size: 1.0,
            font_spacing: 0.0,
            line_spacing: 0.0,
            backface: false,
            ..TextStyle::default()
        }
    }

    #[test]
    fn test_displacement_formula() {
        let wave = WaveConfig::default();
        let cursor = Vec3::new(2.0, 1.0, 0.5);
        let d = wave.displacement(cursor, 1.5);

        assert_relative_eq!(d.x, (1.5f32 * 3.0 + 2.0 * 0.35).sin() * 0.45);
        assert_relative_eq!(d.y, (1.5f32 * 3.0 + 1.0 * 0.35).sin() * 0.45);
        assert_relative_eq!(d.z, (1.5f32 * 0.5 + 0.5 * 0.35).sin() * 0.45);
    }

    #[test]
    fn test_only_marked_glyphs_move() {
        let atlas = flush_atlas();
        let mut raster = RecordingRasterizer::new();
        let wave = WaveConfig::default();

        draw_text_wave(&mut raster, &atlas, "a~b~c", Vec3::zeros(), &style(), &wave, 0.0).unwrap();

        let quads: Vec<_> = raster.quads().copied().collect();
        assert_eq!(quads.len(), 3);
        assert_eq!((quads[0].dest.x, quads[0].elevation), (0.0, 0.0));
        assert_eq!((quads[2].dest.x, quads[2].elevation), (2.0, 0.0));

        let expected = wave.displacement(Vec3::new(1.0, 0.0, 0.0), 0.0);
        assert_relative_eq!(quads[1].dest.x, 1.0 + expected.x);
        assert_relative_eq!(quads[1].elevation, expected.y);
        assert_relative_eq!(quads[1].dest.y, expected.z);
    }

    #[test]
    fn test_cursor_ignores_displacement() {
        let atlas = flush_atlas();
        let mut raster = RecordingRasterizer::new();

        let summary = draw_text_wave(
            &mut raster,
            &atlas,
            "~abc",
            Vec3::zeros(),
            &style(),
            &WaveConfig::default(),
            0.7,
        )
        .unwrap();

        assert_eq!(summary.cursor, Vec3::new(3.0, 0.0, 0.0));
        assert!(summary.wave_active);
    }

    #[test]
    fn test_only_sentinels_emit_nothing() {
        let atlas = flush_atlas();
        let mut raster = RecordingRasterizer::new();

        let summary = draw_text_wave(
            &mut raster,
            &atlas,
            "~~",
            Vec3::new(1.0, 2.0, 3.0),
            &style(),
            &WaveConfig::default(),
            0.0,
        )
        .unwrap();

        assert_eq!(raster.quad_count(), 0);
        assert_eq!(summary.cursor, Vec3::new(1.0, 2.0, 3.0));
        assert!(!summary.wave_active);
    }
}
