//! Text styling shared by every draw call

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::foundation::color::Color;

/// Edge length of the letter and text boundary boxes along Y
pub const LETTER_BOUNDARY_SIZE: f32 = 0.25;

/// Color of letter boundary boxes
pub const LETTER_BOUNDARY_COLOR: Color = Color::VIOLET;

/// Color of the whole-text boundary box
pub const TEXT_BOUNDARY_COLOR: Color = Color::RED;

bitflags! {
    /// Debug overlays drawn alongside text
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TextDebugFlags: u8 {
        /// A wire box around every glyph quad
        const LETTER_BOUNDARY = 1 << 0;
        /// A wire box around the measured text extent
        const TEXT_BOUNDARY = 1 << 1;
    }
}

/// How a run of text is laid out and tinted
///
/// Sizes are world units. `font_size` is the height of one line of glyphs;
/// the atlas pixels are scaled by `font_size / baseline_size`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Glyph height in world units
    pub font_size: f32,
    /// Extra gap between glyph cells
    pub font_spacing: f32,
    /// Extra gap between lines (may be negative)
    pub line_spacing: f32,
    /// Also emit a mirrored quad readable from below
    pub backface: bool,
    /// Color multiplied with the atlas
    pub tint: Color,
    /// Debug overlays
    pub debug: TextDebugFlags,
}

impl TextStyle {
    /// Default style with a different size
    pub fn with_size(font_size: f32) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }

    /// Same style with a different tint
    #[must_use]
    pub fn tinted(self, tint: Color) -> Self {
        Self { tint, ..self }
    }

    /// Same style with size and spacings multiplied by `factor`
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            font_size: self.font_size * factor,
            font_spacing: self.font_spacing * factor,
            line_spacing: self.line_spacing * factor,
            ..self
        }
    }

    /// Horizontal distance between consecutive glyph origins
    pub fn advance(&self) -> f32 {
        self.font_size + self.font_spacing
    }

    /// Distance between consecutive line origins along Z
    pub fn line_advance(&self) -> f32 {
        self.font_size + self.line_spacing
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 0.8,
            font_spacing: 0.05,
            line_spacing: -0.1,
            backface: true,
            tint: Color::DARKBLUE,
            debug: TextDebugFlags::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_advances() {
        let style = TextStyle::default();
        assert_relative_eq!(style.advance(), 0.85, epsilon = 1e-6);
        assert_relative_eq!(style.line_advance(), 0.7, epsilon = 1e-6);
    }

    #[test]
    fn test_scaled_keeps_tint_and_flags() {
        let style = TextStyle {
            debug: TextDebugFlags::LETTER_BOUNDARY,
            ..TextStyle::default()
        }
        .scaled(0.5);

        assert_relative_eq!(style.font_size, 0.4);
        assert_relative_eq!(style.font_spacing, 0.025);
        assert_eq!(style.tint, Color::DARKBLUE);
        assert!(style.debug.contains(TextDebugFlags::LETTER_BOUNDARY));
    }
}
