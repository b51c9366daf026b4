//! Layered extrusion
//!
//! Text is drawn several times, each copy a fixed distance below the last.
//! Seen at an angle the copies read as a solid extruded block. Each layer can
//! take its own color from a palette.

use rand::Rng;

use crate::foundation::color::{generate_random_color, Color};
use crate::foundation::math::Vec3;
use crate::render::rasterizer::Rasterizer;
use crate::render::RenderResult;

use super::font_atlas::FontAtlas;
use super::layout::{draw_text, TextDrawSummary};
use super::style::TextStyle;
use super::wave::{draw_text_wave, WaveConfig};

/// Upper bound on the number of layers
pub const MAX_LAYERS: usize = 32;

/// One color per layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerPalette {
    colors: [Color; MAX_LAYERS],
}

impl LayerPalette {
    /// Every layer the same color
    pub fn uniform(color: Color) -> Self {
        Self {
            colors: [color; MAX_LAYERS],
        }
    }

    /// Random hues at saturation 0.5 and value 0.8 with random alpha
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut colors = [Color::BLANK; MAX_LAYERS];
        for color in &mut colors {
            *color = generate_random_color(rng, 0.5, 0.8).with_alpha(rng.gen());
        }
        Self { colors }
    }

    /// Color of layer `k`, wrapping past [`MAX_LAYERS`]
    pub fn get(&self, k: usize) -> Color {
        self.colors[k % MAX_LAYERS]
    }

    /// All colors
    pub fn colors(&self) -> &[Color; MAX_LAYERS] {
        &self.colors
    }
}

/// Layer count, spacing, and optional palette
#[derive(Debug, Clone, PartialEq)]
pub struct LayerCompositor {
    layers: usize,
    /// Vertical distance between consecutive layers; negative stacks upward
    pub layer_distance: f32,
    palette: Option<LayerPalette>,
}

impl LayerCompositor {
    /// `layers` copies spaced `layer_distance` apart, clamped to `1..=MAX_LAYERS`
    pub fn new(layers: usize, layer_distance: f32) -> Self {
        Self {
            layers: layers.clamp(1, MAX_LAYERS),
            layer_distance,
            palette: None,
        }
    }

    /// Number of layers
    pub fn layers(&self) -> usize {
        self.layers
    }

    /// Set the layer count, clamped to `1..=MAX_LAYERS`
    pub fn set_layers(&mut self, layers: usize) {
        self.layers = layers.clamp(1, MAX_LAYERS);
    }

    /// Add one layer, up to [`MAX_LAYERS`]
    pub fn increase_layers(&mut self) {
        self.set_layers(self.layers + 1);
    }

    /// Remove one layer, keeping at least one
    pub fn decrease_layers(&mut self) {
        self.set_layers(self.layers.saturating_sub(1));
    }

    /// Palette in use, if multicolor mode is on
    pub fn palette(&self) -> Option<&LayerPalette> {
        self.palette.as_ref()
    }

    /// Switch multicolor mode
    ///
    /// Turning it on draws a fresh random palette every time; turning it off
    /// drops the palette so every layer uses the style tint.
    pub fn set_multicolor<R: Rng + ?Sized>(&mut self, enabled: bool, rng: &mut R) {
        self.palette = enabled.then(|| LayerPalette::random(rng));
        log::debug!("Multicolor layers {}", if enabled { "on" } else { "off" });
    }

    /// Use a fixed palette
    pub fn set_palette(&mut self, palette: Option<LayerPalette>) {
        self.palette = palette;
    }

    /// Origin of layer `k`
    pub fn layer_position(&self, position: Vec3, k: usize) -> Vec3 {
        Vec3::new(position.x, position.y - k as f32 * self.layer_distance, position.z)
    }

    /// Tint of layer `k`
    pub fn layer_tint(&self, k: usize, base: Color) -> Color {
        self.palette.map_or(base, |palette| palette.get(k))
    }
}

impl Default for LayerCompositor {
    fn default() -> Self {
        Self::new(8, 0.01)
    }
}

/// Draw `text` once per layer of `compositor`
///
/// With a wave, every layer animates identically so the extrusion moves as
/// one block.
pub fn draw_layered<F, R>(
    rasterizer: &mut R,
    font: &F,
    text: &str,
    position: Vec3,
    style: &TextStyle,
    compositor: &LayerCompositor,
    wave: Option<(&WaveConfig, f32)>,
) -> RenderResult<TextDrawSummary>
where
    F: FontAtlas + ?Sized,
    R: Rasterizer + ?Sized,
{
    let mut summary = TextDrawSummary {
        cursor: position,
        ..TextDrawSummary::default()
    };

    for k in 0..compositor.layers() {
        let layer_style = style.tinted(compositor.layer_tint(k, style.tint));
        let at = compositor.layer_position(position, k);

        let layer = match wave {
            Some((wave, time)) => draw_text_wave(rasterizer, font, text, at, &layer_style, wave, time)?,
            None => draw_text(rasterizer, font, text, at, &layer_style)?,
        };
        summary.merge(layer);
    }

    Ok(summary)
}
