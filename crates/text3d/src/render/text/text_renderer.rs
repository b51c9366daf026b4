//! Text rendering facade
//!
//! Bundles a font with a style, an optional wave, and a layer compositor so a
//! frame loop can draw a string with one call.

use crate::foundation::math::Vec3;
use crate::render::rasterizer::{Rasterizer, ShaderHandle};
use crate::render::RenderResult;

use super::font_atlas::FontAtlas;
use super::layers::{draw_layered, LayerCompositor};
use super::layout::TextDrawSummary;
use super::measure::{centered_position, draw_text_boundary, measure_wave};
use super::style::{TextDebugFlags, TextStyle};
use super::wave::WaveConfig;

/// Draws text with one font and a fixed set of options
pub struct TextRenderer<'f, F: FontAtlas + ?Sized> {
    font: &'f F,
    /// Layout and tint
    pub style: TextStyle,
    /// Wave applied to `~` spans; `None` draws sentinels as plain glyphs
    pub wave: Option<WaveConfig>,
    /// Layer count, spacing and palette
    pub compositor: LayerCompositor,
    /// Shader bound around every draw
    pub shader: Option<ShaderHandle>,
}

impl<'f, F: FontAtlas + ?Sized> TextRenderer<'f, F> {
    /// Single-layer renderer without wave or shader
    pub fn new(font: &'f F, style: TextStyle) -> Self {
        Self {
            font,
            style,
            wave: None,
            compositor: LayerCompositor::new(1, 0.0),
            shader: None,
        }
    }

    /// Animate `~` spans with `wave`
    #[must_use]
    pub fn with_wave(mut self, wave: WaveConfig) -> Self {
        self.wave = Some(wave);
        self
    }

    /// Draw with `compositor`'s layers
    #[must_use]
    pub fn with_compositor(mut self, compositor: LayerCompositor) -> Self {
        self.compositor = compositor;
        self
    }

    /// Bind `shader` around every draw
    #[must_use]
    pub fn with_shader(mut self, shader: ShaderHandle) -> Self {
        self.shader = Some(shader);
        self
    }

    /// Font in use
    pub fn font(&self) -> &'f F {
        self.font
    }

    /// Extent of `text` in the current style
    pub fn measure(&self, text: &str) -> Vec3 {
        measure_wave(
            self.font,
            text,
            self.style.font_size,
            self.style.font_spacing,
            self.style.line_spacing,
        )
    }

    /// Draw `text` with its top-left at `position`
    ///
    /// `time` drives the wave and is ignored without one. The caller must be
    /// inside a 3D block.
    pub fn draw<R: Rasterizer + ?Sized>(
        &self,
        rasterizer: &mut R,
        text: &str,
        position: Vec3,
        time: f32,
    ) -> RenderResult<TextDrawSummary> {
        if let Some(shader) = self.shader {
            rasterizer.begin_shader(shader)?;
        }

        let result = self.draw_unbracketed(rasterizer, text, position, time);

        if self.shader.is_some() {
            rasterizer.end_shader();
        }
        result
    }

    /// Draw `text` centered on the origin at `elevation`
    pub fn draw_centered<R: Rasterizer + ?Sized>(
        &self,
        rasterizer: &mut R,
        text: &str,
        elevation: f32,
        time: f32,
    ) -> RenderResult<TextDrawSummary> {
        let position = centered_position(self.measure(text), elevation);
        self.draw(rasterizer, text, position, time)
    }

    fn draw_unbracketed<R: Rasterizer + ?Sized>(
        &self,
        rasterizer: &mut R,
        text: &str,
        position: Vec3,
        time: f32,
    ) -> RenderResult<TextDrawSummary> {
        let summary = draw_layered(
            rasterizer,
            self.font,
            text,
            position,
            &self.style,
            &self.compositor,
            self.wave.as_ref().map(|wave| (wave, time)),
        )?;

        if self.style.debug.contains(TextDebugFlags::TEXT_BOUNDARY) {
            draw_text_boundary(rasterizer, position, self.measure(text))?;
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{DrawCommand, RecordingRasterizer};
    use crate::render::text::test_support::flush_atlas;

    #[test]
    fn test_shader_brackets_the_draw() {
        let atlas = flush_atlas();
        let mut raster = RecordingRasterizer::new();
        let renderer = TextRenderer::new(&atlas, TextStyle::default()).with_shader(ShaderHandle(0));

        renderer.draw(&mut raster, "hi", Vec3::zeros(), 0.0).unwrap();

        let commands = raster.commands();
        assert_eq!(commands.first(), Some(&DrawCommand::BeginShader(ShaderHandle(0))));
        assert_eq!(commands.last(), Some(&DrawCommand::EndShader));
    }

    #[test]
    fn test_layers_and_backfaces_multiply() {
        let atlas = flush_atlas();
        let mut raster = RecordingRasterizer::new();
        let renderer = TextRenderer::new(&atlas, TextStyle::default())
            .with_wave(WaveConfig::default())
            .with_compositor(LayerCompositor::new(3, 0.1));

        let summary = renderer.draw(&mut raster, "a~b~", Vec3::zeros(), 0.0).unwrap();

        assert_eq!(summary.quads, 2 * 2 * 3);
        assert_eq!(raster.quad_count(), 12);
    }

    #[test]
    fn test_text_boundary_follows_debug_flag() {
        let atlas = flush_atlas();
        let mut raster = RecordingRasterizer::new();
        let style = TextStyle {
            debug: TextDebugFlags::TEXT_BOUNDARY,
            ..TextStyle::default()
        };

        TextRenderer::new(&atlas, style)
            .draw_centered(&mut raster, "abc", 1.0, 0.0)
            .unwrap();

        let (center, size, _) = raster.cube_wires().next().unwrap();
        assert_eq!(size, renderer_extent(&atlas, style, "abc"));
        assert!(center.x.abs() < 1e-5);
        assert!(center.z.abs() < 1e-5);
    }

    fn renderer_extent(atlas: &crate::render::text::BitmapFontAtlas, style: TextStyle, text: &str) -> Vec3 {
        TextRenderer::new(atlas, style).measure(text)
    }
}
