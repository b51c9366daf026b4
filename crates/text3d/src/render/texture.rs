//! CPU-side RGBA8 texture data

use crate::foundation::color::Color;

use super::{RenderError, RenderResult};

/// RGBA8 image owned by a font atlas
///
/// Glyph atlases are stored as white pixels whose alpha carries the glyph
/// coverage, so tinting with a vertex color gives colored text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl AtlasImage {
    /// Fully transparent image
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    /// Wrap raw RGBA8 pixels
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> RenderResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if pixels.len() != expected {
            return Err(RenderError::InvalidTexture(format!(
                "{}x{} RGBA needs {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// White image whose alpha is the given single-channel coverage
    pub fn from_coverage(width: u32, height: u32, coverage: &[u8]) -> RenderResult<Self> {
        let expected = (width as usize) * (height as usize);
        if coverage.len() != expected {
            return Err(RenderError::InvalidTexture(format!(
                "{}x{} coverage needs {} bytes, got {}",
                width,
                height,
                expected,
                coverage.len()
            )));
        }

        let pixels = coverage.iter().flat_map(|&a| [255, 255, 255, a]).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        Some(Color::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ))
    }

    /// Overwrite the pixel at `(x, y)`; writes outside the image are dropped
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }

    /// Copy a single-channel coverage bitmap into the image at `(x, y)`
    pub fn blit_coverage(&mut self, x: u32, y: u32, width: u32, height: u32, coverage: &[u8]) {
        for row in 0..height {
            for col in 0..width {
                let src = (row as usize) * (width as usize) + col as usize;
                if let Some(&alpha) = coverage.get(src) {
                    self.set_pixel(x + col, y + row, Color::WHITE.with_alpha(alpha));
                }
            }
        }
    }

    /// Nearest-neighbour lookup at texel coordinates, clamped to the edges
    pub fn sample_nearest(&self, u: f32, v: f32) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::BLANK;
        }

        let x = (u.floor().max(0.0) as u32).min(self.width - 1);
        let y = (v.floor().max(0.0) as u32).min(self.height - 1);
        self.pixel(x, y).unwrap_or(Color::BLANK)
    }
}
