//! Scene configuration for the text demo

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::foundation::color::Color;
use crate::foundation::math::Vec3;
use crate::render::text::{TextStyle, WaveConfig, MAX_LAYERS};

/// Everything needed to render a text scene
///
/// Missing keys fall back to [`SceneConfig::default`], so a file only needs
/// to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Main text, may contain `~` wave markers
    pub text: String,

    /// Flat text drawn behind the main text
    pub background_text: String,

    /// Font file (`.ttf`, `.otf` or `.fnt`); the built-in font is used when unset
    pub font_path: Option<String>,

    /// Pixel size the font is rasterized at
    pub font_pixel_size: f32,

    /// Styling of the main text
    pub style: TextStyle,

    /// Whether `~` markers animate the text
    pub wave_enabled: bool,

    /// Wave parameters
    pub wave: WaveConfig,

    /// Number of extruded layers
    pub layers: usize,

    /// Vertical distance between layers; negative values stack upwards
    pub layer_distance: f32,

    /// Tint every layer with its own random color
    pub multicolor: bool,

    /// Seed for the layer palette; a random seed is used when unset
    pub seed: Option<u64>,

    /// Bind the alpha discard shader while drawing text
    pub alpha_discard: bool,

    /// Fragment shader file overriding the built-in alpha discard source
    pub shader_path: Option<String>,

    /// Height of the main text plane
    pub elevation: f32,

    /// Initial camera position
    pub camera_position: Vec3,

    /// Vertical field of view in degrees
    pub fovy: f32,

    /// Orbit speed around the scene origin in radians per second
    pub orbit_speed: f32,

    /// Frame width in pixels
    pub width: u32,

    /// Frame height in pixels
    pub height: u32,

    /// Number of frames to render
    pub frames: u32,

    /// Seconds between frames
    pub frame_delta: f32,

    /// Clear color
    pub background: Color,

    /// Directory frames are written to
    pub output_dir: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            text: "Hello ~World~ in 3D!".to_string(),
            background_text: "Background Text".to_string(),
            font_path: None,
            font_pixel_size: 32.0,
            style: TextStyle::default(),
            wave_enabled: true,
            wave: WaveConfig::default(),
            layers: 8,
            layer_distance: 0.01,
            multicolor: false,
            seed: None,
            alpha_discard: true,
            shader_path: None,
            elevation: 2.5,
            camera_position: Vec3::new(-10.0, 15.0, -10.0),
            fovy: 45.0,
            orbit_speed: 0.25,
            width: 800,
            height: 450,
            frames: 1,
            frame_delta: 1.0 / 60.0,
            background: Color::RAYWHITE,
            output_dir: "frames".to_string(),
        }
    }
}

impl Config for SceneConfig {}

impl SceneConfig {
    /// Reject values the renderer cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };

        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.font_pixel_size) {
            return invalid("font_pixel_size", "must be positive");
        }
        if !positive(self.style.font_size) {
            return invalid("style.font_size", "must be positive");
        }
        if self.layers == 0 || self.layers > MAX_LAYERS {
            return invalid("layers", &format!("must be between 1 and {MAX_LAYERS}"));
        }
        if !self.layer_distance.is_finite() {
            return invalid("layer_distance", "must be finite");
        }
        if self.width == 0 || self.height == 0 {
            return invalid("width/height", "frame must not be empty");
        }
        if !positive(self.fovy) || self.fovy >= 180.0 {
            return invalid("fovy", "must be between 0 and 180 degrees");
        }
        if !self.frame_delta.is_finite() || self.frame_delta < 0.0 {
            return invalid("frame_delta", "must be finite and not negative");
        }

        Ok(())
    }

    /// Width over height of the output frames
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SceneConfig::from_toml("text = \"Hi\"\nlayers = 3\n").unwrap();

        assert_eq!(config.text, "Hi");
        assert_eq!(config.layers, 3);
        assert_eq!(config.background_text, "Background Text");
        assert_eq!(config.style, TextStyle::default());
    }

    #[test]
    fn test_validate_rejects_out_of_range_layers() {
        let config = SceneConfig {
            layers: MAX_LAYERS + 1,
            ..SceneConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "layers", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_font_size() {
        let mut config = SceneConfig::default();
        config.style.font_size = 0.0;

        assert!(config.validate().is_err());
    }
}
