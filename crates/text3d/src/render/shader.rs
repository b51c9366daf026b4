//! Alpha discard fragment shader
//!
//! Glyph quads are mostly transparent. Blending alone draws nothing there but
//! still writes depth, so later quads behind a glyph's empty corner are lost.
//! The discard shader drops fragments whose tinted alpha is below a
//! threshold, leaving both color and depth untouched.

use std::path::Path;

use crate::foundation::color::Color;

/// GLSL 3.30 source of the alpha discard shader
pub const ALPHA_DISCARD_GLSL330: &str =
    include_str!("../../resources/shaders/glsl330/alpha_discard.fs");

/// GLSL ES 1.00 source of the alpha discard shader
pub const ALPHA_DISCARD_GLSL100: &str =
    include_str!("../../resources/shaders/glsl100/alpha_discard.fs");

/// Alpha below which fragments are discarded
///
/// The GLSL sources hard-code the same value.
pub const DEFAULT_ALPHA_THRESHOLD: f32 = 0.1;

/// Shader loading errors
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    /// No candidate location held the shader file
    #[error("Shader not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// GLSL dialect of a fragment shader source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderDialect {
    /// Desktop GLSL 3.30
    Glsl330,
    /// GLSL ES 1.00 (WebGL, GLES2)
    Glsl100,
}

impl ShaderDialect {
    /// Dialect declared by a `#version` line, defaulting to desktop GLSL
    pub fn detect(source: &str) -> Self {
        let version = source
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with("#version"));

        match version {
            Some(line) if line.contains("100") => Self::Glsl100,
            _ => Self::Glsl330,
        }
    }

    fn directory(self) -> &'static str {
        match self {
            Self::Glsl330 => "glsl330",
            Self::Glsl100 => "glsl100",
        }
    }
}

/// Configuration for shader loading
#[derive(Debug, Clone)]
pub struct ShaderConfig {
    /// Path to the fragment shader source
    pub fragment_shader_path: String,
}

impl ShaderConfig {
    /// Create a new shader configuration
    pub fn new(fragment_path: impl Into<String>) -> Self {
        Self {
            fragment_shader_path: fragment_path.into(),
        }
    }

    /// Create shader config with automatic path resolution
    ///
    /// This tries multiple common locations for shaders, useful for
    /// applications that might be run from different working directories.
    pub fn with_path_resolution(base_fragment: &str, dialect: ShaderDialect) -> Self {
        Self {
            fragment_shader_path: Self::resolve_shader_path(base_fragment, dialect),
        }
    }

    /// Resolve shader path by checking multiple common locations
    fn resolve_shader_path(base_path: &str, dialect: ShaderDialect) -> String {
        if Path::new(base_path).exists() {
            return base_path.to_string();
        }

        let Some(file_name) = Path::new(base_path).file_name().and_then(|n| n.to_str()) else {
            return base_path.to_string();
        };

        let candidates = [
            format!("resources/shaders/{}/{}", dialect.directory(), file_name),
            format!("crates/text3d/resources/shaders/{}/{}", dialect.directory(), file_name),
            format!("../resources/shaders/{}/{}", dialect.directory(), file_name),
        ];

        candidates
            .into_iter()
            .find(|candidate| Path::new(candidate).exists())
            .unwrap_or_else(|| base_path.to_string())
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self::with_path_resolution("alpha_discard.fs", ShaderDialect::Glsl330)
    }
}

/// Fragment shader that discards nearly transparent texels
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaDiscardShader {
    dialect: ShaderDialect,
    source: String,
    threshold: f32,
}

impl AlphaDiscardShader {
    /// The built-in source for `dialect`
    pub fn builtin(dialect: ShaderDialect) -> Self {
        let source = match dialect {
            ShaderDialect::Glsl330 => ALPHA_DISCARD_GLSL330,
            ShaderDialect::Glsl100 => ALPHA_DISCARD_GLSL100,
        };

        Self {
            dialect,
            source: source.to_string(),
            threshold: DEFAULT_ALPHA_THRESHOLD,
        }
    }

    /// Load the source named by `config`
    pub fn load(config: &ShaderConfig) -> Result<Self, ShaderError> {
        let path = Path::new(&config.fragment_shader_path);
        if !path.exists() {
            return Err(ShaderError::NotFound(config.fragment_shader_path.clone()));
        }

        let source = std::fs::read_to_string(path)?;
        let dialect = ShaderDialect::detect(&source);
        log::info!("Loaded {:?} fragment shader from {}", dialect, path.display());

        Ok(Self {
            dialect,
            source,
            threshold: DEFAULT_ALPHA_THRESHOLD,
        })
    }

    /// Override the threshold used by CPU backends
    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// GLSL dialect of the source
    pub fn dialect(&self) -> ShaderDialect {
        self.dialect
    }

    /// GLSL source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Alpha below which fragments are discarded
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Shade one fragment
    pub fn shade(&self, texel: Color, vertex_color: Color) -> Option<Color> {
        shade(texel, vertex_color, self.threshold)
    }
}

impl Default for AlphaDiscardShader {
    fn default() -> Self {
        Self::builtin(ShaderDialect::Glsl330)
    }
}

/// Multiply `texel` by `vertex_color`, or `None` if the result is too transparent
pub fn shade(texel: Color, vertex_color: Color, threshold: f32) -> Option<Color> {
    let color = texel.modulate(vertex_color);
    if f32::from(color.a) / 255.0 < threshold {
        None
    } else {
        Some(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_sources_discard_at_threshold() {
        for dialect in [ShaderDialect::Glsl330, ShaderDialect::Glsl100] {
            let shader = AlphaDiscardShader::builtin(dialect);
            assert!(shader.source().contains("discard"));
            assert!(shader.source().contains("0.1"));
            assert_eq!(ShaderDialect::detect(shader.source()), dialect);
        }
    }

    #[test]
    fn test_shade_discards_transparent_texels() {
        let threshold = DEFAULT_ALPHA_THRESHOLD;

        assert_eq!(shade(Color::BLANK, Color::WHITE, threshold), None);
        assert_eq!(shade(Color::WHITE.with_alpha(20), Color::WHITE, threshold), None);
        assert_eq!(shade(Color::WHITE, Color::RED, threshold), Some(Color::RED));
    }

    #[test]
    fn test_shade_uses_tinted_alpha() {
        let faint_tint = Color::WHITE.with_alpha(20);
        assert_eq!(shade(Color::WHITE, faint_tint, 0.1), None);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let config = ShaderConfig::new("does/not/exist.fs");
        assert!(matches!(
            AlphaDiscardShader::load(&config),
            Err(ShaderError::NotFound(_))
        ));
    }
}
