//! Configuration system
//!
//! Configuration is loaded once at startup from TOML or RON, chosen by file
//! extension. Every type has defaults matching the engine's built-in
//! behaviour, so a missing section in a file falls back cleanly.

pub use serde::{Serialize, Deserialize};

use crate::scene::Color;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        let config = Self::from_str_with_format(&contents, path)?;
        log::info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Parse configuration text, using `path` only to pick the format
    fn from_str_with_format(contents: &str, path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value parsed but is out of range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Defaults used when a renderer provisions its fallback bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Edge length of the default mesh body's box geometry
    pub default_mesh_size: f32,
    /// Color of the default mesh body's material (`#rrggbb`)
    pub default_mesh_color: String,
    /// Color of the default sprite body's material (`#rrggbb`)
    pub default_sprite_color: String,
    /// Initial capacity reserved in the target arena
    pub pool_capacity_hint: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            default_mesh_size: 50.0,
            default_mesh_color: "#ff0000".to_string(),
            default_sprite_color: "#ffffff".to_string(),
            pool_capacity_hint: 64,
        }
    }
}

impl RendererConfig {
    /// Parsed default mesh color
    pub fn mesh_color(&self) -> Result<Color, ConfigError> {
        parse_color("default_mesh_color", &self.default_mesh_color)
    }

    /// Parsed default sprite color
    pub fn sprite_color(&self) -> Result<Color, ConfigError> {
        parse_color("default_sprite_color", &self.default_sprite_color)
    }

    /// Check ranges and color strings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.default_mesh_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "default_mesh_size",
                reason: format!("must be positive, got {}", self.default_mesh_size),
            });
        }
        self.mesh_color()?;
        self.sprite_color()?;
        Ok(())
    }
}

/// Defaults for zones built from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Sphere radius when none is given
    pub default_sphere_radius: f32,
    /// Vertex scale applied by mesh zones
    pub default_mesh_scale: f32,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            default_sphere_radius: 100.0,
            default_mesh_scale: 1.0,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Renderer defaults
    pub renderer: RendererConfig,
    /// Zone defaults
    pub zone: ZoneConfig,
    /// Seed for the engine's random source; `None` is non-deterministic
    pub seed: Option<u32>,
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.renderer.validate()?;
        if !(self.zone.default_sphere_radius >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "default_sphere_radius",
                reason: format!("must not be negative, got {}", self.zone.default_sphere_radius),
            });
        }
        Ok(())
    }
}

fn parse_color(field: &'static str, value: &str) -> Result<Color, ConfigError> {
    Color::from_hex(value).ok_or_else(|| ConfigError::Invalid {
        field,
        reason: format!("'{value}' is not a #rrggbb color"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builtin_bodies() {
        let config = EngineConfig::default();

        assert_eq!(config.renderer.default_mesh_size, 50.0);
        assert_eq!(config.renderer.mesh_color().unwrap(), Color::new(1.0, 0.0, 0.0));
        assert_eq!(config.renderer.sprite_color().unwrap(), Color::WHITE);
        assert_eq!(config.zone.default_sphere_radius, 100.0);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let text = r##"
seed = 42

[renderer]
default_mesh_size = 10.0
"##;
        let config = EngineConfig::from_str_with_format(text, "engine.toml").unwrap();

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.renderer.default_mesh_size, 10.0);
        assert_eq!(config.renderer.default_mesh_color, "#ff0000");
        assert_eq!(config.zone, ZoneConfig::default());
    }

    #[test]
    fn test_ron_format() {
        let text = "(zone: (default_sphere_radius: 5.0, default_mesh_scale: 2.0))";
        let config = EngineConfig::from_str_with_format(text, "engine.ron").unwrap();

        assert_eq!(config.zone.default_sphere_radius, 5.0);
        assert_eq!(config.zone.default_mesh_scale, 2.0);
    }

    #[test]
    fn test_unsupported_format() {
        let result = EngineConfig::from_str_with_format("{}", "engine.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = EngineConfig::default();
        config.renderer.default_mesh_color = "red".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "default_mesh_color", .. })
        ));

        let mut config = EngineConfig::default();
        config.renderer.default_mesh_size = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = EngineConfig::default();
        config.seed = Some(7);
        config.renderer.default_sprite_color = "#00ffcc".to_string();
        config.zone.default_sphere_radius = 12.5;

        for name in ["engine.toml", "engine.ron"] {
            let path = dir.path().join(name);
            let path = path.to_str().unwrap();

            config.save_to_file(path).unwrap();
            let loaded = EngineConfig::load_from_file(path).unwrap();
            assert_eq!(loaded, config, "{name}");
        }

        let json = dir.path().join("engine.json");
        assert!(matches!(
            config.save_to_file(json.to_str().unwrap()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = EngineConfig::load_from_file("definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
