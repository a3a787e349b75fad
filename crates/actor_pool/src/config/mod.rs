//! Configuration system
//!
//! Pool presets can be loaded from TOML or RON:
//!
//! ```toml
//! default_pool_size = 16
//!
//! [[pools]]
//! tag = "Bullet"
//! initial_size = 10
//! ```

pub use serde::{Serialize, Deserialize};

use std::collections::HashSet;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
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

    /// Configuration parsed but is not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Initial size for the pool registered under `tag`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPreset {
    /// Tag the pool is registered under
    pub tag: String,
    /// Instances built when the pool is created
    pub initial_size: usize,
}

impl PoolPreset {
    /// Create a preset
    pub fn new(tag: impl Into<String>, initial_size: usize) -> Self {
        Self {
            tag: tag.into(),
            initial_size,
        }
    }
}

/// Pool sizing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolingConfig {
    /// Initial size for tags without a preset
    pub default_pool_size: usize,
    /// Per-tag presets
    pub pools: Vec<PoolPreset>,
}

impl Default for PoolingConfig {
    fn default() -> Self {
        Self {
            default_pool_size: 100,
            pools: Vec::new(),
        }
    }
}

impl Config for PoolingConfig {}

impl PoolingConfig {
    /// Add a preset
    pub fn with_pool(mut self, tag: impl Into<String>, initial_size: usize) -> Self {
        self.pools.push(PoolPreset::new(tag, initial_size));
        self
    }

    /// Set the size used for tags without a preset
    pub fn with_default_pool_size(mut self, size: usize) -> Self {
        self.default_pool_size = size;
        self
    }

    /// Initial size for `tag`, falling back to the default size
    pub fn initial_size(&self, tag: &str) -> usize {
        self.pools
            .iter()
            .find(|preset| preset.tag == tag)
            .map_or(self.default_pool_size, |preset| preset.initial_size)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for preset in &self.pools {
            if preset.tag.is_empty() {
                return Err(ConfigError::Invalid("pool tag cannot be empty".to_string()));
            }
            if !seen.insert(preset.tag.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate pool tag: {}", preset.tag)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("actor_pool_{}_{}", std::process::id(), name));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_initial_size_falls_back_to_default() {
        let config = PoolingConfig::default()
            .with_default_pool_size(8)
            .with_pool("Bullet", 10);

        assert_eq!(config.initial_size("Bullet"), 10);
        assert_eq!(config.initial_size("Rocket"), 8);
    }

    #[test]
    fn test_validate_rejects_duplicates_and_empty_tags() {
        let duplicate = PoolingConfig::default().with_pool("Bullet", 1).with_pool("Bullet", 2);
        assert!(matches!(duplicate.validate(), Err(ConfigError::Invalid(_))));

        let empty = PoolingConfig::default().with_pool("", 1);
        assert!(matches!(empty.validate(), Err(ConfigError::Invalid(_))));

        assert!(PoolingConfig::default().with_pool("Bullet", 1).validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config: PoolingConfig = toml::from_str(
            r#"
            default_pool_size = 4

            [[pools]]
            tag = "Bullet"
            initial_size = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.default_pool_size, 4);
        assert_eq!(config.pools, vec![PoolPreset::new("Bullet", 10)]);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: PoolingConfig = toml::from_str("").unwrap();
        assert_eq!(config, PoolingConfig::default());
    }

    #[test]
    fn test_save_and_load_ron() {
        let path = temp_path("pools.ron");
        let config = PoolingConfig::default().with_pool("Spark", 32);

        config.save_to_file(&path).unwrap();
        let loaded = PoolingConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = PoolingConfig::load_from_file("pools.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_)) | Err(ConfigError::UnsupportedFormat(_))));

        let saved = PoolingConfig::default().save_to_file(&temp_path("pools.yaml"));
        assert!(matches!(saved, Err(ConfigError::UnsupportedFormat(_))));
    }
}
