//! Configuration system
//!
//! Configuration files are plain serde structures stored as TOML or RON; the
//! format is picked from the file extension.

use std::path::Path;

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
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

    /// A value failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # World Configuration
///
/// Settings for a [`GameWorld`](crate::world::GameWorld) and the binaries that
/// drive one: where documents live, how large the object pool is when no
/// level says otherwise, and which level to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Object capacity used by `GameWorld::initialize_default`
    pub default_capacity: u32,
    /// Root directory that relative template and level paths resolve against
    pub assets_dir: String,
    /// Default log filter for binaries
    pub log_level: String,
    /// Level loaded at startup
    pub start_level: Option<String>,
    /// Where the level is saved on shutdown (`None` = don't save)
    pub save_level: Option<String>,
    /// Number of frames a headless run simulates
    pub frames: u32,
    /// Fixed frame time in seconds for headless runs
    pub frame_time: f32,
}

impl WorldConfig {
    /// Create a new world configuration
    pub fn new() -> Self {
        Self {
            default_capacity: 10,
            assets_dir: "assets".to_string(),
            log_level: "info".to_string(),
            start_level: None,
            save_level: None,
            frames: 60,
            frame_time: 1.0 / 60.0,
        }
    }

    /// Set the default object capacity
    pub fn with_default_capacity(mut self, capacity: u32) -> Self {
        self.default_capacity = capacity;
        self
    }

    /// Set the assets directory
    pub fn with_assets_dir(mut self, dir: impl Into<String>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the level to load at startup
    pub fn with_start_level(mut self, level: impl Into<String>) -> Self {
        self.start_level = Some(level.into());
        self
    }

    /// Set the level to save on shutdown
    pub fn with_save_level(mut self, level: impl Into<String>) -> Self {
        self.save_level = Some(level.into());
        self
    }

    /// Set the headless frame count and frame time
    pub fn with_frames(mut self, frames: u32, frame_time: f32) -> Self {
        self.frames = frames;
        self.frame_time = frame_time;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_capacity == 0 {
            return Err(ConfigError::Invalid("Default capacity must be at least 1".to_string()));
        }

        if !(self.frame_time.is_finite() && self.frame_time > 0.0) {
            return Err(ConfigError::Invalid(format!("Frame time must be positive, got {}", self.frame_time)));
        }

        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for WorldConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WorldConfig::default();
        assert_eq!(config.default_capacity, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = WorldConfig::new().with_default_capacity(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_negative_frame_time_rejected() {
        let config = WorldConfig::new().with_frames(10, -1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_and_ron_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorldConfig::new()
            .with_default_capacity(32)
            .with_start_level("levels/demo.toml")
            .with_log_level("debug");

        for name in ["world.toml", "world.ron"] {
            let path = dir.path().join(name);
            config.save_to_file(&path).unwrap();
            let loaded = WorldConfig::load_from_file(&path).unwrap();
            assert_eq!(loaded, config);
        }
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "default_capacity = 4\n").unwrap();

        let loaded = WorldConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.default_capacity, 4);
        assert_eq!(loaded.assets_dir, "assets");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.ini");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            WorldConfig::load_from_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
