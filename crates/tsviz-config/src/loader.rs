//! Configuration loading and persistence with atomic file operations.

use crate::schema::Config;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tsviz_common::{Result, VisualizerError};

/// Supported configuration file formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.yaml` or `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Detects the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Ok(Self::Yaml)
            }
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(VisualizerError::config(format!(
                "unsupported configuration format: {}",
                path.display()
            ))),
        }
    }

    /// Parses configuration text in this format.
    pub fn parse(self, text: &str) -> Result<Config> {
        match self {
            Self::Toml => toml::from_str(text).map_err(|e| VisualizerError::config(e.to_string())),
            Self::Yaml => {
                serde_yaml::from_str(text).map_err(|e| VisualizerError::config(e.to_string()))
            }
            Self::Json => {
                serde_json::from_str(text).map_err(|e| VisualizerError::config(e.to_string()))
            }
        }
    }

    /// Serializes a configuration in this format.
    pub fn render(self, config: &Config) -> Result<String> {
        match self {
            Self::Toml => {
                toml::to_string_pretty(config).map_err(|e| VisualizerError::config(e.to_string()))
            }
            Self::Yaml => {
                serde_yaml::to_string(config).map_err(|e| VisualizerError::config(e.to_string()))
            }
            Self::Json => serde_json::to_string_pretty(config)
                .map_err(|e| VisualizerError::config(e.to_string())),
        }
    }
}

/// Configuration loader with atomic file operations.
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this loader reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and validates configuration from file.
    pub fn load(&self) -> Result<Config> {
        let format = ConfigFormat::from_path(&self.path)?;
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VisualizerError::config(format!(
                    "configuration file not found: {}",
                    self.path.display()
                ))
            } else {
                VisualizerError::Io(e)
            }
        })?;

        let config = format.parse(&text)?;
        config.validate()?;
        info!("Loaded configuration from {}", self.path.display());
        Ok(config)
    }

    /// Loads configuration from file, falling back to defaults when the file
    /// does not exist. Other failures are still reported.
    pub fn load_or_default(&self) -> Result<Config> {
        if self.path.exists() {
            self.load()
        } else {
            debug!("No configuration at {}, using defaults", self.path.display());
            Ok(Config::default())
        }
    }

    /// Saves configuration to file atomically.
    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let text = ConfigFormat::from_path(&self.path)?.render(config)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(text.as_bytes())?;
        temp.flush()?;
        temp.persist(&self.path).map_err(|e| VisualizerError::Io(e.error))?;

        info!("Saved configuration to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.YML")).unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.yaml")).unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")).unwrap(), ConfigFormat::Json);
        assert!(ConfigFormat::from_path(Path::new("a.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("config")).is_err());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = ConfigFormat::Toml.parse("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ConfigFormat::Toml.parse("[data\nsource = 3").unwrap_err();
        assert!(matches!(err, VisualizerError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let loader = ConfigLoader::new("/definitely/not/here/tsviz.toml");
        assert!(matches!(loader.load(), Err(VisualizerError::Config(_))));
        assert_eq!(loader.load_or_default().unwrap(), Config::default());
    }
}
