//! Host Configuration
//!
//! Configuration management for the decorator host.

use anyhow::{Context, Result};
use cosmic_ext_connect_decorator::DecoratorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "decorator.toml";

/// Host configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Source app information
    #[serde(default)]
    pub source: SourceConfig,

    /// Decoration pipeline settings
    #[serde(default)]
    pub decorator: DecoratorConfig,
}

/// Source app configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Installed version code of the source app (overridden by
    /// `--source-version`)
    #[serde(default)]
    pub version_code: Option<u32>,
}

impl Config {
    /// Default configuration file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("cosmic")
            .join("cosmic-connect")
            .join(CONFIG_FILE_NAME)
    }

    /// Load configuration from `path`, or from the default location
    ///
    /// A missing file is created with default settings.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            Ok(config)
        } else {
            // Create default config
            let config = Config::default();
            config.save(&config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let contents = self.to_toml()?;
        fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
