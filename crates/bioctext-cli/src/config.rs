//! Configuration loading from TOML files

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global configuration for bioctext
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub extract: ExtractConfig,
}

/// Defaults for the extract command; CLI flags take precedence
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ExtractConfig {
    /// Minimum body length (characters) to accept a document
    pub min_length: Option<usize>,
    /// Emit a DOC-ID marker line before each record
    pub mark_docs: bool,
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./bioctext.toml (current directory)
    /// 2. ~/.config/bioctext/config.toml
    ///
    /// If no config file is found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("bioctext.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "bioctext") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
