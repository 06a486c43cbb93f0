//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Build mode, controlling how draft posts participate in aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Drafts are excluded from the published subset.
    Production,
    /// Drafts are aggregated like any other post.
    Development,
}

impl Mode {
    pub fn includes_drafts(&self) -> bool {
        matches!(self, Mode::Development)
    }
}

/// Main configuration struct matching the vellum.yml schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Content root; collection patterns resolve against this directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    #[serde(default)]
    pub output: OutputConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_root() -> PathBuf {
    PathBuf::from("content")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one JSON data file per collection.
    #[serde(default = "default_data")]
    pub data: PathBuf,

    /// Directory receiving hashed copies of referenced assets.
    #[serde(default = "default_assets")]
    pub assets: PathBuf,

    /// Public base path prefixed onto staged asset names.
    #[serde(default = "default_base")]
    pub base: String,
}

fn default_data() -> PathBuf {
    PathBuf::from(".vellum")
}

fn default_assets() -> PathBuf {
    PathBuf::from("public/static")
}

fn default_base() -> String {
    String::from("/static/")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data: default_data(),
            assets: default_assets(),
            base: default_base(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Build a configuration programmatically (embedding hosts, tests).
    /// Paths are taken as given, without config-relative resolution.
    pub fn new(root: PathBuf, output: OutputConfig) -> Self {
        Self {
            root,
            output,
            config_path: None,
        }
    }

    /// Get the content root, resolved relative to the config file
    pub fn content_dir(&self) -> PathBuf {
        self.resolve_path(&self.root)
    }

    /// Get the data output directory, resolved relative to the config file
    pub fn data_dir(&self) -> PathBuf {
        self.resolve_path(&self.output.data)
    }

    /// Get the assets output directory, resolved relative to the config file
    pub fn assets_dir(&self) -> PathBuf {
        self.resolve_path(&self.output.assets)
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            if let Some(parent) = config_path.parent() {
                parent.join(path)
            } else {
                path.to_path_buf()
            }
        } else {
            path.to_path_buf()
        }
    }
}
