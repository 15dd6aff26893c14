//! Configuration file support for `.docling-editor.toml`
//!
//! Configuration files can be placed in:
//! - User home directory: `~/.docling-editor.toml` (user defaults)
//! - Project directory: `./.docling-editor.toml` (project defaults)
//! - Custom location via `--config` (replaces both)
//!
//! Precedence order (highest to lowest):
//! 1. Command-line arguments (`--compact`, `--type`)
//! 2. Project config
//! 3. User config
//! 4. Built-in defaults

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name used for both user and project config.
pub const CONFIG_FILE_NAME: &str = ".docling-editor.toml";

/// Configuration file structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Output settings shared by commands that print JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,

    /// Defaults for block creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<BlocksConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Compact JSON output (no pretty-printing)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compact: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocksConfig {
    /// Type used by `new-block` when `--type` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_type: Option<String>,
}

impl Config {
    /// Config written by `config init`.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            output: Some(OutputConfig {
                compact: Some(false),
            }),
            blocks: Some(BlocksConfig {
                default_type: Some("text".to_string()),
            }),
        }
    }

    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Path of the user config, if a home directory is known
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// Path of the project config
    #[must_use]
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE_NAME)
    }

    /// Load a config file if it exists; parse failures are reported and ignored
    fn load_optional(path: &Path, kind: &str) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => {
                log::info!("loaded {kind} config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                eprintln!(
                    "{} Failed to load {kind} config from {}: {e:#}",
                    "Warning:".yellow().bold(),
                    path.display(),
                );
                None
            }
        }
    }

    /// Find and merge user and project configs, or load only `explicit`
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        let user = Self::user_config_path().and_then(|path| Self::load_optional(&path, "user"));
        let project = Self::load_optional(&Self::project_config_path(), "project");
        Ok(Self::merge(user, project))
    }

    /// Merge configs field by field: project over user over defaults
    #[must_use]
    pub fn merge(user: Option<Self>, project: Option<Self>) -> Self {
        let mut merged = Self::default();
        for config in [user, project].into_iter().flatten() {
            if let Some(output) = config.output {
                let target = merged.output.get_or_insert_with(OutputConfig::default);
                if output.compact.is_some() {
                    target.compact = output.compact;
                }
            }
            if let Some(blocks) = config.blocks {
                let target = merged.blocks.get_or_insert_with(BlocksConfig::default);
                if blocks.default_type.is_some() {
                    target.default_type = blocks.default_type;
                }
            }
        }
        merged
    }

    /// Compact JSON output, unless the flag already asked for it
    #[must_use]
    pub fn compact(&self, flag: bool) -> bool {
        flag || self
            .output
            .as_ref()
            .and_then(|output| output.compact)
            .unwrap_or(false)
    }

    /// Block type for `new-block`: flag, then config, then `text`
    #[must_use]
    pub fn block_type<'a>(&'a self, flag: Option<&'a str>) -> &'a str {
        flag.or_else(|| {
            self.blocks
                .as_ref()
                .and_then(|blocks| blocks.default_type.as_deref())
        })
        .unwrap_or("text")
    }
}
