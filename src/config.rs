//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.neuroscan.toml` files.

use crate::cli::OutputFormat;
use crate::report::ExportFormat;
use crate::review::{SortDirection, SortKey, SortState, DEFAULT_ITEMS_PER_PAGE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".neuroscan.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Table view settings.
    #[serde(default)]
    pub review: ReviewConfig,

    /// Export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Table view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Rows per page.
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,

    /// Initial sort column.
    #[serde(default)]
    pub sort_key: SortKey,

    /// Initial sort direction.
    #[serde(default)]
    pub sort_direction: SortDirection,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
        }
    }
}

impl ReviewConfig {
    pub fn sort_state(&self) -> SortState {
        SortState::new(self.sort_key, self.sort_direction)
    }
}

fn default_items_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Export file format.
    #[serde(default)]
    pub format: ExportFormat,

    /// Include filename, notes and processing time.
    #[serde(default = "default_true")]
    pub include_metadata: bool,

    /// Include the confidence column.
    #[serde(default = "default_true")]
    pub include_confidence_scores: bool,

    /// Directory export files are written to.
    #[serde(default = "default_export_dir")]
    pub directory: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            include_metadata: true,
            include_confidence_scores: true,
            directory: default_export_dir(),
        }
    }
}

impl ExportConfig {
    pub fn directory(&self) -> PathBuf {
        PathBuf::from(&self.directory)
    }
}

fn default_true() -> bool {
    true
}

fn default_export_dir() -> String {
    ".".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if config.review.items_per_page == 0 {
            anyhow::bail!(
                "items_per_page must be at least 1 in {}",
                path.display()
            );
        }

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if let Some(per_page) = args.per_page {
            self.review.items_per_page = per_page;
        }
        if let Some(key) = args.sort {
            self.review.sort_key = key;
        }
        if let Some(direction) = args.direction {
            self.review.sort_direction = direction;
        }
        if let Some(format) = args.export {
            self.export.format = format;
        }
        if let Some(ref dir) = args.export_dir {
            self.export.directory = dir.display().to_string();
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
