//! Configuration file handling for `.sopgen.toml`
//!
//! Configuration files can be placed in:
//! - User home directory: `~/.sopgen.toml` (user defaults)
//! - Project directory: `./.sopgen.toml` (project defaults)
//!
//! Precedence order (highest to lowest):
//! 1. Command-line arguments (`--layout`, `--parallel`, ...)
//! 2. Project config
//! 3. User config
//! 4. Built-in defaults

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the home and working directories
pub const CONFIG_FILE: &str = ".sopgen.toml";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Defaults for the build and plan commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildConfig>,

    /// Defaults for the batch command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<BatchConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Template layout file used instead of the built-in master layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Build inputs on all cores
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,

    /// Keep going after a failed build
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continue_on_error: Option<bool>,
}

impl Config {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).map_err(|e| {
            eprintln!(
                "{} Failed to parse config file: {}",
                "Error:".red().bold(),
                path.display()
            );
            eprintln!("{} {}", "Parse error:".yellow().bold(), e);
            eprintln!();
            eprintln!("{} Configuration file syntax:", "Help:".cyan().bold());
            eprintln!("  [build]");
            eprintln!("  layout = \"templates/master.toml\"");
            eprintln!("  [batch]");
            eprintln!("  parallel = true");
            eprintln!("  continue_on_error = false");
            anyhow::anyhow!("Failed to parse config file: {e}")
        })
    }

    /// Find and load user and project configuration, merged
    pub fn discover() -> Self {
        let user = dirs::home_dir()
            .and_then(|home| Self::load_optional(&home.join(CONFIG_FILE), "user"));
        let project = Self::load_optional(&PathBuf::from(CONFIG_FILE), "project");
        Self::merge(user, project)
    }

    /// Load a config that may not exist; a broken file is reported and ignored
    fn load_optional(path: &Path, scope: &str) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => {
                log::debug!("Loaded {scope} config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                eprintln!(
                    "{} Failed to load {} config from {}: {}",
                    "Warning:".yellow().bold(),
                    scope,
                    path.display(),
                    e
                );
                None
            }
        }
    }

    /// Merge configs with precedence: project over user over defaults
    pub fn merge(user_config: Option<Self>, project_config: Option<Self>) -> Self {
        let mut merged = user_config.unwrap_or_default();

        let Some(project) = project_config else {
            return merged;
        };

        if let Some(build) = project.build {
            let mut merged_build = merged.build.unwrap_or_default();
            if let Some(layout) = build.layout {
                merged_build.layout = Some(layout);
            }
            merged.build = Some(merged_build);
        }

        if let Some(batch) = project.batch {
            let mut merged_batch = merged.batch.unwrap_or_default();
            if let Some(parallel) = batch.parallel {
                merged_batch.parallel = Some(parallel);
            }
            if let Some(continue_on_error) = batch.continue_on_error {
                merged_batch.continue_on_error = Some(continue_on_error);
            }
            merged.batch = Some(merged_batch);
        }

        merged
    }

    /// Layout path from the `[build]` section
    pub fn layout(&self) -> Option<&str> {
        self.build.as_ref().and_then(|b| b.layout.as_deref())
    }

    /// The `[batch]` section, or empty defaults
    pub fn batch(&self) -> BatchConfig {
        self.batch.clone().unwrap_or_default()
    }
}

/// Resolve the layout path: CLI flag, then config, then none (master layout)
pub fn resolve_layout(cli_value: Option<PathBuf>, config: &Config) -> Option<PathBuf> {
    cli_value.or_else(|| config.layout().map(PathBuf::from))
}
