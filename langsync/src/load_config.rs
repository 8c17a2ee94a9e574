//! `load_config` module: loads a YAML config file into the core [`SyncConfig`].
//!
//! Every field is optional; anything left out keeps the built-in default, so an
//! empty file is a valid config.
//!
//! # Errors
//! Failures use `anyhow::Error` and name the file, and are surfaced at the CLI boundary.

use anyhow::{anyhow, Result};
use langsync_core::config::SyncConfig;
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Reads the YAML file at `path` into a [`SyncConfig`].
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SyncConfig> {
    let path = path.as_ref();
    info!(config_path = ?path, "Loading configuration");

    let content = fs::read_to_string(path).map_err(|e| {
        error!(error = ?e, config_path = ?path, "Failed to read config file");
        anyhow!("Failed to read config file {path:?}: {e}")
    })?;

    if is_blank(&content) {
        info!(config_path = ?path, "Config file sets nothing, using defaults");
        return Ok(SyncConfig::default());
    }

    serde_yaml::from_str(&content).map_err(|e| {
        error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
        anyhow!("Failed to parse config YAML {path:?}: {e}")
    })
}

/// Only blank lines and comments.
fn is_blank(content: &str) -> bool {
    content.lines().map(str::trim).all(|l| l.is_empty() || l.starts_with('#'))
}
