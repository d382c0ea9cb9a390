use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::policy::PolicyConfiguration;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "dep-license-gate.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Only report dependencies that fail approval
    pub errors_only: Option<bool>,

    /// Suppress report output, keep the exit status
    pub quiet: Option<bool>,

    /// Emit newline-delimited JSON records
    pub ndjson: Option<bool>,

    /// Embedded policy configuration
    pub policy: Option<PolicyConfiguration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            errors_only: Some(false),
            quiet: Some(false),
            ndjson: Some(false),
            policy: None,
        }
    }
}

/// Load configuration from `dep-license-gate.toml` in the working directory.
pub fn load_config() -> Result<Config> {
    let path = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE);
    load_config_from(&path)
}

/// Load configuration from an explicit path. A missing file yields the
/// defaults; an unreadable or unparsable file is a configuration error.
pub fn load_config_from<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
