//! Configuration: .env loading plus a small JSON config file holding
//! per-user defaults (project ID, base URL).
//!
//! Read and write always take the file path as a parameter so tests and
//! callers decide where config lives; only `default_path` consults the
//! environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Config file location: NIMBUS_CONFIG_DIR override, else
/// ~/.config/nimbus/config.json.
pub fn default_path() -> PathBuf {
    if let Ok(dir) = std::env::var("NIMBUS_CONFIG_DIR") {
        return PathBuf::from(dir).join("config.json");
    }
    let home = std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    home.join(".config").join("nimbus").join("config.json")
}

/// A missing file is an empty config, not an error.
pub fn read(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("read config from {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse config at {}", path.display()))
}

/// Creates missing parent folders before writing.
pub fn write(path: &Path, config: &FileConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config folder {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content).with_context(|| format!("write config to {}", path.display()))
}

/// Best-effort .env load from the working directory.
pub fn load_env() {
    let _ = dotenvy::dotenv();
}
