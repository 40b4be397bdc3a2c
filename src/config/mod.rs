use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{BilldashError, Result};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Base URL of the bill API, without the trailing `/bills`.
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DisplaySettings {
    /// Prefix for rendered amounts. Passed explicitly into rendering;
    /// there is no global formatter state.
    pub currency_symbol: String,
}

fn default_timeout_secs() -> u64 {
    10
}

/// Get the config directory path (~/.billdash or XDG config)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "billdash") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.billdash/
    let home = dirs_home().ok_or_else(|| {
        BilldashError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".billdash"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(BilldashError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| BilldashError::ConfigParse { path, source: e })
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[api]
base_url = "https://track-bill-api.onrender.com/api"
timeout_secs = 10    # per-request timeout

[display]
currency_symbol = "$"   # prefix for rendered amounts, e.g. "$" or "Rs "
"#;
