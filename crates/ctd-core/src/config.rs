use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::api::fields::FieldPreset;
use crate::api::STUDIES_ENDPOINT_URL;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per page request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/ctd/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtdConfig {
    /// Base URL of the studies endpoint. Overridable so tests can point at a
    /// local server.
    pub endpoint_url: String,
    /// Studies per page. The API caps this at 1000; larger values are clamped.
    pub page_size: usize,
    /// Which study fields to request: "brief", "slim", or "full".
    #[serde(default)]
    pub fields: FieldPreset,
    /// Connect timeout per request, in seconds.
    pub connect_timeout_secs: u64,
    /// Total timeout per request, in seconds.
    pub request_timeout_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for CtdConfig {
    fn default() -> Self {
        Self {
            endpoint_url: STUDIES_ENDPOINT_URL.to_string(),
            page_size: 1000,
            fields: FieldPreset::default(),
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
            retry: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ctd")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CtdConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CtdConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: CtdConfig = toml::from_str(&data)?;
    Ok(cfg)
}
