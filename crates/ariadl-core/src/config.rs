use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Client-side configuration loaded from `~/.config/ariadl/config.toml`.
///
/// Daemon address, secret and download path are *not* here; they live in the
/// key-value store (see [`crate::settings`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Connect timeout for page fetches and RPC connections, in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout for page fetches, in seconds.
    pub request_timeout_secs: u64,
    /// Upper bound on one RPC call (request sent until its response), in seconds.
    /// Opening the connection is bounded by `connect_timeout_secs`.
    pub rpc_timeout_secs: u64,
    /// Optional User-Agent for page fetches (None = libcurl default).
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Sanitize collection/episode titles before using them as `dir`/`out`.
    #[serde(default)]
    pub sanitize_names: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
            rpc_timeout_secs: 30,
            user_agent: None,
            sanitize_names: false,
        }
    }
}

impl ClientConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ariadl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ClientConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ClientConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ClientConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
