//! Daemon settings persisted in the key-value store.
//!
//! One JSON record under [`SETTINGS_KEY`], replaced wholesale on save. The
//! record is read once at the start of each flow and passed down from there.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::store::KeyValueStore;

/// Store key holding the settings record.
pub const SETTINGS_KEY: &str = "config";

pub const DEFAULT_RPC_ADDRESS: &str = "ws://localhost:6800/jsonrpc";

/// aria2 connection settings and download root.
///
/// Keys missing from a stored record fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "aria2-rpc-address")]
    pub rpc_address: String,
    #[serde(rename = "aria2-rpc-secret")]
    pub rpc_secret: String,
    #[serde(rename = "aria2-download-path")]
    pub download_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rpc_address: DEFAULT_RPC_ADDRESS.to_string(),
            rpc_secret: String::new(),
            download_path: String::new(),
        }
    }
}

/// Settings operations on top of a host store.
pub struct SettingsStore<'a, S> {
    store: &'a S,
}

impl<'a, S: KeyValueStore> SettingsStore<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Current settings; defaults when nothing (or an empty string) is stored.
    pub async fn load(&self) -> Result<Settings> {
        match self.store.get_value(SETTINGS_KEY).await? {
            Some(raw) if !raw.is_empty() => {
                let settings = serde_json::from_str(&raw).map_err(ConfigError::Parse)?;
                Ok(settings)
            }
            _ => Ok(Settings::default()),
        }
    }

    /// Overwrite the stored record verbatim. Not validated: a malformed record
    /// is only reported by the next `load`.
    pub async fn save(&self, new_json: &str) -> Result<()> {
        self.store.set_value(SETTINGS_KEY, Some(new_json)).await?;
        tracing::info!("settings saved ({} bytes)", new_json.len());
        Ok(())
    }

    /// Drop the stored record so the next `load` returns defaults.
    pub async fn reset(&self) -> Result<()> {
        self.store.delete_value(SETTINGS_KEY).await
    }

    /// Delete every key whose value is null. Returns the removed keys.
    pub async fn cleanup(&self) -> Result<Vec<String>> {
        let mut removed = Vec::new();
        for key in self.store.list_keys().await? {
            if self.store.get_value(&key).await?.is_none() {
                self.store.delete_value(&key).await?;
                removed.push(key);
            }
        }
        if !removed.is_empty() {
            tracing::debug!(
                "cleanup removed {} null key(s): {:?}",
                removed.len(),
                removed
            );
        }
        Ok(removed)
    }
}
