//! RPC endpoint derived from the stored address.

use std::fmt;
use url::Url;

use crate::error::ConfigError;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// JSON-RPC over a WebSocket (`ws:` / `wss:`).
    WebSocket,
    /// JSON-RPC over HTTP POST (`http:` / `https:`).
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
    transport: Transport,
}

impl Endpoint {
    pub fn parse(address: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(address.trim()).map_err(|source| ConfigError::InvalidAddress {
            address: address.to_string(),
            source,
        })?;
        let transport = match url.scheme() {
            "ws" | "wss" => Transport::WebSocket,
            "http" | "https" => Transport::Http,
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        };
        Ok(Self { url, transport })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Self::parse(&settings.rpc_address)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// `wss:` or `https:`.
    pub fn is_secure(&self) -> bool {
        matches!(self.url.scheme(), "wss" | "https")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
