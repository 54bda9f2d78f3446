//! Fetching raw HTML pages.

use std::time::Duration;
use url::Url;

use crate::config::ClientConfig;
use crate::error::TransportError;

/// Something that can GET a page and return its body as text.
///
/// Calls block; async callers run them via `spawn_blocking`.
pub trait PageSource: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<String, TransportError>;
}

/// [`PageSource`] backed by libcurl (one Easy handle per fetch).
#[derive(Debug, Clone)]
pub struct CurlPageSource {
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: Option<String>,
}

impl CurlPageSource {
    pub fn new(cfg: &ClientConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.request_timeout(),
            user_agent: cfg.user_agent.clone(),
        }
    }
}

impl Default for CurlPageSource {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl PageSource for CurlPageSource {
    fn fetch(&self, url: &Url) -> Result<String, TransportError> {
        let curl_err = |source: curl::Error| TransportError::Curl {
            url: url.to_string(),
            source,
        };
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str()).map_err(curl_err)?;
        easy.get(true).map_err(curl_err)?;
        easy.follow_location(true).map_err(curl_err)?;
        // Empty string = accept every encoding libcurl can decode.
        easy.accept_encoding("").map_err(curl_err)?;
        easy.connect_timeout(self.connect_timeout).map_err(curl_err)?;
        easy.timeout(self.timeout).map_err(curl_err)?;
        if let Some(agent) = &self.user_agent {
            easy.useragent(agent).map_err(curl_err)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(curl_err)?;
            transfer.perform().map_err(curl_err)?;
        }

        let code = easy.response_code().map_err(curl_err)?;
        if !(200..300).contains(&code) {
            return Err(TransportError::Status {
                url: url.to_string(),
                code,
            });
        }

        tracing::trace!("GET {url} -> {code}, {} bytes", body.len());
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
