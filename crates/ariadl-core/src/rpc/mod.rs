//! Hand resolved episodes to the aria2 daemon.
//!
//! All items of one flow go out as a single `system.multicall` of
//! `aria2.addUri` calls over one connection. Queuing, ordering and retrying
//! the individual downloads is the daemon's business; nothing here retries.

mod connection;
mod endpoint;
mod message;

pub use connection::{Connection, RpcTimeouts};
pub use endpoint::{Endpoint, Transport};
pub use message::{
    parse_multicall_result, AddUri, AddUriOptions, CallOutcome, MethodCall, RpcRequest,
    RpcResponse, METHOD_ADD_URI, METHOD_MULTICALL,
};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::naming::Naming;
use crate::resolver::DownloadInfo;
use crate::settings::Settings;

/// One `aria2.addUri` per item, all into `<download_path>/<collection>`.
pub fn build_add_uri_batch(
    settings: &Settings,
    collection: &str,
    items: &[DownloadInfo],
    naming: Naming,
) -> Vec<AddUri> {
    let dir = naming.dir(&settings.download_path, collection);
    items
        .iter()
        .map(|item| AddUri {
            uris: vec![item.url.clone()],
            options: AddUriOptions {
                dir: dir.clone(),
                out: naming.out(&item.title),
            },
        })
        .collect()
}

/// Something that can queue a batch of downloads.
#[allow(async_fn_in_trait)]
pub trait Dispatcher {
    async fn dispatch(
        &self,
        settings: &Settings,
        collection: &str,
        items: &[DownloadInfo],
    ) -> Result<Vec<CallOutcome>>;
}

/// [`Dispatcher`] talking to a real aria2 daemon.
#[derive(Debug, Clone)]
pub struct Aria2Dispatcher {
    timeouts: RpcTimeouts,
    naming: Naming,
}

impl Aria2Dispatcher {
    pub fn new(cfg: &ClientConfig) -> Self {
        Self {
            timeouts: RpcTimeouts {
                connect: cfg.connect_timeout(),
                call: cfg.rpc_timeout(),
            },
            naming: Naming::new(cfg.sanitize_names),
        }
    }
}

impl Default for Aria2Dispatcher {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl Dispatcher for Aria2Dispatcher {
    async fn dispatch(
        &self,
        settings: &Settings,
        collection: &str,
        items: &[DownloadInfo],
    ) -> Result<Vec<CallOutcome>> {
        let endpoint = Endpoint::from_settings(settings)?;
        let batch = build_add_uri_batch(settings, collection, items, self.naming);
        let request = RpcRequest::multicall(&batch, &settings.rpc_secret);
        tracing::info!(
            "sending {} addUri call(s) to {endpoint} (request {})",
            batch.len(),
            request.id
        );

        let mut conn = Connection::open(&endpoint, self.timeouts).await?;
        let result = conn.call(&request).await;
        // Close on every path; a failed close never masks the call result.
        if let Err(e) = conn.close().await {
            tracing::warn!("closing RPC connection to {endpoint}: {e}");
        }

        let outcomes = parse_multicall_result(result?)?;
        if outcomes.len() != batch.len() {
            tracing::warn!(
                "daemon returned {} outcome(s) for {} call(s)",
                outcomes.len(),
                batch.len()
            );
        }
        for (call, outcome) in batch.iter().zip(&outcomes) {
            match outcome {
                CallOutcome::Queued { gid } => {
                    tracing::info!("queued {} as {gid}", call.options.out)
                }
                CallOutcome::Fault { code, message } => {
                    tracing::warn!("daemon rejected {}: {code} {message}", call.options.out)
                }
            }
        }
        Ok(outcomes)
    }
}
