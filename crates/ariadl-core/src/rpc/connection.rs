//! One open RPC connection to the daemon.
//!
//! WebSocket endpoints hold a real socket between `open` and `close`; HTTP
//! endpoints are stateless and issue one POST per call.

use futures_util::{SinkExt, StreamExt};
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use super::endpoint::{Endpoint, Transport};
use super::message::{RpcRequest, RpcResponse};
use crate::error::TransportError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, Copy)]
pub struct RpcTimeouts {
    pub connect: Duration,
    pub call: Duration,
}

pub enum Connection {
    WebSocket {
        stream: WsStream,
        timeouts: RpcTimeouts,
    },
    Http {
        url: Url,
        timeouts: RpcTimeouts,
    },
}

async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| TransportError::Timeout(limit.as_secs()))?
}

impl Connection {
    pub async fn open(endpoint: &Endpoint, timeouts: RpcTimeouts) -> Result<Self, TransportError> {
        match endpoint.transport() {
            Transport::WebSocket => {
                let connect = tokio_tungstenite::connect_async(endpoint.url().as_str());
                let (stream, response) = bounded(timeouts.connect, async {
                    Ok::<_, TransportError>(connect.await?)
                })
                .await?;
                tracing::debug!(
                    "websocket open to {endpoint} (HTTP {}, secure={})",
                    response.status(),
                    endpoint.is_secure()
                );
                Ok(Connection::WebSocket { stream, timeouts })
            }
            Transport::Http => Ok(Connection::Http {
                url: endpoint.url().clone(),
                timeouts,
            }),
        }
    }

    /// Send `request` and wait for its response; returns the `result` member.
    pub async fn call(
        &mut self,
        request: &RpcRequest,
    ) -> Result<serde_json::Value, TransportError> {
        let payload = serde_json::to_string(request)
            .map_err(|e| TransportError::Protocol(format!("encode request: {e}")))?;
        let response = match self {
            Connection::WebSocket { stream, timeouts } => {
                bounded(timeouts.call, ws_round_trip(stream, &request.id, payload)).await?
            }
            Connection::Http { url, timeouts } => {
                let url = url.clone();
                let timeouts = *timeouts;
                tokio::task::spawn_blocking(move || http_post(&url, &payload, timeouts))
                    .await
                    .map_err(|e| TransportError::Protocol(format!("RPC worker: {e}")))??
            }
        };
        response.into_result()
    }

    pub async fn close(self) -> Result<(), TransportError> {
        match self {
            Connection::WebSocket { mut stream, .. } => {
                stream.close(None).await?;
                Ok(())
            }
            Connection::Http { .. } => Ok(()),
        }
    }
}

async fn ws_round_trip(
    stream: &mut WsStream,
    id: &str,
    payload: String,
) -> Result<RpcResponse, TransportError> {
    stream.send(Message::Text(payload)).await?;
    while let Some(frame) = stream.next().await {
        match frame? {
            Message::Text(text) => {
                let response: RpcResponse = serde_json::from_str(&text)
                    .map_err(|e| TransportError::Protocol(format!("{e}: {text}")))?;
                if response.answers(id) {
                    return Ok(response);
                }
                tracing::trace!("skipping unrelated RPC message: {text}");
            }
            Message::Close(_) => return Err(TransportError::Closed),
            _ => {}
        }
    }
    Err(TransportError::Closed)
}

/// Blocking JSON-RPC POST. aria2 answers errors with a non-2xx status and a
/// JSON error body, so the body is decoded before the status is checked.
fn http_post(
    url: &Url,
    payload: &str,
    timeouts: RpcTimeouts,
) -> Result<RpcResponse, TransportError> {
    let curl_err = |source: curl::Error| TransportError::Curl {
        url: url.to_string(),
        source,
    };
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url.as_str()).map_err(curl_err)?;
    easy.post(true).map_err(curl_err)?;
    easy.post_fields_copy(payload.as_bytes()).map_err(curl_err)?;
    let mut headers = curl::easy::List::new();
    headers.append("Content-Type: application/json").map_err(curl_err)?;
    easy.http_headers(headers).map_err(curl_err)?;
    easy.connect_timeout(timeouts.connect).map_err(curl_err)?;
    easy.timeout(timeouts.call).map_err(curl_err)?;

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
    match serde_json::from_slice::<RpcResponse>(&body) {
        Ok(response) => Ok(response),
        Err(_) if !(200..300).contains(&code) => Err(TransportError::Status {
            url: url.to_string(),
            code,
        }),
        Err(e) => Err(TransportError::Protocol(format!("decode response: {e}"))),
    }
}
