//! Fake aria2 daemon speaking JSON-RPC over WebSocket.
//!
//! Accepts one connection, answers each request (after an unrelated
//! notification, like a busy daemon would send) and records what it saw.

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

#[derive(Debug, Clone)]
pub enum Reply {
    /// One `["gidNNNN"]` entry per nested call.
    Gids,
    /// JSON-RPC error object instead of a result.
    RpcError { code: i64, message: String },
}

#[derive(Debug, Default)]
pub struct Session {
    pub requests: Vec<Value>,
    pub saw_close: bool,
}

pub struct FakeAria2 {
    /// `ws://127.0.0.1:<port>/jsonrpc`
    pub url: String,
    handle: JoinHandle<Session>,
}

impl FakeAria2 {
    pub async fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.expect("accept");
            serve(tcp, reply).await
        });
        Self {
            url: format!("ws://127.0.0.1:{port}/jsonrpc"),
            handle,
        }
    }

    /// Waits for the client to go away and returns what was recorded.
    pub async fn finish(self) -> Session {
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("fake daemon did not finish")
            .expect("fake daemon task panicked")
    }
}

pub fn multicall_result(request: &Value) -> Value {
    let calls = request["params"][0].as_array().map(Vec::len).unwrap_or(0);
    let entries: Vec<Value> = (0..calls).map(|i| json!([format!("gid{i:04}")])).collect();
    json!({ "jsonrpc": "2.0", "id": request["id"], "result": entries })
}

async fn serve(tcp: tokio::net::TcpStream, reply: Reply) -> Session {
    let mut ws = accept_async(tcp).await.expect("websocket handshake");
    let mut session = Session::default();

    while let Some(frame) = ws.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                let request: Value = serde_json::from_str(&text).expect("request is JSON");
                let notification = json!({
                    "jsonrpc": "2.0",
                    "method": "aria2.onDownloadStart",
                    "params": [{ "gid": "ffff" }]
                });
                let text = notification.to_string();
                ws.send(Message::Text(text)).await.unwrap();

                let response = match &reply {
                    Reply::Gids => multicall_result(&request),
                    Reply::RpcError { code, message } => json!({
                        "jsonrpc": "2.0",
                        "id": request["id"],
                        "error": { "code": code, "message": message }
                    }),
                };
                ws.send(Message::Text(response.to_string())).await.unwrap();
                session.requests.push(request);
            }
            Ok(Message::Close(_)) => {
                session.saw_close = true;
                break;
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }
    session
}
