//! aria2 JSON-RPC messages: the `system.multicall` request and its result.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::TransportError;

pub const METHOD_MULTICALL: &str = "system.multicall";
pub const METHOD_ADD_URI: &str = "aria2.addUri";

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// `aria2.addUri` options used by this tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddUriOptions {
    pub dir: String,
    pub out: String,
}

/// One `aria2.addUri` entry of a multicall batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddUri {
    pub uris: Vec<String>,
    pub options: AddUriOptions,
}

/// Nested call inside `system.multicall`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodCall {
    pub method_name: String,
    pub params: Vec<Value>,
}

impl AddUri {
    /// The secret token, when set, leads the params of every nested call;
    /// `system.multicall` itself takes none.
    pub fn to_method_call(&self, secret: &str) -> MethodCall {
        let mut params = Vec::with_capacity(3);
        if !secret.is_empty() {
            params.push(Value::String(format!("token:{secret}")));
        }
        params.push(json!(self.uris));
        params.push(json!(self.options));
        MethodCall {
            method_name: METHOD_ADD_URI.to_string(),
            params,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: String,
    pub method: &'static str,
    pub params: Value,
}

impl RpcRequest {
    pub fn multicall(calls: &[AddUri], secret: &str) -> Self {
        let nested: Vec<MethodCall> = calls.iter().map(|c| c.to_method_call(secret)).collect();
        Self {
            jsonrpc: "2.0",
            id: format!("ariadl-{}", NEXT_ID.fetch_add(1, Ordering::Relaxed)),
            method: METHOD_MULTICALL,
            params: json!([nested]),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Anything the daemon sends back: a response or a notification.
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
    /// Set on notifications such as `aria2.onDownloadStart`.
    #[serde(default)]
    pub method: Option<String>,
}

impl RpcResponse {
    pub fn answers(&self, id: &str) -> bool {
        self.id.as_ref().and_then(Value::as_str) == Some(id)
    }

    pub fn into_result(self) -> Result<Value, TransportError> {
        if let Some(err) = self.error {
            return Err(TransportError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        self.result.ok_or_else(|| {
            TransportError::Protocol("response has neither result nor error".to_string())
        })
    }
}

/// Per-entry outcome of a multicall batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CallOutcome {
    Queued { gid: String },
    Fault { code: i64, message: String },
}

/// Split a `system.multicall` result into one outcome per nested call.
///
/// Successful entries arrive as one-element arrays (`["<gid>"]`), failed ones
/// as `{ "code": .., "message": .. }` objects.
pub fn parse_multicall_result(result: Value) -> Result<Vec<CallOutcome>, TransportError> {
    match result {
        Value::Array(entries) => entries.into_iter().map(parse_entry).collect(),
        other => Err(TransportError::Protocol(format!(
            "multicall result is not an array: {other}"
        ))),
    }
}

fn parse_entry(entry: Value) -> Result<CallOutcome, TransportError> {
    match entry {
        Value::Array(values) => match values.into_iter().next() {
            Some(Value::String(gid)) => Ok(CallOutcome::Queued { gid }),
            other => Err(TransportError::Protocol(format!(
                "unexpected addUri result: {other:?}"
            ))),
        },
        Value::Object(fault) => Ok(CallOutcome::Fault {
            code: fault.get("code").and_then(Value::as_i64).unwrap_or_default(),
            message: fault
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }),
        other => Err(TransportError::Protocol(format!(
            "unexpected multicall entry: {other}"
        ))),
    }
}
