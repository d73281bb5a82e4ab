//! Minimal JSON-RPC 2.0 over HTTP POST.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::JsonRpcError;

/// A JSON-RPC 2.0 client bound to one HTTP(S) endpoint.
#[derive(Debug)]
pub struct JsonRpcClient {
    url: reqwest::Url,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: &str, request_timeout: Duration) -> Result<Self, JsonRpcError> {
        let url = parse_http_url(url)?;
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| JsonRpcError::Transport(e.to_string()))?;

        Ok(Self {
            url,
            http,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }

    /// Issue one call and decode its `result` into `T`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, JsonRpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = request_body(id, method, params);
        log::debug!("jsonrpc -> {} {} (id {})", self.url, method, id);

        let response = self
            .http
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| JsonRpcError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| JsonRpcError::Transport(e.to_string()))?;

        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(_) if !status.is_success() => {
                return Err(JsonRpcError::Transport(format!("{status}: {text}")));
            }
            Err(e) => return Err(JsonRpcError::InvalidResponse(e.to_string())),
        };

        decode_response(value)
    }
}

/// Accept only absolute `http`/`https` URLs.
pub fn parse_http_url(url: &str) -> Result<reqwest::Url, JsonRpcError> {
    let parsed =
        reqwest::Url::parse(url.trim()).map_err(|e| JsonRpcError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(JsonRpcError::InvalidUrl(format!(
            "{url}: unsupported scheme {scheme}"
        ))),
    }
}

pub fn request_body(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

/// Split a reply into its `result` or its `error` object.
pub fn decode_response<T: DeserializeOwned>(value: Value) -> Result<T, JsonRpcError> {
    if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
        return Err(JsonRpcError::Server {
            code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    let result = value
        .get("result")
        .cloned()
        .ok_or_else(|| JsonRpcError::InvalidResponse("missing result".into()))?;

    serde_json::from_value(result).map_err(|e| JsonRpcError::InvalidResponse(e.to_string()))
}
