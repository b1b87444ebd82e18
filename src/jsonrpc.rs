//! JSON-RPC 2.0 calls into the host application
//!
//! The envelope logic is independent of how bytes reach the host: anything
//! implementing [`JsonRpcTransport`] can carry it. [`HttpJsonRpcTransport`]
//! talks to the host's web server endpoint.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{CutterError, Result};

/// Carries one serialized JSON-RPC request and returns the raw response.
#[cfg_attr(test, mockall::automock)]
pub trait JsonRpcTransport {
    /// Send `payload` and return the response body.
    fn execute(&self, payload: &str) -> Result<String>;
}

/// Build a request envelope. Missing or empty params become an empty object.
#[must_use]
pub fn build_request(method: &str, params: Option<Value>) -> Value {
    let params = params.filter(|p| !is_empty_value(p)).unwrap_or_else(|| json!({}));
    json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": 1,
    })
}

/// `null`, `false`, `0`, `""`, `[]` and `{}`
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_i64() == Some(0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Extract the `result` member of a response body.
///
/// A response without `result` yields `Ok(None)`. An `error` member becomes
/// [`CutterError::JsonRpc`].
pub fn extract_result(response: &str) -> Result<Option<Value>> {
    let mut body: Value = serde_json::from_str(response)?;
    if let Some(result) = body.get_mut("result") {
        return Ok(Some(result.take()));
    }
    if let Some(error) = body.get("error") {
        return Err(CutterError::JsonRpc(error.to_string()));
    }
    Ok(None)
}

/// Invoke `method` on the host and return its result, if any.
pub fn call<T: JsonRpcTransport + ?Sized>(transport: &T, method: &str, params: Option<Value>) -> Result<Option<Value>> {
    let request = build_request(method, params);
    debug!(method, "Sending JSON-RPC request");
    let response = transport.execute(&request.to_string())?;
    extract_result(&response)
}

/// JSON-RPC over the host's HTTP endpoint (usually `http://host:8080/jsonrpc`)
#[derive(Debug, Clone)]
pub struct HttpJsonRpcTransport {
    url: String,
    http: Client,
}

impl HttpJsonRpcTransport {
    /// Create a transport posting to `url`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self { url: url.into(), http })
    }
}

impl JsonRpcTransport for HttpJsonRpcTransport {
    fn execute(&self, payload: &str) -> Result<String> {
        let response = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_string())
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(CutterError::Backend { status, body })
        }
    }
}
