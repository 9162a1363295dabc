//! JSON-RPC over HTTP transport.
//!
//! Speaks JSON-RPC 2.0 to the RPC plugin's procedure catalog, e.g.
//! `https://jira.example/rpc/json-rpc/jirasoapservice-v2`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use super::error::{ApiError, Result};
use super::transport::{Transport, TransportFault};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// JSON-RPC protocol version sent with every request.
const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Vec<Value>,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl From<RpcError> for TransportFault {
    fn from(err: RpcError) -> Self {
        // The plugin puts the Java exception in `data` and a generic text in `message`.
        let message = match err.data {
            Some(Value::String(detail)) if !detail.is_empty() => {
                format!("{}: {}", err.message, detail)
            }
            _ => err.message,
        };
        TransportFault::Remote {
            code: err.code,
            message,
        }
    }
}

/// A [`Transport`] that posts JSON-RPC 2.0 requests with `reqwest`.
#[derive(Debug)]
pub struct HttpTransport {
    /// The HTTP client.
    client: Client,
    /// The procedure catalog URL.
    endpoint: String,
    /// Next request id.
    next_id: AtomicU64,
}

impl HttpTransport {
    /// Create a transport bound to `endpoint` with the default timeout.
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a transport bound to `endpoint` with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the endpoint is not an http(s) URL,
    /// or `ApiError::Transport` if the HTTP client cannot be built.
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = normalize_endpoint(endpoint)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(TransportFault::Network(e)))?;

        Ok(Self {
            client,
            endpoint,
            next_id: AtomicU64::new(1),
        })
    }

    /// Get the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Turn an HTTP response into the procedure's raw result.
    ///
    /// A JSON-RPC `error` member wins over the HTTP status, since the plugin
    /// reports remote exceptions with a 500.
    async fn handle_response(response: Response) -> std::result::Result<Value, TransportFault> {
        let status = response.status();
        let body = response.text().await?;
        trace!(status = status.as_u16(), "Response body: {}", body);

        match serde_json::from_str::<RpcResponse>(&body) {
            Ok(RpcResponse {
                error: Some(err), ..
            }) => Err(err.into()),
            _ if !status.is_success() => Err(TransportFault::Http {
                status: status.as_u16(),
                body,
            }),
            Ok(RpcResponse { result, .. }) => Ok(result.unwrap_or(Value::Null)),
            Err(e) => Err(TransportFault::malformed(format!(
                "Failed to parse JSON-RPC response: {}",
                e
            ))),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, args), fields(endpoint = %self.endpoint, arity = args.len()))]
    async fn invoke(
        &self,
        procedure: &str,
        args: Vec<Value>,
    ) -> std::result::Result<Value, TransportFault> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(id, "Invoking remote procedure");

        let request = RpcRequest {
            jsonrpc: JSONRPC_VERSION,
            method: procedure,
            params: args,
            id,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?;

        Self::handle_response(response).await
    }
}

/// Normalize the endpoint by removing trailing slashes and checking the scheme.
fn normalize_endpoint(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');

    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(ApiError::InvalidUrl(format!(
            "'{}' must start with http:// or https://",
            url
        )));
    }

    // Warn if not HTTPS (but don't enforce for localhost/testing)
    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("Endpoint does not use HTTPS: {}. Credentials will be sent in clear text.", url);
    }

    Ok(url.to_string())
}
