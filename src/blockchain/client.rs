//! REST and JSON-RPC client for the Immutable platform.
//!
//! # Responsibilities
//! - Send REST requests to the network's API base URL
//! - Send JSON-RPC requests (single and batch) to the zkEVM RPC endpoint
//! - Attach the `x-api-key` header when an API key is configured
//! - Map HTTP and RPC failures onto `ConnectorError`

use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::blockchain::network::NetworkProfile;
use crate::blockchain::types::{ConnectorError, ConnectorResult};

const API_KEY_HEADER: &str = "x-api-key";

/// One JSON-RPC call inside a batch.
#[derive(Debug, Clone)]
pub struct RpcCall {
    pub method: &'static str,
    pub params: Vec<Value>,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'a [Value],
}

/// Outbound client bound to one network profile.
#[derive(Clone)]
pub struct ImmutableClient {
    http: Client,
    profile: NetworkProfile,
    api_key: Option<String>,
}

impl ImmutableClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `profile` - Resolved network profile
    /// * `api_key` - Optional API key; empty strings are treated as absent
    /// * `timeout` - Per-request timeout applied by the HTTP client
    pub fn new(
        profile: NetworkProfile,
        api_key: Option<String>,
        timeout: Duration,
    ) -> ConnectorResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let api_key = api_key.filter(|k| !k.is_empty());

        tracing::debug!(
            network = %profile.network,
            api_url = %profile.api_url,
            rpc = profile.supports_rpc(),
            api_key_set = api_key.is_some(),
            "Connector client initialized"
        );

        Ok(Self {
            http,
            profile,
            api_key,
        })
    }

    pub fn profile(&self) -> &NetworkProfile {
        &self.profile
    }

    /// Build an API URL from already-decoded path segments.
    ///
    /// Segments are percent-encoded individually, so ids containing `/` or
    /// spaces cannot escape their position in the path.
    pub fn api_url(&self, segments: &[String]) -> ConnectorResult<Url> {
        let mut url = Url::parse(&self.profile.api_url).map_err(|e| {
            ConnectorError::validation(format!("invalid API URL '{}': {}", self.profile.api_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| ConnectorError::validation("API URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a REST request and decode the JSON response.
    pub async fn rest(
        &self,
        method: Method,
        url: Url,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> ConnectorResult<Value> {
        tracing::debug!(method = %method, url = %url, "REST request");

        let mut request = self
            .http
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        decode_response(response).await
    }

    /// Perform one JSON-RPC call and return its `result` member.
    pub async fn rpc(&self, method: &str, params: Vec<Value>) -> ConnectorResult<Value> {
        let url = self.rpc_url()?;
        tracing::debug!(rpc_method = %method, "RPC request");

        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params: &params,
        };
        let response = self.http.post(url).json(&request).send().await?;
        let envelope = decode_response(response).await?;
        take_result(envelope)
    }

    /// Perform several JSON-RPC calls as a single batch request.
    ///
    /// Results are returned in call order regardless of the order the
    /// endpoint answers in.
    pub async fn rpc_batch(&self, calls: &[RpcCall]) -> ConnectorResult<Vec<Value>> {
        let url = self.rpc_url()?;
        let requests: Vec<RpcRequest<'_>> = calls
            .iter()
            .enumerate()
            .map(|(i, call)| RpcRequest {
                jsonrpc: "2.0",
                id: i as u64 + 1,
                method: call.method,
                params: &call.params,
            })
            .collect();

        tracing::debug!(calls = calls.len(), "RPC batch request");
        let response = self.http.post(url).json(&requests).send().await?;
        let body = decode_response(response).await?;

        let mut entries = match body {
            Value::Array(entries) => entries,
            other => {
                // Some nodes answer a rejected batch with a single error object
                take_result(other)?;
                return Err(ConnectorError::upstream("RPC batch response was not an array"));
            }
        };

        let mut results = Vec::with_capacity(calls.len());
        for id in 1..=calls.len() as u64 {
            let pos = entries
                .iter()
                .position(|e| e.get("id").and_then(Value::as_u64) == Some(id))
                .ok_or_else(|| {
                    ConnectorError::upstream(format!("RPC batch response missing id {}", id))
                })?;
            results.push(take_result(entries.swap_remove(pos))?);
        }
        Ok(results)
    }

    /// Verify the API key against the health endpoint.
    pub async fn check_credentials(&self) -> ConnectorResult<Value> {
        let url = self.api_url(&["v1".to_string(), "health".to_string()])?;
        self.rest(Method::GET, url, &[], None).await
    }

    fn rpc_url(&self) -> ConnectorResult<&str> {
        self.profile
            .rpc_url
            .as_deref()
            .ok_or(ConnectorError::RpcUnavailable {
                network: self.profile.network,
            })
    }
}

impl std::fmt::Debug for ImmutableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImmutableClient")
            .field("network", &self.profile.network)
            .field("api_url", &self.profile.api_url)
            .field("rpc_url", &self.profile.rpc_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

async fn decode_response(response: reqwest::Response) -> ConnectorResult<Value> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        tracing::warn!(status = %status, "Upstream returned error status");
        return Err(ConnectorError::Upstream {
            status: Some(status.as_u16()),
            message: text,
        });
    }
    if text.trim().is_empty() {
        return Ok(json!({}));
    }
    serde_json::from_str(&text)
        .map_err(|e| ConnectorError::upstream(format!("invalid JSON from upstream: {}", e)))
}

fn take_result(mut envelope: Value) -> ConnectorResult<Value> {
    if let Some(error) = envelope.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(ConnectorError::upstream(format!("RPC Error: {}", message)));
    }
    Ok(envelope
        .get_mut("result")
        .map(Value::take)
        .unwrap_or(Value::Null))
}
