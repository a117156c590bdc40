//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::blockchain::network::{NetworkId, NetworkProfile};
use crate::events::{EventCategory, EventFilters, EventSelector};
use crate::observability::logging::DEFAULT_LOG_FILTER;

/// Root configuration for the connector.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ConnectorConfig {
    pub network: NetworkConfig,

    /// API key and signing secrets.
    pub credentials: CredentialsConfig,

    /// Outbound HTTP client settings.
    pub http: HttpConfig,

    pub batch: BatchConfig,

    /// Webhook listener settings.
    pub webhook: WebhookConfig,

    pub observability: ObservabilityConfig,
}

impl ConnectorConfig {
    /// Network profile with any endpoint overrides applied.
    pub fn profile(&self) -> NetworkProfile {
        self.network
            .id
            .profile()
            .with_overrides(self.network.api_url.as_deref(), self.network.rpc_url.as_deref())
    }
}

/// Network selection.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NetworkConfig {
    pub id: NetworkId,

    /// Override of the REST base URL.
    pub api_url: Option<String>,

    /// Override of the JSON-RPC URL (ignored on REST-only networks).
    pub rpc_url: Option<String>,
}

/// Credentials. Signing secrets are accepted but never used or logged.
#[derive(Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CredentialsConfig {
    pub api_key: String,
    pub private_key: Option<String>,
    pub mnemonic: Option<String>,
    pub stark_private_key: Option<String>,
}

impl CredentialsConfig {
    /// API key, if one is configured.
    pub fn api_key(&self) -> Option<&str> {
        Some(self.api_key.as_str()).filter(|k| !k.is_empty())
    }
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact<T>(value: &Option<T>) -> &'static str {
            if value.is_some() {
                "<redacted>"
            } else {
                "<unset>"
            }
        }
        f.debug_struct("CredentialsConfig")
            .field(
                "api_key",
                &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" },
            )
            .field("private_key", &redact(&self.private_key))
            .field("mnemonic", &redact(&self.mnemonic))
            .field("stark_private_key", &redact(&self.stark_private_key))
            .finish()
    }
}

/// Outbound HTTP client settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BatchConfig {
    /// Record failures per item instead of aborting the run.
    pub continue_on_error: bool,
}

/// Webhook listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Bind address (e.g., "0.0.0.0:5678").
    pub bind_address: String,

    /// Route path for inbound events.
    pub path: String,

    /// Externally reachable base URL, used when registering the webhook.
    pub public_url: String,

    pub event: EventCategory,

    pub filters: EventFilters,

    /// Registration state file. In-memory when unset.
    pub state_path: Option<String>,

    /// Maximum request body size.
    pub body_limit_bytes: usize,

    pub request_timeout_secs: u64,
}

impl WebhookConfig {
    pub fn selector(&self) -> EventSelector {
        EventSelector::new(self.event).with_filters(self.filters.clone())
    }

    /// Public URL of the webhook route.
    pub fn webhook_url(&self) -> String {
        format!("{}{}", self.public_url.trim_end_matches('/'), self.path)
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5678".to_string(),
            path: "/webhook".to_string(),
            public_url: "http://localhost:5678".to_string(),
            event: EventCategory::default(),
            filters: EventFilters::default(),
            state_path: None,
            body_limit_bytes: 1024 * 1024,
            request_timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Enable the Prometheus exporter in `serve`.
    pub metrics_enabled: bool,

    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
