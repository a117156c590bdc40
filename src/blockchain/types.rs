//! Connector error definitions.

use thiserror::Error;

use crate::blockchain::network::NetworkId;

/// Errors that can occur while dispatching an operation.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Missing or malformed input parameter.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The (resource, operation) pair is not in the dispatch table.
    #[error("Unsupported operation '{operation}' for resource '{resource}'")]
    UnsupportedOperation { resource: String, operation: String },

    /// JSON-RPC requested against a REST-only network.
    #[error("RPC not available for network {network} (Immutable X uses REST API)")]
    RpcUnavailable { network: NetworkId },

    /// Non-success HTTP status or JSON-RPC `error` member.
    #[error("{}", upstream_message(*status, message))]
    Upstream { status: Option<u16>, message: String },

    /// Network-level failure talking to the upstream API.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

fn upstream_message(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Upstream returned status {}: {}", code, message),
        None => message.to_string(),
    }
}

impl ConnectorError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            status: None,
            message: message.into(),
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::UnsupportedOperation { .. } => "validation",
            Self::RpcUnavailable { .. } => "rpc_unavailable",
            Self::Upstream { .. } => "upstream",
            Self::Transport(_) => "transport",
        }
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;
