//! Immutable platform connector.
//!
//! Two independent units share the network configuration:
//! - an action dispatcher that maps (resource, operation) pairs onto
//!   Immutable REST and zkEVM JSON-RPC calls, and
//! - a webhook listener that filters inbound platform events.

pub mod blockchain;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod lifecycle;
pub mod observability;
pub mod webhook;

pub use blockchain::{ConnectorError, ConnectorResult, ImmutableClient, NetworkId, NetworkProfile};
pub use config::ConnectorConfig;
pub use dispatch::{Dispatcher, OperationRequest};
pub use lifecycle::Shutdown;
pub use webhook::WebhookServer;
