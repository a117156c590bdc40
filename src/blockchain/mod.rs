//! Immutable platform integration subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration (network id, API key, endpoint overrides)
//!     → network.rs (NetworkProfile: REST base, optional RPC, chain slug)
//!     → client.rs (REST / JSON-RPC calls with x-api-key)
//!     → units.rs (wei/eth/gwei, block tags, address syntax)
//! ```
//!
//! # Constraints
//! - Immutable X networks are REST-only; RPC calls fail with `RpcUnavailable`
//! - Token amounts stay in `U256` until the final string rendering
//! - API keys and signing secrets are never logged

pub mod client;
pub mod network;
pub mod types;
pub mod units;

pub use client::{ImmutableClient, RpcCall};
pub use network::{NetworkId, NetworkProfile};
pub use types::{ConnectorError, ConnectorResult};
