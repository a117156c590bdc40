//! Webhook event filtering.
//!
//! # Responsibilities
//! - Map a selector category to the raw upstream types it accepts
//! - Apply optional collection, user and token filters
//! - Normalize forwarded payloads
//!
//! Filtering is pure and infallible; malformed payloads degrade to the
//! `unknown` type and are dropped or forwarded like any other.

pub mod filter;
pub mod types;

pub use filter::{allowed_types, filter};
pub use types::{
    DropReason, EventCategory, EventFilters, EventSelector, ForwardDecision, NormalizedEvent,
};
