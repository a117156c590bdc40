//! Action dispatcher subsystem.
//!
//! # Data Flow
//! ```text
//! OperationRequest (resource, operation, params)
//!     → table.rs (static row: REST template, RPC method, or special call)
//!     → params.rs (typed parameter access, validation errors)
//!     → dispatcher.rs (exactly one outbound call, none for local ops)
//!     → normalize.rs (flat OperationResult record)
//!     → batch.rs (ordered outputs, continue-on-error policy)
//! ```
//!
//! # Design Decisions
//! - Dispatch is data-driven; adding an endpoint is adding a table row
//! - Items run sequentially; no request is in flight concurrently within a batch
//! - Unknown (resource, operation) pairs fail with `UnsupportedOperation`

pub mod batch;
pub mod dispatcher;
pub mod normalize;
pub mod params;
pub mod table;

pub use batch::{run_batch, BatchError, ItemOutput};
pub use dispatcher::{Dispatcher, OperationRequest};
pub use normalize::OperationResult;
pub use params::Params;
pub use table::{operations, resolve, OperationSpec, Resource};
