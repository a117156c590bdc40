//! Webhook listener subsystem.
//!
//! # Data Flow
//! ```text
//! POST <path> (JSON body, non-JSON treated as null)
//!     → events::filter (selector from config)
//!     → Forward: sink.rs (stdout JSON lines or channel), 200 + event JSON
//!     → Drop: 200 + reason text
//!
//! Startup: registration.rs create (unless already registered)
//! Shutdown: drain in-flight requests, then registration.rs delete
//! ```

pub mod registration;
pub mod server;
pub mod sink;

pub use registration::{RegistrationStore, WebhookRegistration};
pub use server::{ServerError, WebhookServer};
pub use sink::EventSink;
