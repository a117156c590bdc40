//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Ctrl+C or Shutdown::trigger → stop accepting → drain → deregister webhook
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
