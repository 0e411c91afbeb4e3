//! Handler capability module
//!
//! A handler is a unit of work exposing a single no-argument operation.
//! Concrete handlers are declared in configuration, constructed at startup,
//! and invoked on demand through the trigger endpoints.

pub mod builtin;
pub mod registry;

use async_trait::async_trait;

// Re-export main types
pub use builtin::build_registry;
pub use registry::{HandlerEntry, HandlerRegistry, RegistryError};

/// Errors surfaced by a handler invocation
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("handler I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A unit of work invoked on demand
///
/// The operation takes no inputs; effects are implementation-defined.
/// Failures propagate to the dispatcher, which reports them as 500.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self) -> Result<(), HandlerError>;
}
