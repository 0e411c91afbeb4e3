//! Handler registry module
//!
//! Ordered registry resolving "the first" handler. The policy is explicit:
//! first registered wins, and registration order follows the declaration
//! order of `[[handlers.registered]]` entries in the configuration file.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{Handler, HandlerError};

/// Errors raised while populating the registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate handler name: {0}")]
    DuplicateName(String),
}

/// A registered handler with its bookkeeping
pub struct HandlerEntry {
    name: String,
    kind: String,
    handler: Arc<dyn Handler>,
    invocations: AtomicU64,
}

impl std::fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("invocations", &self.invocations())
            .finish()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("entries", &self.entries)
            .finish()
    }
}

impl HandlerEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Number of completed or in-flight invocations
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::Relaxed)
    }

    /// Invoke the handler, bumping the invocation counter
    pub async fn invoke(&self) -> Result<(), HandlerError> {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        self.handler.handle().await
    }
}

/// Ordered collection of named handlers
///
/// Entries are held in a `Vec`, never a map, so that registration order is
/// preserved and `first()` has a well-defined answer.
#[derive(Default)]
pub struct HandlerRegistry {
    entries: Vec<HandlerEntry>,
}

impl HandlerRegistry {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a handler under a unique name, appended after existing entries
    pub fn register(
        &mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.entries.iter().any(|e| e.name == name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.entries.push(HandlerEntry {
            name,
            kind: kind.into(),
            handler,
            invocations: AtomicU64::new(0),
        });
        Ok(())
    }

    /// Return the first registered handler, or None when the registry is empty
    pub fn first(&self) -> Option<&HandlerEntry> {
        self.entries.first()
    }

    /// Exact-name lookup
    pub fn get(&self, name: &str) -> Option<&HandlerEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// All entries in registration order
    pub fn entries(&self) -> &[HandlerEntry] {
        &self.entries
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NoopHandler;

    #[async_trait]
    impl Handler for NoopHandler {
        async fn handle(&self) -> Result<(), HandlerError> {
            Ok(())
        }
    }

    fn make_registry(names: &[&str]) -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        for name in names {
            registry
                .register(*name, "noop", Arc::new(NoopHandler))
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_first_is_first_registered() {
        let registry = make_registry(&["alpha", "beta", "gamma"]);
        assert_eq!(registry.first().unwrap().name(), "alpha");
        assert_eq!(registry.names(), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_first_on_empty_registry() {
        let registry = HandlerRegistry::new();
        assert!(registry.first().is_none());
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_get_by_name() {
        let registry = make_registry(&["alpha", "beta"]);
        assert_eq!(registry.get("beta").unwrap().name(), "beta");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = make_registry(&["alpha"]);
        let err = registry
            .register("alpha", "noop", Arc::new(NoopHandler))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(ref n) if n == "alpha"));
        // Registry is unchanged after the rejection
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_invoke_counts_invocations() {
        let registry = make_registry(&["alpha"]);
        let entry = registry.first().unwrap();
        assert_eq!(entry.invocations(), 0);

        entry.invoke().await.unwrap();
        entry.invoke().await.unwrap();
        assert_eq!(entry.invocations(), 2);
        assert_eq!(entry.kind(), "noop");
    }
}
