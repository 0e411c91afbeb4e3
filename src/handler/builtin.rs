//! Built-in handlers
//!
//! Concrete `Handler` implementations constructed from configuration.
//! Declaration order in the config file is registration order.

use async_trait::async_trait;
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

use super::registry::{HandlerRegistry, RegistryError};
use super::{Handler, HandlerError};
use crate::config::{HandlerKind, HandlersConfig};
use crate::logger;

/// Writes a fixed message to the info log
pub struct LogHandler {
    message: String,
}

impl LogHandler {
    pub const fn new(message: String) -> Self {
        Self { message }
    }
}

#[async_trait]
impl Handler for LogHandler {
    async fn handle(&self) -> Result<(), HandlerError> {
        logger::log_handler_message(&self.message);
        Ok(())
    }
}

/// Appends a timestamped marker line to a file
pub struct MarkFileHandler {
    path: PathBuf,
}

impl MarkFileHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Handler for MarkFileHandler {
    async fn handle(&self) -> Result<(), HandlerError> {
        // Create parent directories if they don't exist
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let line = format!("{} mark\n", Local::now().to_rfc3339());
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Sleeps for a configured duration
pub struct DelayHandler {
    ms: u64,
}

impl DelayHandler {
    pub const fn new(ms: u64) -> Self {
        Self { ms }
    }
}

#[async_trait]
impl Handler for DelayHandler {
    async fn handle(&self) -> Result<(), HandlerError> {
        tokio::time::sleep(std::time::Duration::from_millis(self.ms)).await;
        Ok(())
    }
}

/// Build the registry from configuration, preserving declaration order
pub fn build_registry(cfg: &HandlersConfig) -> Result<HandlerRegistry, RegistryError> {
    let mut registry = HandlerRegistry::new();
    for spec in &cfg.registered {
        let handler: Arc<dyn Handler> = match &spec.kind {
            HandlerKind::Log { message } => Arc::new(LogHandler::new(message.clone())),
            HandlerKind::MarkFile { path } => Arc::new(MarkFileHandler::new(path.clone())),
            HandlerKind::Delay { ms } => Arc::new(DelayHandler::new(*ms)),
        };
        registry.register(spec.name.clone(), spec.kind.kind_name(), handler)?;
    }
    Ok(registry)
}
