// Application state module
// All collaborators are passed in at construction time

use std::sync::Arc;

use super::types::Config;
use crate::handler::HandlerRegistry;
use crate::routing::RouteTable;

/// Shared application state
///
/// Built once in `main` and handed to every connection task. Everything in
/// here is immutable after startup apart from the registry's invocation
/// counters.
pub struct AppState {
    pub config: Config,
    pub registry: Arc<HandlerRegistry>,
    pub routes: Arc<RouteTable>,
}

impl AppState {
    pub fn new(config: Config, registry: Arc<HandlerRegistry>, routes: Arc<RouteTable>) -> Self {
        Self {
            config,
            registry,
            routes,
        }
    }
}
