//! Route table module
//!
//! An ordered table of (method, path) pairs resolving to dispatch targets.
//! Matching is exact on path, first match wins. A path registered under
//! other methods resolves to a method-not-allowed decision carrying the
//! allowed set, so the dispatcher can emit an accurate Allow header.

use hyper::Method;

use crate::config::RoutesConfig;
use crate::handler::HandlerRegistry;

/// Action taken when a route matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// Invoke the first registered handler
    Trigger,
    /// Invoke a specific handler by name
    TriggerNamed { name: String },
    /// JSON listing of registered handlers
    Handlers,
    /// Direct liveness/readiness answer
    Health,
}

/// A single route entry
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub path: String,
    pub target: RouteTarget,
}

/// Result of resolving a request against the table
#[derive(Debug, PartialEq, Eq)]
pub enum RouteDecision<'a> {
    Matched(&'a RouteTarget),
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

/// Ordered route table
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Append a route; earlier routes take precedence
    pub fn add(&mut self, method: Method, path: impl Into<String>, target: RouteTarget) {
        self.routes.push(Route {
            method,
            path: path.into(),
            target,
        });
    }

    /// Resolve method and path against the table, first match wins
    pub fn resolve(&self, method: &Method, path: &str) -> RouteDecision<'_> {
        if let Some(route) = self
            .routes
            .iter()
            .find(|r| r.path == path && r.method == *method)
        {
            return RouteDecision::Matched(&route.target);
        }

        // Path known under other methods: report what is allowed
        let allowed: Vec<Method> = self
            .routes
            .iter()
            .filter(|r| r.path == path)
            .map(|r| r.method.clone())
            .collect();
        if allowed.is_empty() {
            RouteDecision::NotFound
        } else {
            RouteDecision::MethodNotAllowed(allowed)
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Build the route table from configuration and the populated registry
///
/// Health routes come first so probes stay fast regardless of table growth.
pub fn build_route_table(routes: &RoutesConfig, registry: &HandlerRegistry) -> RouteTable {
    let mut table = RouteTable::new();

    if routes.health.enabled {
        table.add(
            Method::GET,
            routes.health.liveness_path.clone(),
            RouteTarget::Health,
        );
        table.add(
            Method::GET,
            routes.health.readiness_path.clone(),
            RouteTarget::Health,
        );
    }

    table.add(Method::GET, routes.trigger_path.clone(), RouteTarget::Trigger);
    table.add(
        Method::GET,
        routes.handlers_path.clone(),
        RouteTarget::Handlers,
    );

    // One named trigger route per registered handler
    let trigger_prefix = routes.trigger_path.trim_end_matches('/');
    for name in registry.names() {
        table.add(
            Method::GET,
            format!("{trigger_prefix}/{name}"),
            RouteTarget::TriggerNamed {
                name: name.to_string(),
            },
        );
    }

    table
}
