//! Request dispatch module
//!
//! Entry point for HTTP request processing: access logging, preflight and
//! body-size guards, route table resolution, and target execution.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::handler::HandlerEntry;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{RouteDecision, RouteTarget};

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();
    let is_head = method == Method::HEAD;

    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let response = dispatch(&req, &method, uri.path(), is_head, &state).await;

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = version_str(version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = body_size_of(&response);
        entry.user_agent = user_agent;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Resolve and execute a request against the route table
async fn dispatch<B>(
    req: &Request<B>,
    method: &Method,
    path: &str,
    is_head: bool,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    // 1. Preflight
    if *method == Method::OPTIONS {
        return http::build_options_response(state.config.http.enable_cors);
    }

    // 2. Content-Length guard
    if let Some(resp) = check_body_size(req, state.config.http.max_body_size) {
        return resp;
    }

    // 3. Route table resolution; HEAD resolves like GET
    let lookup = if is_head { Method::GET } else { method.clone() };
    match state.routes.resolve(&lookup, path) {
        RouteDecision::Matched(target) => execute_target(target, is_head, state).await,
        RouteDecision::MethodNotAllowed(allowed) => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            http::build_405_response(&format_allow(&allowed))
        }
        RouteDecision::NotFound => http::build_404_response(),
    }
}

/// Validate Content-Length header against max body size
/// Returns Some(413 response) if too large, None otherwise
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Execute a resolved route target
async fn execute_target(
    target: &RouteTarget,
    is_head: bool,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    match target {
        RouteTarget::Health => http::build_health_response("ok"),
        RouteTarget::Handlers => build_handlers_listing(state, is_head),
        RouteTarget::Trigger => match state.registry.first() {
            Some(entry) => run_entry(entry, state, is_head).await,
            None => {
                logger::log_warning("Trigger received with empty handler registry");
                http::build_503_response()
            }
        },
        RouteTarget::TriggerNamed { name } => match state.registry.get(name) {
            Some(entry) => run_entry(entry, state, is_head).await,
            None => http::build_404_response(),
        },
    }
}

/// Invoke a registry entry and translate the outcome
async fn run_entry(
    entry: &HandlerEntry,
    state: &Arc<AppState>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match entry.invoke().await {
        Ok(()) => http::build_text_response("success", &state.config.http, is_head),
        Err(e) => {
            logger::log_handler_error(entry.name(), &e);
            http::build_500_response()
        }
    }
}

/// JSON listing of registered handlers with invocation counts
fn build_handlers_listing(state: &Arc<AppState>, is_head: bool) -> Response<Full<Bytes>> {
    let listing: Vec<serde_json::Value> = state
        .registry
        .entries()
        .iter()
        .map(|e| {
            serde_json::json!({
                "name": e.name(),
                "kind": e.kind(),
                "invocations": e.invocations(),
            })
        })
        .collect();

    http::build_json_response(
        serde_json::Value::Array(listing).to_string(),
        &state.config.http,
        is_head,
    )
}

/// Format the Allow header for a 405 answer
///
/// GET implies HEAD, and OPTIONS is always answered by the preflight arm.
fn format_allow(allowed: &[Method]) -> String {
    let mut parts: Vec<String> = Vec::new();
    for method in allowed {
        if !parts.contains(&method.to_string()) {
            parts.push(method.to_string());
        }
        if *method == Method::GET && !parts.iter().any(|p| p == "HEAD") {
            parts.push(Method::HEAD.to_string());
        }
    }
    parts.push(Method::OPTIONS.to_string());
    parts.join(", ")
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

/// Exact body size from the response payload
fn body_size_of(response: &Response<Full<Bytes>>) -> usize {
    use hyper::body::Body;
    usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        Config, HandlerKind, HandlerSpec, HandlersConfig, HttpConfig, LoggingConfig,
        PerformanceConfig, RoutesConfig, ServerConfig,
    };
    use crate::handler::{build_registry, Handler, HandlerError, HandlerRegistry};
    use crate::routing::build_route_table;
    use async_trait::async_trait;

    struct FailingHandler;

    #[async_trait]
    impl Handler for FailingHandler {
        async fn handle(&self) -> Result<(), HandlerError> {
            Err(HandlerError::Io(std::io::Error::other("boom")))
        }
    }

    fn make_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                workers: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
                show_headers: false,
                access_log_format: "combined".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
                max_connections: None,
            },
            http: HttpConfig {
                server_name: "dispatchd/0.1".to_string(),
                enable_cors: false,
                max_body_size: 1024,
            },
            routes: RoutesConfig::default(),
            handlers: HandlersConfig::default(),
        }
    }

    fn make_state(registry: HandlerRegistry) -> Arc<AppState> {
        let config = make_config();
        let routes = build_route_table(&config.routes, &registry);
        Arc::new(AppState::new(config, Arc::new(registry), Arc::new(routes)))
    }

    fn make_log_registry(names: &[&str]) -> HandlerRegistry {
        let cfg = HandlersConfig {
            registered: names
                .iter()
                .map(|name| HandlerSpec {
                    name: (*name).to_string(),
                    kind: HandlerKind::Log {
                        message: "ran".to_string(),
                    },
                })
                .collect(),
        };
        build_registry(&cfg).unwrap()
    }

    #[tokio::test]
    async fn test_trigger_returns_success() {
        let state = make_state(make_log_registry(&["audit"]));
        let resp = execute_target(&RouteTarget::Trigger, false, &state).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(body_size_of(&resp), "success".len());
        assert_eq!(state.registry.first().unwrap().invocations(), 1);
    }

    #[tokio::test]
    async fn test_trigger_empty_registry_is_503() {
        let state = make_state(HandlerRegistry::new());
        let resp = execute_target(&RouteTarget::Trigger, false, &state).await;
        assert_eq!(resp.status(), 503);
    }

    #[tokio::test]
    async fn test_trigger_failure_is_500() {
        let mut registry = HandlerRegistry::new();
        registry
            .register("broken", "test", Arc::new(FailingHandler))
            .unwrap();
        let state = make_state(registry);

        let resp = execute_target(&RouteTarget::Trigger, false, &state).await;
        assert_eq!(resp.status(), 500);
        // The failed attempt still counts as an invocation
        assert_eq!(state.registry.first().unwrap().invocations(), 1);
    }

    #[tokio::test]
    async fn test_named_trigger_resolves_by_name() {
        let state = make_state(make_log_registry(&["first", "second"]));
        let target = RouteTarget::TriggerNamed {
            name: "second".to_string(),
        };

        let resp = execute_target(&target, false, &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(state.registry.get("second").unwrap().invocations(), 1);
        assert_eq!(state.registry.get("first").unwrap().invocations(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_routes_and_guards() {
        let state = make_state(make_log_registry(&["audit"]));

        // Known route
        let req = Request::builder().body(()).unwrap();
        let resp = dispatch(&req, &Method::GET, "/client", false, &state).await;
        assert_eq!(resp.status(), 200);

        // Unknown path
        let resp = dispatch(&req, &Method::GET, "/missing", false, &state).await;
        assert_eq!(resp.status(), 404);

        // Method mismatch on a known path
        let resp = dispatch(&req, &Method::POST, "/client", false, &state).await;
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["Allow"], "GET, HEAD, OPTIONS");

        // Preflight
        let resp = dispatch(&req, &Method::OPTIONS, "/client", false, &state).await;
        assert_eq!(resp.status(), 204);

        // Oversized declared body
        let big = Request::builder()
            .header("content-length", "4096")
            .body(())
            .unwrap();
        let resp = dispatch(&big, &Method::GET, "/client", false, &state).await;
        assert_eq!(resp.status(), 413);
    }

    #[tokio::test]
    async fn test_handlers_listing_reports_invocations() {
        let state = make_state(make_log_registry(&["audit", "marker"]));
        state.registry.first().unwrap().invoke().await.unwrap();

        let resp = execute_target(&RouteTarget::Handlers, false, &state).await;
        assert_eq!(resp.status(), 200);

        let listing: Vec<serde_json::Value> = {
            use http_body_util::BodyExt;
            let bytes = resp.into_body().collect().await.unwrap().to_bytes();
            serde_json::from_slice(&bytes).unwrap()
        };
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0]["name"], "audit");
        assert_eq!(listing[0]["kind"], "log");
        assert_eq!(listing[0]["invocations"], 1);
        assert_eq!(listing[1]["invocations"], 0);
    }

    #[test]
    fn test_format_allow_dedup() {
        let allow = format_allow(&[Method::GET, Method::GET]);
        assert_eq!(allow, "GET, HEAD, OPTIONS");
    }
}
