// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub handlers: HandlersConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Routes configuration
///
/// Paths are fixed at startup; the route table is built from these values
/// plus one named trigger route per registered handler.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RoutesConfig {
    /// Trigger endpoint that invokes the first registered handler
    #[serde(default = "default_trigger_path")]
    pub trigger_path: String,
    /// Introspection endpoint listing registered handlers
    #[serde(default = "default_handlers_path")]
    pub handlers_path: String,
    /// Health check configuration
    #[serde(default)]
    pub health: HealthConfig,
}

#[allow(clippy::missing_const_for_fn)]
fn default_trigger_path() -> String {
    "/client".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_handlers_path() -> String {
    "/handlers".to_string()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            trigger_path: default_trigger_path(),
            handlers_path: default_handlers_path(),
            health: HealthConfig::default(),
        }
    }
}

/// Health check configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}

/// Handlers configuration
///
/// `registered` is an ordered list. Declaration order is registration order,
/// which in turn defines which handler is "first".
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HandlersConfig {
    #[serde(default)]
    pub registered: Vec<HandlerSpec>,
}

/// A single handler declaration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct HandlerSpec {
    /// Unique handler name
    pub name: String,
    #[serde(flatten)]
    pub kind: HandlerKind,
}

/// Handler kinds
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HandlerKind {
    /// Write a fixed message to the info log
    Log { message: String },
    /// Append a timestamped marker line to a file
    MarkFile { path: String },
    /// Sleep for the given number of milliseconds
    Delay { ms: u64 },
}

impl HandlerKind {
    /// Stable kind name as it appears in configuration and introspection
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Log { .. } => "log",
            Self::MarkFile { .. } => "mark_file",
            Self::Delay { .. } => "delay",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_spec_deserialize_tagged() {
        let spec: HandlerSpec =
            serde_json::from_str(r#"{"name":"audit","type":"log","message":"triggered"}"#).unwrap();
        assert_eq!(spec.name, "audit");
        assert_eq!(
            spec.kind,
            HandlerKind::Log {
                message: "triggered".to_string()
            }
        );
        assert_eq!(spec.kind.kind_name(), "log");
    }

    #[test]
    fn test_routes_config_defaults() {
        let routes = RoutesConfig::default();
        assert_eq!(routes.trigger_path, "/client");
        assert_eq!(routes.handlers_path, "/handlers");
        assert!(routes.health.enabled);
        assert_eq!(routes.health.liveness_path, "/healthz");
        assert_eq!(routes.health.readiness_path, "/readyz");
    }
}
