//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the catalog
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the song catalog service.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits and CORS.
    pub security: SecurityConfig,

    /// Artificial delay and failure injection on the list route.
    pub fault_injection: FaultInjectionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// API documentation settings.
    pub docs: DocsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
    /// Allow cross-origin requests from any origin.
    pub cors_enabled: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
            cors_enabled: true,
        }
    }
}

/// Fault injection for the list route.
///
/// Disabled by default. When enabled, every list request is delayed by a
/// uniform random duration in `[min_delay_ms, max_delay_ms]` and then fails
/// with probability `error_probability`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FaultInjectionConfig {
    pub enabled: bool,

    /// Chance (0.0 to 1.0) that a request is answered with a 500.
    pub error_probability: f64,

    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for FaultInjectionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            error_probability: 0.5,
            min_delay_ms: 100,
            max_delay_ms: 500,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    pub log_level: String,

    /// Directory for the log file.
    pub log_dir: String,

    /// Log file name inside `log_dir`.
    pub log_file: String,

    /// Expose the `/metrics` endpoint.
    pub metrics_enabled: bool,

    /// Export spans over OTLP.
    pub otlp_enabled: bool,

    /// OTLP gRPC collector endpoint.
    pub otlp_endpoint: String,

    /// `service.name` resource attribute on exported spans.
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: ".".to_string(),
            log_file: "app.log".to_string(),
            metrics_enabled: true,
            otlp_enabled: false,
            otlp_endpoint: "http://tempo:4317".to_string(),
            service_name: "song-catalog".to_string(),
        }
    }
}

/// Swagger UI configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DocsConfig {
    /// Serve Swagger UI and the OpenAPI document.
    pub enabled: bool,

    /// Mount path of the UI; the document lives at `{path}/swagger.json`.
    pub path: String,

    /// Application name shown in the UI.
    pub title: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/swaggerui".to_string(),
            title: "MUSICAL CATALOG API".to_string(),
        }
    }
}

impl DocsConfig {
    /// Location of the OpenAPI document.
    pub fn spec_url(&self) -> String {
        format!("{}/swagger.json", self.path.trim_end_matches('/'))
    }
}
