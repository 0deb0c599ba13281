//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the authentication relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Authentication relay settings (prefix, base origin).
    pub auth: AuthConfig,

    /// Identity provider settings (endpoint, pass-through secrets).
    pub identity: IdentityConfig,

    /// Cross-origin settings for the SPA frontend.
    pub cors: CorsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Authentication relay settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Path prefix that selects requests for the relay.
    pub path_prefix: String,

    /// Externally reachable origin of this relay, used to rebuild absolute
    /// URLs for the identity provider (e.g., "http://localhost:3000").
    /// Required; no usable default exists.
    pub base_origin: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            path_prefix: "/api/auth".to_string(),
            base_origin: String::new(),
        }
    }
}

/// Identity provider settings.
///
/// The secret and storage connection string are consumed by the provider at
/// initialization and never interpreted by the relay itself.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct IdentityConfig {
    /// Entry point of the identity service. Required.
    pub endpoint: String,

    /// Shared secret attached to forwarded requests. Required.
    pub secret: String,

    /// Storage connection string handed to the provider. Required.
    pub database_url: String,
}

/// Cross-origin settings for the browser frontend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origin allowed to send credentialed requests.
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "http://localhost:5173".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    /// Enforced by the transport layer; the relay imposes none of its own.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Bind address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
