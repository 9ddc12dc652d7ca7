//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::resilience::backoff::BackoffStrategy;

/// Root configuration for the request gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Where the CRM API lives.
    pub api: ApiConfig,

    /// Caller identity resolution settings.
    pub identity: IdentityConfig,

    /// Transport timeouts.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Deployment environment, selects the built-in base URL default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// API location configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Explicit base URL. Takes precedence over the environment default.
    pub base_url: Option<String>,

    /// Which built-in default to fall back to.
    pub environment: Environment,

    /// Origin the production `/api` prefix is served from.
    pub production_origin: String,

    /// Local development API root.
    pub development_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            environment: Environment::Development,
            production_origin: "http://localhost:8080".to_string(),
            development_url: "http://localhost:3001/api".to_string(),
        }
    }
}

/// Identity resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Total resolution attempts before proceeding unauthenticated.
    pub max_attempts: u32,

    /// Base backoff unit in milliseconds.
    pub base_delay_ms: u64,

    /// Upper bound on a single backoff delay in milliseconds.
    pub max_delay_ms: u64,

    /// How the delay grows between attempts.
    pub strategy: BackoffStrategy,

    /// Header the identity token is sent under.
    pub header_name: String,

    /// Key of the persisted demo-user session record.
    pub session_key: String,

    /// Fail before sending when no identity resolves.
    pub require_identity: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
            strategy: BackoffStrategy::Linear,
            header_name: "user-id".to_string(),
            session_key: "demoUser".to_string(),
            require_identity: false,
        }
    }
}

/// Timeout configuration. Unset values leave the transport defaults in place.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: Option<u64>,

    /// Whole request timeout in seconds.
    pub request_secs: Option<u64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
