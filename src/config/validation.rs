//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts > 0, delays > 0)
//! - Check the resolved base URL and header name are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use reqwest::header::HeaderName;
use thiserror::Error;

use crate::config::loader::resolve_base_url;
use crate::config::schema::GatewayConfig;
use crate::resilience::backoff::required_cap;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("base URL '{url}' is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("identity.max_attempts must be at least 1")]
    NoIdentityAttempts,

    #[error("identity.base_delay_ms must be greater than 0")]
    ZeroBaseDelay,

    #[error("identity.max_delay_ms ({max_ms}) must be at least {required_ms} so delays keep increasing")]
    DelayCapTooLow { max_ms: u64, required_ms: u64 },

    #[error("identity.header_name '{0}' is not a valid HTTP header name")]
    InvalidHeaderName(String),

    #[error("identity.session_key must not be empty")]
    EmptySessionKey,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let base = resolve_base_url(&config.api);
    match url::Url::parse(base.as_str()) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
        Ok(parsed) => errors.push(ValidationError::InvalidBaseUrl {
            url: base.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidBaseUrl {
            url: base.to_string(),
            reason: e.to_string(),
        }),
    }

    let identity = &config.identity;
    if identity.max_attempts == 0 {
        errors.push(ValidationError::NoIdentityAttempts);
    }
    if identity.base_delay_ms == 0 {
        errors.push(ValidationError::ZeroBaseDelay);
    }
    let required_ms = required_cap(identity.strategy, identity.max_attempts, identity.base_delay_ms);
    if identity.max_delay_ms < required_ms {
        errors.push(ValidationError::DelayCapTooLow {
            max_ms: identity.max_delay_ms,
            required_ms,
        });
    }
    if HeaderName::from_bytes(identity.header_name.as_bytes()).is_err() {
        errors.push(ValidationError::InvalidHeaderName(identity.header_name.clone()));
    }
    if identity.session_key.trim().is_empty() {
        errors.push(ValidationError::EmptySessionKey);
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
