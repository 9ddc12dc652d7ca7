//! Outgoing request construction.
//!
//! # Responsibilities
//! - Describe a call (method, header overrides, JSON body)
//! - Generate a unique request ID per call
//! - Build the final header map in a fixed precedence order

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::gateway::error::{GatewayError, GatewayResult};
use crate::identity::IdentityToken;

/// Header carrying the per-call correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Per-call options. Defaults to a bodiless GET.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    /// Caller overrides, applied last.
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` as the JSON payload.
    pub fn with_json<B: Serialize + ?Sized>(self, body: &B) -> GatewayResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| {
            GatewayError::invalid_request(format!("Failed to serialize request body: {}", e))
        })?;
        Ok(self.with_body(value))
    }
}

/// A new request ID.
pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Assemble headers: content type, request ID, identity, then caller overrides.
pub fn build_headers(
    options: &RequestOptions,
    request_id: &str,
    identity_header: &str,
    token: Option<&IdentityToken>,
) -> GatewayResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(X_REQUEST_ID, header_value(request_id)?);

    if let Some(token) = token {
        headers.insert(header_name(identity_header)?, header_value(token.as_str())?);
    }

    for (name, value) in &options.headers {
        headers.insert(header_name(name)?, header_value(value)?);
    }

    Ok(headers)
}

fn header_name(name: &str) -> GatewayResult<HeaderName> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| GatewayError::invalid_request(format!("Invalid header name '{}': {}", name, e)))
}

fn header_value(value: &str) -> GatewayResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| GatewayError::invalid_request(format!("Invalid header value: {}", e)))
}
