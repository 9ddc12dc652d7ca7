//! Closed error taxonomy for gateway calls.

use serde_json::Value;
use thiserror::Error;

pub const RATE_LIMITED_MESSAGE: &str = "Service temporarily unavailable. Please try again later.";
pub const SERVER_FAULT_MESSAGE: &str = "Internal server error";
pub const NOT_FOUND_MESSAGE: &str = "Resource not found";
pub const UNAUTHENTICATED_MESSAGE: &str = "Authentication required. Please sign in.";
pub const BAD_REQUEST_MESSAGE: &str = "Bad request";
pub const IDENTITY_REJECTED_MESSAGE: &str =
    "User authentication failed. Please refresh the page and try again.";
pub const MALFORMED_RESPONSE_MESSAGE: &str = "Invalid response format from server";

/// Request parameter the API names when identity is missing.
const IDENTITY_PARAM: &str = "userid";

/// Kind of failure, one per HTTP status class plus local failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// 429
    RateLimited,
    /// 500
    ServerFault,
    /// 404
    NotFound,
    /// 401, or no identity when identity is required
    Unauthenticated,
    /// 400
    BadRequest,
    /// Any other non-2xx status
    UnknownHttpError,
    /// 2xx body that is not the JSON the caller expects
    MalformedResponse,
    /// Connection refused, DNS failure, timeout...
    TransportError,
    /// The request could not be built locally
    InvalidRequest,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::RateLimited => "rate_limited",
            ErrorCategory::ServerFault => "server_fault",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::Unauthenticated => "unauthenticated",
            ErrorCategory::BadRequest => "bad_request",
            ErrorCategory::UnknownHttpError => "unknown_http_error",
            ErrorCategory::MalformedResponse => "malformed_response",
            ErrorCategory::TransportError => "transport_error",
            ErrorCategory::InvalidRequest => "invalid_request",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised to gateway callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub category: ErrorCategory,
    pub message: String,
    /// HTTP status, when the failure came from a response.
    pub status: Option<u16>,
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            status: None,
        }
    }

    pub fn malformed_response() -> Self {
        Self::new(ErrorCategory::MalformedResponse, MALFORMED_RESPONSE_MESSAGE)
    }

    pub fn unauthenticated() -> Self {
        Self::new(ErrorCategory::Unauthenticated, UNAUTHENTICATED_MESSAGE)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::InvalidRequest, message)
    }

    pub fn transport(err: &reqwest::Error) -> Self {
        Self::new(ErrorCategory::TransportError, err.to_string())
    }

    /// Map a non-2xx status and its raw body to a typed error.
    ///
    /// The body is parsed leniently: empty or non-JSON text counts as an
    /// empty error object.
    pub fn from_status(status: u16, body: &str) -> Self {
        let server_message = server_error_message(body);

        let (category, message) = match status {
            429 => (
                ErrorCategory::RateLimited,
                server_message.unwrap_or_else(|| RATE_LIMITED_MESSAGE.to_string()),
            ),
            500 => (
                ErrorCategory::ServerFault,
                server_message.unwrap_or_else(|| SERVER_FAULT_MESSAGE.to_string()),
            ),
            404 => (ErrorCategory::NotFound, NOT_FOUND_MESSAGE.to_string()),
            401 => (ErrorCategory::Unauthenticated, UNAUTHENTICATED_MESSAGE.to_string()),
            400 => {
                let message = match server_message {
                    Some(msg) if msg.to_ascii_lowercase().contains(IDENTITY_PARAM) => {
                        IDENTITY_REJECTED_MESSAGE.to_string()
                    }
                    Some(msg) => msg,
                    None => BAD_REQUEST_MESSAGE.to_string(),
                };
                (ErrorCategory::BadRequest, message)
            }
            other => (
                ErrorCategory::UnknownHttpError,
                format!("Request failed with status {}", other),
            ),
        };

        Self {
            category,
            message,
            status: Some(status),
        }
    }
}

/// Non-empty `error` string from an error body, if any.
fn server_error_message(body: &str) -> Option<String> {
    let value: Value = if body.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(body).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Error body is not JSON");
            Value::Object(Default::default())
        })
    };

    value
        .get("error")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
