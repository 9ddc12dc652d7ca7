//! Response interpretation.
//!
//! Pure functions over (content type, body text) so the envelope rules can
//! be tested without a server.

use serde_json::Value;

use crate::gateway::error::{GatewayError, GatewayResult};

/// A parsed success payload, tagged by envelope shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `{ "data": ..., ... }`; holds the `data` value.
    Wrapped(Value),
    /// Anything else, unchanged.
    Bare(Value),
}

impl Envelope {
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Object(mut map) => match map.remove("data") {
                Some(data) => Envelope::Wrapped(data),
                None => Envelope::Bare(Value::Object(map)),
            },
            other => Envelope::Bare(other),
        }
    }

    /// The payload callers see. JSON `null` becomes `None`.
    pub fn into_payload(self) -> Option<Value> {
        let value = match self {
            Envelope::Wrapped(value) | Envelope::Bare(value) => value,
        };
        match value {
            Value::Null => None,
            other => Some(other),
        }
    }
}

/// Whether a `Content-Type` value announces a JSON body.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| {
            let mime = ct
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

/// Interpret a 2xx response.
///
/// Non-JSON content types and blank bodies are `Ok(None)`. A JSON content
/// type with an unparseable body is a malformed-response error.
pub fn interpret_success(content_type: Option<&str>, body: &str) -> GatewayResult<Option<Value>> {
    if !is_json_content_type(content_type) {
        return Ok(None);
    }
    if body.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(body).map_err(|e| {
        tracing::warn!(error = %e, body_len = body.len(), "Failed to parse JSON response");
        GatewayError::malformed_response()
    })?;

    Ok(Envelope::classify(value).into_payload())
}
