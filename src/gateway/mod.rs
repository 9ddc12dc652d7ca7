//! Request gateway subsystem.
//!
//! # Data Flow
//! ```text
//! caller (api/, CLI)
//!     → client.rs (Gateway::request)
//!         → identity::IdentityResolver (token or none)
//!         → request.rs (headers: content type, request ID, identity, overrides)
//!         → reqwest (single HTTP exchange, no retry)
//!         → non-2xx: error.rs (status → ErrorCategory + message)
//!         → 2xx: response.rs (content type, blank body, envelope unwrap)
//!     → Option<T> or GatewayError
//! ```

pub mod client;
pub mod error;
pub mod request;
pub mod response;

pub use client::Gateway;
pub use error::{ErrorCategory, GatewayError, GatewayResult};
pub use request::{RequestOptions, X_REQUEST_ID};
pub use response::Envelope;
