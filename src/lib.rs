//! CRM API request gateway.
//!
//! Resolves the caller identity, issues requests against the CRM API,
//! unwraps response envelopes and maps failures to a closed error taxonomy.

pub mod api;
pub mod config;
pub mod gateway;
pub mod identity;
pub mod observability;
pub mod resilience;

pub use config::GatewayConfig;
pub use gateway::{ErrorCategory, Gateway, GatewayError, RequestOptions};
pub use identity::{IdentityToken, SessionProvider, SessionStore};
