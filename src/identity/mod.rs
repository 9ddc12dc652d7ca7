//! Caller identity subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway::request
//!     → resolver.rs (attempt 1..=max_attempts)
//!         → store.rs (local demo-user record, `id` field)
//!         → provider.rs (remote session lookup, errors swallowed)
//!         → resilience::backoff (delay before next attempt)
//!     → Option<IdentityToken> attached as the identity header
//! ```
//!
//! # Design Decisions
//! - Resolved fresh on every call; sign-out takes effect immediately
//! - Local record wins; the remote provider is not consulted when it is valid
//! - Exhausting attempts is not fatal here unless `require_identity` is set

pub mod provider;
pub mod resolver;
pub mod store;

use std::fmt;

pub use provider::{NoSessionProvider, SessionError, SessionProvider, StaticSessionProvider};
pub use resolver::{IdentityResolution, IdentityResolver};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

/// Opaque caller identifier sent to the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    LocalSession,
    RemoteSession,
}

impl IdentitySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentitySource::LocalSession => "local",
            IdentitySource::RemoteSession => "remote",
        }
    }
}
