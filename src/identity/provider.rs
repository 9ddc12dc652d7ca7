//! Remote session providers.

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a remote session provider. Never surfaces to gateway callers.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session lookup failed: {0}")]
    Lookup(String),
}

/// External auth collaborator exposing the current session.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Identity token of the current session, if one is signed in.
    async fn current_session(&self) -> Result<Option<String>, SessionError>;
}

/// Provider for deployments without remote auth.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSessionProvider;

#[async_trait]
impl SessionProvider for NoSessionProvider {
    async fn current_session(&self) -> Result<Option<String>, SessionError> {
        Ok(None)
    }
}

/// Provider returning a fixed token, e.g. one passed on the command line.
#[derive(Debug, Clone, Default)]
pub struct StaticSessionProvider {
    token: Option<String>,
}

impl StaticSessionProvider {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn current_session(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.clone())
    }
}
