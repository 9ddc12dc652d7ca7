//! Bounded identity resolution.
//!
//! Each attempt checks the local session store first and only asks the
//! remote provider when no valid local record exists. Failed attempts back
//! off with strictly increasing delays; once attempts are exhausted the
//! caller proceeds without identity.

use std::sync::Arc;

use crate::config::IdentityConfig;
use crate::identity::provider::SessionProvider;
use crate::identity::store::{parse_session_record, SessionStore};
use crate::identity::{IdentitySource, IdentityToken};
use crate::observability::metrics;
use crate::resilience::backoff::backoff_delay;

/// Outcome of one resolution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityResolution {
    pub token: Option<IdentityToken>,
    pub source: Option<IdentitySource>,
    /// Attempts made, including the successful one.
    pub attempts: u32,
}

impl IdentityResolution {
    pub fn is_resolved(&self) -> bool {
        self.token.is_some()
    }
}

/// Resolves the caller identity fresh for every request.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn SessionStore>,
    provider: Arc<dyn SessionProvider>,
    config: IdentityConfig,
}

impl IdentityResolver {
    pub fn new(
        store: Arc<dyn SessionStore>,
        provider: Arc<dyn SessionProvider>,
        config: IdentityConfig,
    ) -> Self {
        Self {
            store,
            provider,
            config,
        }
    }

    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// Run the bounded resolution loop.
    pub async fn resolve(&self) -> IdentityResolution {
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            if let Some((token, source)) = self.try_once().await {
                tracing::debug!(attempt, source = source.as_str(), "Identity resolved");
                metrics::record_identity_resolution(source.as_str(), attempt);
                return IdentityResolution {
                    token: Some(token),
                    source: Some(source),
                    attempts: attempt,
                };
            }

            if attempt < max_attempts {
                let delay = backoff_delay(
                    self.config.strategy,
                    attempt,
                    self.config.base_delay_ms,
                    self.config.max_delay_ms,
                );
                tracing::debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "No identity yet, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }

        tracing::warn!(
            attempts = max_attempts,
            "No identity resolved, proceeding unauthenticated"
        );
        metrics::record_identity_resolution("none", max_attempts);
        IdentityResolution {
            token: None,
            source: None,
            attempts: max_attempts,
        }
    }

    async fn try_once(&self) -> Option<(IdentityToken, IdentitySource)> {
        if let Some(token) = self
            .store
            .get(&self.config.session_key)
            .and_then(|raw| parse_session_record(&raw))
        {
            return Some((token, IdentitySource::LocalSession));
        }

        match self.provider.current_session().await {
            Ok(Some(token)) if !token.trim().is_empty() => {
                Some((IdentityToken::new(token), IdentitySource::RemoteSession))
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Remote session lookup failed");
                None
            }
        }
    }
}
