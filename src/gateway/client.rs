//! The request gateway.
//!
//! # Responsibilities
//! - Resolve caller identity before every call
//! - Issue one HTTP request against the configured base URL
//! - Unwrap `{ success, data }` envelopes
//! - Map failures to the closed error taxonomy
//!
//! The HTTP call itself is never retried. Calls share no mutable state, so
//! concurrent calls complete independently and in any order.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;

use crate::config::{resolve_base_url, BaseUrl, GatewayConfig};
use crate::gateway::error::{GatewayError, GatewayResult};
use crate::gateway::request::{build_headers, new_request_id, RequestOptions};
use crate::gateway::response::interpret_success;
use crate::identity::{IdentityResolver, SessionProvider, SessionStore};
use crate::observability::metrics;

/// HTTP client for the CRM API.
#[derive(Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: BaseUrl,
    resolver: IdentityResolver,
}

impl Gateway {
    /// Create a gateway from validated configuration and its session collaborators.
    pub fn new(
        config: &GatewayConfig,
        store: Arc<dyn SessionStore>,
        provider: Arc<dyn SessionProvider>,
    ) -> GatewayResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeouts.connect_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = config.timeouts.request_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| GatewayError::transport(&e))?;

        let base_url = resolve_base_url(&config.api);
        let resolver = IdentityResolver::new(store, provider, config.identity.clone());

        tracing::info!(base_url = %base_url, "Gateway initialized");

        Ok(Self::with_client(http, base_url, resolver))
    }

    /// Assemble a gateway from pre-built parts.
    pub fn with_client(http: reqwest::Client, base_url: BaseUrl, resolver: IdentityResolver) -> Self {
        Self {
            http,
            base_url,
            resolver,
        }
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Issue a request and return the unwrapped JSON payload.
    ///
    /// `Ok(None)` means the response had no JSON body (204, non-JSON
    /// content type, blank body, or a `null` payload).
    pub async fn request_value(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> GatewayResult<Option<Value>> {
        let request_id = new_request_id();
        let span = tracing::debug_span!(
            "gateway_request",
            request_id = %request_id,
            method = %options.method,
            endpoint = %endpoint
        );

        let started = Instant::now();
        let result = self
            .execute(endpoint, options, &request_id)
            .instrument(span)
            .await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.category.as_str(),
        };
        metrics::record_request(outcome, started.elapsed());
        result
    }

    /// Issue a request and decode the unwrapped payload into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> GatewayResult<Option<T>> {
        match self.request_value(endpoint, options).await? {
            Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
                tracing::warn!(endpoint = %endpoint, error = %e, "Response does not match expected shape");
                GatewayError::malformed_response()
            }),
            None => Ok(None),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> GatewayResult<Option<T>> {
        self.request(endpoint, RequestOptions::get()).await
    }

    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> GatewayResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(endpoint, RequestOptions::post().with_json(body)?).await
    }

    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> GatewayResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(endpoint, RequestOptions::put().with_json(body)?).await
    }

    pub async fn patch<B, T>(&self, endpoint: &str, body: &B) -> GatewayResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(endpoint, RequestOptions::patch().with_json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> GatewayResult<Option<T>> {
        self.request(endpoint, RequestOptions::delete()).await
    }

    async fn execute(
        &self,
        endpoint: &str,
        options: RequestOptions,
        request_id: &str,
    ) -> GatewayResult<Option<Value>> {
        let identity = self.resolver.resolve().await;
        let identity_config = self.resolver.config();
        if !identity.is_resolved() && identity_config.require_identity {
            tracing::warn!("Identity required but unresolved, not sending request");
            return Err(GatewayError::unauthenticated());
        }

        let headers = build_headers(
            &options,
            request_id,
            &identity_config.header_name,
            identity.token.as_ref(),
        )?;

        let url = self.base_url.join(endpoint);
        let mut request = self.http.request(options.method, &url).headers(headers);
        if let Some(body) = &options.body {
            request = request.body(body.to_string());
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Transport failure");
            GatewayError::transport(&e)
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = GatewayError::from_status(status.as_u16(), &body);
            tracing::warn!(
                status = status.as_u16(),
                category = %err.category,
                error = %err.message,
                "Request failed"
            );
            return Err(err);
        }

        let body = response.text().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to read response body");
            GatewayError::transport(&e)
        })?;

        tracing::debug!(status = status.as_u16(), body_len = body.len(), "Response received");
        interpret_success(content_type.as_deref(), &body)
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url)
            .field("identity_header", &self.resolver.config().header_name)
            .finish()
    }
}
