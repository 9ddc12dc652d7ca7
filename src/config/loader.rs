//! Configuration loading from disk and the environment.

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ApiConfig, Environment, GatewayConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "CRM_API_URL";

/// Environment variable selecting production or development defaults.
pub const ENV_ENVIRONMENT: &str = "CRM_ENV";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The API root every endpoint is appended to. Never ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self(url.trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append an endpoint path, inserting the separating `/` if missing.
    pub fn join(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.0, endpoint)
        } else {
            format!("{}/{}", self.0, endpoint)
        }
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the base URL: explicit setting first, then the environment default.
pub fn resolve_base_url(api: &ApiConfig) -> BaseUrl {
    if let Some(url) = api.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
        return BaseUrl::new(url.trim());
    }
    match api.environment {
        Environment::Production => {
            BaseUrl::new(format!("{}/api", api.production_origin.trim_end_matches('/')))
        }
        Environment::Development => BaseUrl::new(api.development_url.as_str()),
    }
}

/// Apply `CRM_API_URL` and `CRM_ENV` using the given variable lookup.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
        tracing::debug!(url = %url, "Base URL overridden from environment");
        config.api.base_url = Some(url);
    }
    if let Some(raw) = lookup(ENV_ENVIRONMENT) {
        match raw.parse::<Environment>() {
            Ok(environment) => config.api.environment = environment,
            Err(e) => tracing::warn!(error = %e, "Ignoring {}", ENV_ENVIRONMENT),
        }
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load the optional config file, apply process environment overrides, validate.
pub fn load_with_env(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
