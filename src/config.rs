use std::time::Duration;

use crate::cache::CacheConfig;

/// Configuration error: a required variable is missing or unparseable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} is not valid: {1}")]
    Invalid(&'static str, String),
}

/// Core configuration, read from the environment (the binary loads `.env`
/// first). Library consumers may also build it by hand.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Base URL of the marketplace API, including the `/api` prefix.
    pub api_base_url: String,
    /// Access token for the signed-in user, when there is one.
    pub access_token: Option<String>,
    /// Path the login redirect points at.
    pub login_path: String,
    /// Per-request timeout for the HTTP client.
    pub request_timeout: Duration,
    /// TTLs for the query cache.
    pub cache: CacheConfig,
}

impl CoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = std::env::var("MARKETPLACE_API_URL")
            .map_err(|_| ConfigError::Missing("MARKETPLACE_API_URL"))?;
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "MARKETPLACE_API_URL",
                format!("expected an http(s) URL, got {api_base_url:?}"),
            ));
        }

        let access_token = std::env::var("ACCESS_TOKEN").ok().filter(|t| !t.is_empty());
        let login_path = std::env::var("LOGIN_PATH").unwrap_or_else(|_| "/login".to_string());

        let request_timeout = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse()
                    .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS", raw))?,
            ),
            Err(_) => Duration::from_secs(30),
        };

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            access_token,
            login_path,
            request_timeout,
            cache: CacheConfig::from_env(),
        })
    }
}
