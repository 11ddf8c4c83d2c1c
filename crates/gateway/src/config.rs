use std::time::Duration;

/// Default generator endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default image-capable model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Generator connection settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// API key sent with every request.
    pub api_key: String,
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Model name used in the request path.
    pub model: String,
    /// TCP connect timeout. The overall request deadline is owned by the
    /// orchestrator.
    pub connect_timeout: Duration,
}

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl GatewayConfig {
    /// Configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                                     |
    /// |----------------------------------|---------------------------------------------|
    /// | `GENERATOR_API_KEY`              | required                                    |
    /// | `GENERATOR_BASE_URL`             | `https://generativelanguage.googleapis.com` |
    /// | `GENERATOR_MODEL`                | `gemini-2.5-flash-image-preview`            |
    /// | `GENERATOR_CONNECT_TIMEOUT_SECS` | `10`                                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) but reading through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("GENERATOR_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing("GENERATOR_API_KEY"))?;

        let mut config = Self::new(api_key);

        if let Some(url) = lookup("GENERATOR_BASE_URL").filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(model) = lookup("GENERATOR_MODEL").filter(|m| !m.trim().is_empty()) {
            config.model = model.trim().to_string();
        }

        if let Some(raw) = lookup("GENERATOR_CONNECT_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "GENERATOR_CONNECT_TIMEOUT_SECS",
                expected: "a whole number of seconds",
                value: raw.clone(),
            })?;
            config.connect_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
