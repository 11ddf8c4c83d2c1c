//! REST client for the generator's `generateContent` endpoint.
//!
//! Wraps a single HTTP call with [`reqwest`]. Status handling and body
//! parsing are kept here so the gateway only sees a parsed response or a
//! [`GeneratorApiError`].

use crate::config::GatewayConfig;
use crate::messages::{parse_response, GenerateContentRequest, GenerateContentResponse};

/// HTTP client for one generator model.
pub struct GeneratorApi {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

/// Errors from the generator REST layer.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The generator returned a non-2xx status code.
    #[error("Generator API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response whose body is not a `generateContent` response.
    #[error("Malformed generator response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GeneratorApi {
    /// Create a client from configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, GeneratorApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &GatewayConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL of the `generateContent` endpoint for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Send one `generateContent` request.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeneratorApiError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        Self::parse_body(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`GeneratorApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GeneratorApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeneratorApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Read a successful body and parse it.
    async fn parse_body(
        response: reqwest::Response,
    ) -> Result<GenerateContentResponse, GeneratorApiError> {
        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        Ok(parse_response(&text)?)
    }
}
