//! [`TransformGateway`] backed by the external image generator.
//!
//! Retouch, filter and adjustment requests become one `generateContent`
//! call each; crop is served locally. Whatever the generator returns is
//! normalized into a [`TransformOutcome`].

use retouch_core::codec::ImageCodec;
use retouch_core::crop::extract_region;
use retouch_core::error::EditError;
use retouch_core::gateway::{TransformGateway, TransformOutcome};
use retouch_core::types::{ImageResource, TransformRequest};
use retouch_core::validation::validate_request;

use crate::api::{GeneratorApi, GeneratorApiError};
use crate::config::GatewayConfig;
use crate::messages::{GenerateContentRequest, GenerateContentResponse};
use crate::prompts;

/// Stop code reported when the generator returns neither an image, nor
/// text, nor a stop reason of its own.
pub const NO_IMAGE_REASON: &str = "NO_IMAGE";

pub struct GenerativeGateway {
    api: GeneratorApi,
}

impl GenerativeGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GeneratorApiError> {
        Ok(Self::with_api(GeneratorApi::new(config)?))
    }

    pub fn with_api(api: GeneratorApi) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &GeneratorApi {
        &self.api
    }

    async fn generate(&self, base: &ImageResource, instruction: String) -> TransformOutcome {
        let payload = ImageCodec::encode(base)?;
        let request = GenerateContentRequest::image_edit(payload, instruction);

        tracing::debug!(
            model = self.api.model(),
            width = base.width(),
            height = base.height(),
            "Calling generator",
        );

        let response = self.api.generate_content(&request).await.map_err(|e| {
            tracing::warn!(error = %e, "Generator call failed");
            EditError::TransportError(e.to_string())
        })?;

        normalize_response(&response)
    }
}

impl TransformGateway for GenerativeGateway {
    async fn invoke(&self, base: ImageResource, request: TransformRequest) -> TransformOutcome {
        validate_request(&base, &request)?;

        match request {
            TransformRequest::Crop { rect } => extract_region(&base, &rect),
            TransformRequest::Retouch { hotspot } => {
                self.generate(&base, prompts::retouch(&hotspot)).await
            }
            TransformRequest::Filter { style } => self.generate(&base, prompts::filter(&style)).await,
            TransformRequest::Adjustment { adjustment } => {
                self.generate(&base, prompts::adjustment(&adjustment)).await
            }
        }
    }
}

/// Map a generator response to an outcome.
///
/// 1. The first image part of the first candidate is decoded into the
///    result; any further image parts are ignored.
/// 2. Otherwise the first non-blank text part is the refusal detail.
/// 3. Otherwise the stop reason (or [`NO_IMAGE_REASON`]) is the detail.
pub fn normalize_response(response: &GenerateContentResponse) -> TransformOutcome {
    let parts = response.parts();

    let mut images = parts.iter().filter_map(|p| p.inline_data.as_ref());
    if let Some(inline) = images.next() {
        let extra = images.count();
        if extra > 0 {
            tracing::warn!(extra, "Generator returned more than one image; using the first");
        }
        return ImageCodec::decode(&inline.clone().into());
    }

    if let Some(text) = parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .map(str::trim)
        .find(|t| !t.is_empty())
    {
        return Err(EditError::ContentBlocked(text.to_string()));
    }

    let reason = response.stop_reason().unwrap_or(NO_IMAGE_REASON);
    Err(EditError::ContentBlocked(reason.to_string()))
}
