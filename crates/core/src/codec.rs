//! Conversion between raw image bytes, validated [`ImageResource`]s, the
//! base64 transport form the generator expects, and `data:` URIs for display.
//!
//! Dimensions are read header-only; pixels are never decoded here.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::types::{ContentType, ImageResource};

/// Encoded image as sent to or received from the external generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportPayload {
    /// Declared MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// Standard base64 of the image bytes.
    pub data: String,
}

/// A `data:<mime>;base64,<data>` URI for on-screen rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUri(String);

impl DisplayUri {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

pub struct ImageCodec;

impl ImageCodec {
    /// Validate raw bytes declared as `content_type` and wrap them.
    ///
    /// Fails with `UnsupportedFormat` for MIME types the generator does not
    /// accept and with `MalformedPayload` when the header cannot be read.
    pub fn load(bytes: Vec<u8>, content_type: &str) -> Result<ImageResource, EditError> {
        let content_type = ContentType::from_mime(content_type).ok_or_else(|| {
            EditError::UnsupportedFormat(format!(
                "'{content_type}' is not one of image/png, image/jpeg, image/webp"
            ))
        })?;
        Self::load_as(bytes, content_type)
    }

    /// Detect the content type from magic bytes and load.
    pub fn load_sniffed(bytes: Vec<u8>) -> Result<ImageResource, EditError> {
        let content_type = Self::sniff(&bytes)?;
        Self::load_as(bytes, content_type)
    }

    /// Detect PNG, JPEG or WEBP from the leading bytes.
    pub fn sniff(bytes: &[u8]) -> Result<ContentType, EditError> {
        let format = image::guess_format(bytes)
            .map_err(|e| EditError::MalformedPayload(format!("unrecognized image data: {e}")))?;
        ContentType::from_image_format(format).ok_or_else(|| {
            EditError::UnsupportedFormat(format!("{format:?} images are not supported"))
        })
    }

    /// Produce the transport form of a resource.
    pub fn encode(resource: &ImageResource) -> Result<TransportPayload, EditError> {
        Ok(TransportPayload {
            mime_type: resource.content_type().mime().to_string(),
            data: BASE64.encode(resource.bytes()),
        })
    }

    /// Inverse of [`encode`](Self::encode).
    ///
    /// The declared MIME type is advisory: the bytes are sniffed and the
    /// detected format wins. Anything that is not valid base64 of a supported
    /// image is `MalformedPayload`.
    pub fn decode(payload: &TransportPayload) -> Result<ImageResource, EditError> {
        let bytes = BASE64
            .decode(payload.data.trim())
            .map_err(|e| EditError::MalformedPayload(format!("invalid base64: {e}")))?;

        if bytes.is_empty() {
            return Err(EditError::MalformedPayload("empty image data".to_string()));
        }

        let detected = Self::sniff(&bytes).map_err(|e| EditError::MalformedPayload(e.detail()))?;

        if ContentType::from_mime(&payload.mime_type) != Some(detected) {
            tracing::debug!(
                declared = %payload.mime_type,
                detected = %detected,
                "Payload MIME type differs from its content",
            );
        }

        Self::load_as(bytes, detected)
    }

    /// Render a resource as a `data:` URI.
    pub fn to_displayable(resource: &ImageResource) -> DisplayUri {
        DisplayUri(format!(
            "data:{};base64,{}",
            resource.content_type().mime(),
            BASE64.encode(resource.bytes())
        ))
    }

    // ---- private helpers ----

    fn load_as(bytes: Vec<u8>, content_type: ContentType) -> Result<ImageResource, EditError> {
        let (width, height) = image::ImageReader::with_format(
            Cursor::new(bytes.as_slice()),
            content_type.image_format(),
        )
        .into_dimensions()
        .map_err(|e| {
            EditError::MalformedPayload(format!("cannot read {content_type} header: {e}"))
        })?;

        if width == 0 || height == 0 {
            return Err(EditError::MalformedPayload(format!(
                "image has zero area ({width}x{height})"
            )));
        }

        Ok(ImageResource::from_parts(bytes, content_type, width, height))
    }
}
