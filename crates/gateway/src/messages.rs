//! Wire types for the generator's `generateContent` endpoint.
//!
//! Requests carry one inline image part and one text part. Responses carry
//! zero or more candidates whose content is a list of typed parts, plus
//! optional stop signals (`finishReason`, `promptFeedback.blockReason`).
//! Every response field is optional on the way in: the generator is
//! untrusted and absent fields must never fail deserialization.

use retouch_core::codec::TransportPayload;
use serde::{Deserialize, Serialize};

/// Body of a `POST .../models/{model}:generateContent` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// A single user turn: the image first, then the instruction.
    pub fn image_edit(payload: TransportPayload, instruction: String) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::image(payload), Part::text(instruction)],
            }],
        }
    }
}

/// One turn of content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A typed part. At most one of the fields is expected to be set; unknown
/// part types deserialize with both empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }

    pub fn image(payload: TransportPayload) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: payload.mime_type,
                data: payload.data,
            }),
        }
    }
}

/// Base64 image data with its declared MIME type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub data: String,
}

impl From<InlineData> for TransportPayload {
    fn from(inline: InlineData) -> Self {
        Self {
            mime_type: inline.mime_type,
            data: inline.data,
        }
    }
}

/// Response body of `generateContent`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// One generated alternative.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    /// e.g. `STOP`, `SAFETY`, `RECITATION`, `PROHIBITED_CONTENT`.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Present when the prompt itself was rejected before generation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Parts of the first candidate, or an empty slice.
    pub fn parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// The most specific stop code available: a prompt block reason first,
    /// then the first candidate's finish reason unless it is a normal `STOP`.
    pub fn stop_reason(&self) -> Option<&str> {
        let blocked = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
            .filter(|r| !r.is_empty());
        let finished = self
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .filter(|r| !r.is_empty() && *r != "STOP");
        blocked.or(finished)
    }
}

/// Parse a raw response body.
pub fn parse_response(text: &str) -> Result<GenerateContentResponse, serde_json::Error> {
    serde_json::from_str(text)
}
