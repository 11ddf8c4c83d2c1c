use std::fmt;

use serde::Serialize;

/// Classified failure of an edit, a codec call, or a history access.
///
/// Every variant except the unit ones carries the detail text that is
/// surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("Hotspot outside image bounds: {0}")]
    InvalidHotspot(String),

    #[error("Instruction is empty: {0}")]
    EmptyInstruction(String),

    #[error("Invalid crop region: {0}")]
    InvalidRegion(String),

    #[error("Content blocked by generator: {0}")]
    ContentBlocked(String),

    #[error("Malformed image payload: {0}")]
    MalformedPayload(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("A transformation is already pending")]
    Busy,

    #[error("History accessed before an image was loaded")]
    NotInitialized,

    #[error("History is already initialized; reset it first")]
    AlreadyInitialized,
}

/// Copyable classification of an [`EditError`], suitable for UI state and
/// event payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidHotspot,
    EmptyInstruction,
    InvalidRegion,
    ContentBlocked,
    MalformedPayload,
    TransportError,
    UnsupportedFormat,
    Busy,
    NotInitialized,
    AlreadyInitialized,
}

impl EditError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidHotspot(_) => ErrorKind::InvalidHotspot,
            Self::EmptyInstruction(_) => ErrorKind::EmptyInstruction,
            Self::InvalidRegion(_) => ErrorKind::InvalidRegion,
            Self::ContentBlocked(_) => ErrorKind::ContentBlocked,
            Self::MalformedPayload(_) => ErrorKind::MalformedPayload,
            Self::TransportError(_) => ErrorKind::TransportError,
            Self::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Self::Busy => ErrorKind::Busy,
            Self::NotInitialized => ErrorKind::NotInitialized,
            Self::AlreadyInitialized => ErrorKind::AlreadyInitialized,
        }
    }

    /// Detail text without the kind prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidHotspot(d)
            | Self::EmptyInstruction(d)
            | Self::InvalidRegion(d)
            | Self::ContentBlocked(d)
            | Self::MalformedPayload(d)
            | Self::TransportError(d)
            | Self::UnsupportedFormat(d) => d.clone(),
            other => other.to_string(),
        }
    }

    /// `true` for errors that indicate a caller-side defect rather than a
    /// transient or user-correctable condition.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::NotInitialized | Self::AlreadyInitialized)
    }

    /// `true` when re-issuing the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ContentBlocked(_)
                | Self::MalformedPayload(_)
                | Self::TransportError(_)
                | Self::Busy
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidHotspot => "invalid_hotspot",
            Self::EmptyInstruction => "empty_instruction",
            Self::InvalidRegion => "invalid_region",
            Self::ContentBlocked => "content_blocked",
            Self::MalformedPayload => "malformed_payload",
            Self::TransportError => "transport_error",
            Self::UnsupportedFormat => "unsupported_format",
            Self::Busy => "busy",
            Self::NotInitialized => "not_initialized",
            Self::AlreadyInitialized => "already_initialized",
        };
        f.write_str(name)
    }
}
