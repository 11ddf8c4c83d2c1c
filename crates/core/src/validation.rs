//! Local precondition checks for transformation requests.
//!
//! These run before any generator call; a request that fails here never
//! leaves the process.

use crate::error::EditError;
use crate::types::{Hotspot, ImageResource, Rect, TransformRequest};

/// Validate `request` against the image it would be applied to.
pub fn validate_request(base: &ImageResource, request: &TransformRequest) -> Result<(), EditError> {
    match request {
        TransformRequest::Retouch { hotspot } => validate_hotspot(base, hotspot),
        TransformRequest::Filter { style } => validate_instruction(style, "filter style"),
        TransformRequest::Adjustment { adjustment } => {
            validate_instruction(adjustment, "adjustment description")
        }
        TransformRequest::Crop { rect } => validate_region(base, rect),
    }
}

/// The hotspot must address a pixel of `base` and carry a non-blank
/// instruction.
pub fn validate_hotspot(base: &ImageResource, hotspot: &Hotspot) -> Result<(), EditError> {
    let in_bounds = (0..i64::from(base.width())).contains(&hotspot.x)
        && (0..i64::from(base.height())).contains(&hotspot.y);

    if !in_bounds {
        return Err(EditError::InvalidHotspot(format!(
            "({}, {}) is outside the {}x{} image",
            hotspot.x,
            hotspot.y,
            base.width(),
            base.height()
        )));
    }

    validate_instruction(&hotspot.instruction, "retouch instruction")
}

/// Reject instructions that are empty after trimming.
pub fn validate_instruction(text: &str, what: &str) -> Result<(), EditError> {
    if text.trim().is_empty() {
        Err(EditError::EmptyInstruction(format!("{what} must not be blank")))
    } else {
        Ok(())
    }
}

/// The rectangle must have positive size and lie entirely inside `base`.
pub fn validate_region(base: &ImageResource, rect: &Rect) -> Result<(), EditError> {
    if rect.width <= 0 || rect.height <= 0 {
        return Err(EditError::InvalidRegion(format!(
            "{rect} has non-positive size"
        )));
    }

    let fits = rect.x >= 0
        && rect.y >= 0
        && rect.x.saturating_add(rect.width) <= i64::from(base.width())
        && rect.y.saturating_add(rect.height) <= i64::from(base.height());

    if !fits {
        return Err(EditError::InvalidRegion(format!(
            "{rect} exceeds the {}x{} image",
            base.width(),
            base.height()
        )));
    }

    Ok(())
}
