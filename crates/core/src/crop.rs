//! Deterministic local crop and crop-rectangle presets.
//!
//! The output of [`extract_region`] is always PNG so that the same input
//! and rectangle produce bit-identical bytes regardless of the source
//! encoding.

use std::io::Cursor;

use crate::error::EditError;
use crate::types::{ContentType, ImageResource, Rect};
use crate::validation::validate_region;

/// Extract `rect` from `source` as a new PNG resource.
///
/// Fails with `InvalidRegion` when the rectangle is empty or not fully
/// inside the source, and with `MalformedPayload` if the source pixels
/// cannot be decoded.
pub fn extract_region(source: &ImageResource, rect: &Rect) -> Result<ImageResource, EditError> {
    validate_region(source, rect)?;

    // validate_region guarantees 0 <= x, y and x + w <= width (a u32).
    let (x, y, w, h) = (
        rect.x as u32,
        rect.y as u32,
        rect.width as u32,
        rect.height as u32,
    );

    let decoded =
        image::load_from_memory_with_format(source.bytes(), source.content_type().image_format())
            .map_err(|e| EditError::MalformedPayload(format!("cannot decode source: {e}")))?;

    let cropped = decoded.crop_imm(x, y, w, h);

    let mut out = Cursor::new(Vec::new());
    cropped
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| EditError::MalformedPayload(format!("cannot encode crop: {e}")))?;

    tracing::debug!(
        region = %rect,
        source_width = source.width(),
        source_height = source.height(),
        "Extracted region",
    );

    Ok(ImageResource::from_parts(
        out.into_inner(),
        ContentType::Png,
        w,
        h,
    ))
}

/// Crop aspect presets offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    /// No constraint: the whole image.
    Free,
    /// 1:1.
    Square,
    /// `width:height`, e.g. `Ratio(16, 9)`.
    Ratio(u32, u32),
}

impl AspectRatio {
    /// Largest rectangle with this aspect that fits a `width`x`height` image,
    /// centered. `None` for a degenerate ratio or an image too small to hold
    /// a single pixel of it.
    pub fn largest_centered(self, width: u32, height: u32) -> Option<Rect> {
        let (rw, rh) = match self {
            Self::Free => (width, height),
            Self::Square => (1, 1),
            Self::Ratio(rw, rh) => (rw, rh),
        };
        if rw == 0 || rh == 0 || width == 0 || height == 0 {
            return None;
        }

        let (width, height, rw, rh) = (
            u64::from(width),
            u64::from(height),
            u64::from(rw),
            u64::from(rh),
        );

        let (w, h) = if width * rh >= height * rw {
            (height * rw / rh, height)
        } else {
            (width, width * rh / rw)
        };
        if w == 0 || h == 0 {
            return None;
        }

        Some(Rect::new(
            ((width - w) / 2) as i64,
            ((height - h) / 2) as i64,
            w as i64,
            h as i64,
        ))
    }
}
