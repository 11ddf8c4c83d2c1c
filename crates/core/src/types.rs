//! Value types shared by every layer of the editing engine.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

/// Image encodings accepted by the external generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContentType {
    Png,
    Jpeg,
    Webp,
}

impl ContentType {
    /// MIME string, e.g. `image/png`.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    /// Parse a MIME string. Parameters (`; charset=...`) and case are ignored;
    /// `image/jpg` is accepted as an alias.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Conventional file extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }

    pub(crate) fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::WebP => Some(Self::Webp),
            _ => None,
        }
    }

    pub(crate) fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Webp => image::ImageFormat::WebP,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

// ---------------------------------------------------------------------------
// Image resource
// ---------------------------------------------------------------------------

/// An immutable, validated image payload.
///
/// Cloning is cheap and shares the payload. Equality is identity: two
/// resources are equal only when they are clones of the same instance.
/// Compare [`bytes`](Self::bytes) for content equality.
#[derive(Clone)]
pub struct ImageResource {
    inner: Arc<ImageData>,
}

struct ImageData {
    bytes: Vec<u8>,
    content_type: ContentType,
    width: u32,
    height: u32,
}

impl ImageResource {
    /// Only the codec and the crop routine construct resources, after the
    /// bytes have been validated and the dimensions probed.
    pub(crate) fn from_parts(
        bytes: Vec<u8>,
        content_type: ContentType,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            inner: Arc::new(ImageData {
                bytes,
                content_type,
                width,
                height,
            }),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.inner.bytes
    }

    pub fn content_type(&self) -> ContentType {
        self.inner.content_type
    }

    pub fn width(&self) -> u32 {
        self.inner.width
    }

    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// `true` if both handles point at the same payload.
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for ImageResource {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for ImageResource {}

impl fmt::Debug for ImageResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageResource")
            .field("content_type", &self.inner.content_type)
            .field("width", &self.inner.width)
            .field("height", &self.inner.height)
            .field("len", &self.inner.bytes.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Point of a localized edit, in source-image pixel coordinates, plus the
/// edit instruction. Signed so that off-canvas clicks are representable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotspot {
    pub x: i64,
    pub y: i64,
    pub instruction: String,
}

impl Hotspot {
    pub fn new(x: i64, y: i64, instruction: impl Into<String>) -> Self {
        Self {
            x,
            y,
            instruction: instruction.into(),
        }
    }
}

/// Axis-aligned rectangle in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.x, self.y
        )
    }
}

/// One user-issued transformation. Each variant carries only what its
/// operation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformRequest {
    /// Localized generative edit at a point.
    Retouch { hotspot: Hotspot },
    /// Global generative stylistic filter.
    Filter { style: String },
    /// Global generative adjustment (lighting, color, focus...).
    Adjustment { adjustment: String },
    /// Deterministic local crop.
    Crop { rect: Rect },
}

impl TransformRequest {
    /// Short name used in log fields and events.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Retouch { .. } => "retouch",
            Self::Filter { .. } => "filter",
            Self::Adjustment { .. } => "adjustment",
            Self::Crop { .. } => "crop",
        }
    }

    /// Whether serving this request requires the external generator.
    pub fn uses_generator(&self) -> bool {
        !matches!(self, Self::Crop { .. })
    }
}
