//! Error taxonomy for sticker composition.

/// Convenience result type used across the crate.
pub type StickerResult<T> = Result<T, StickerError>;

/// Errors reported to the caller of [`compose_sticker`](crate::compose_sticker).
///
/// An unrecognized mood is deliberately absent: it falls back to the default
/// palette entry and never surfaces here.
#[derive(thiserror::Error, Debug)]
pub enum StickerError {
    /// A color string is not a `#RGB` or `#RRGGBB` hex color.
    #[error("invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),

    /// Caption text exceeds the character limit.
    #[error("text is {len} characters long (max {max})")]
    TextTooLong { len: usize, max: usize },

    /// A stage produced a scene the SVG backend could not parse.
    #[error("svg error: {0}")]
    Svg(String),

    /// The raster surface could not be allocated.
    #[error("failed to allocate {width}x{height} canvas")]
    Allocation { width: u32, height: u32 },

    /// PNG serialization failed.
    #[error("png encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// A request document could not be (de)serialized.
    #[error("request error: {0}")]
    Request(#[from] serde_json::Error),
}

impl StickerError {
    /// Build a [`StickerError::InvalidColor`] value.
    pub fn invalid_color(value: impl Into<String>) -> Self {
        Self::InvalidColor(value.into())
    }

    /// Build a [`StickerError::Svg`] value.
    pub fn svg(msg: impl Into<String>) -> Self {
        Self::Svg(msg.into())
    }
}
