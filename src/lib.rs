//! mood-sticker: square mood sticker composition
//!
//! This crate turns a mood, an emoji, an optional caption and a text effect
//! into a finished 512×512 PNG. Rendering is pure and deterministic: the
//! same request always produces the same bytes, and nothing is shared
//! between calls except read-only palettes and the system font database.
//!
//! # Example
//!
//! ```
//! use mood_sticker::{compose_sticker, sticker_id, Mood, StickerRequest, TextEffect};
//!
//! let request = StickerRequest::new(Mood::Happy)
//!     .with_emoji("🎉")
//!     .with_text("Party!")
//!     .with_effect(TextEffect::Glow);
//!
//! let png = compose_sticker(&request).unwrap();
//! let id = sticker_id(&png);
//! assert_eq!(id.len(), 16);
//! ```
//!
//! # Stages
//!
//! [`compose_sticker`] runs a [`StickerPipeline`]: background gradient,
//! emoji with shadow, styled caption, border. Each stage can also be run on
//! its own through the [`Stage`] trait.

mod canvas;
mod color;
mod error;
mod layer;
mod request;

pub use canvas::{CANVAS_CENTER, CANVAS_SIZE, Canvas, RectPx, sticker_id};
pub use color::{
    FALLBACK_BASE, HexColor, MOOD_PALETTE, RAINBOW_PALETTE, adjust_brightness, mood_base_color,
};
pub use error::{StickerError, StickerResult};
pub use layer::text::{FONT_SIZE, TEXT_ANCHOR_X, TEXT_ANCHOR_Y, rainbow_layout};
pub use layer::{
    BackgroundStage, EmojiStage, FontMeasure, FrameStage, GlyphPlacement, Stage, StickerPipeline,
    SvgSource, TextMeasure, TextStage, TextStyle,
};
pub use request::{
    DEFAULT_EMOJI, MAX_TEXT_CHARS, Mood, StickerRequest, TextEffect, UnknownMood,
    parse_mood_lenient,
};

/// Composes a sticker and returns it as PNG bytes.
///
/// Fails before drawing anything if the request is invalid; otherwise all
/// stages run to completion or the call fails without output.
#[tracing::instrument(
    skip_all,
    fields(
        mood = request.mood.map(Mood::label).unwrap_or("fallback"),
        effect = %request.effect,
        text_len = request.text.chars().count(),
    )
)]
pub fn compose_sticker(request: &StickerRequest) -> StickerResult<Vec<u8>> {
    request.validate()?;
    let canvas = StickerPipeline::from_request(request).render()?;
    let png = canvas.encode_png()?;
    tracing::debug!(bytes = png.len(), "sticker composed");
    Ok(png)
}
