//! Stage infrastructure for sticker composition.
//!
//! A sticker is drawn by a fixed sequence of stages, each implementing
//! [`Stage`]. A stage receives the canvas by value, draws into it, and
//! returns it for the next stage, so only one stage ever holds it.
//!
//! ```text
//! Canvas::new()
//!     │
//!     ▼
//! ┌────────────┐
//! │ Background │ ◄── mood → radial gradient
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │   Emoji    │ ◄── glyph + soft shadow
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │    Text    │ ◄── caption in one of six styles (no-op when empty)
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │   Frame    │ ◄── translucent border
//! └────────────┘
//! ```

pub mod background;
pub mod emoji;
pub mod frame;
pub mod svg;
pub mod text;

pub use background::BackgroundStage;
pub use emoji::EmojiStage;
pub use frame::FrameStage;
pub use svg::SvgSource;
pub use text::{FontMeasure, GlyphPlacement, TextMeasure, TextStage, TextStyle};

use crate::canvas::Canvas;
use crate::error::StickerResult;
use crate::request::StickerRequest;

// ============================================================================
// Stage Trait
// ============================================================================

/// One step of the composition pipeline.
pub trait Stage {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Draws into `canvas` and hands it back.
    fn render(&self, canvas: Canvas) -> StickerResult<Canvas>;
}

// ============================================================================
// Sticker Pipeline
// ============================================================================

/// The four drawing stages for one request, in order.
#[derive(Debug, Clone)]
pub struct StickerPipeline {
    pub background: BackgroundStage,
    pub emoji: EmojiStage,
    pub text: TextStage,
    pub frame: FrameStage,
}

impl StickerPipeline {
    /// Resolves a request into concrete stage settings.
    pub fn from_request(request: &StickerRequest) -> Self {
        Self {
            background: BackgroundStage::for_mood(request.mood),
            emoji: EmojiStage::new(request.glyph()),
            text: TextStage::new(
                request.caption(),
                TextStyle::resolve(request.effect, request.text_color),
            ),
            frame: FrameStage::default(),
        }
    }

    /// The stages in drawing order.
    pub fn stages(&self) -> [&dyn Stage; 4] {
        [&self.background, &self.emoji, &self.text, &self.frame]
    }

    /// Draws every stage onto a fresh canvas.
    pub fn render(&self) -> StickerResult<Canvas> {
        self.stages()
            .into_iter()
            .try_fold(Canvas::new()?, |canvas, stage| {
                tracing::trace!(stage = stage.name(), "rendering stage");
                stage.render(canvas)
            })
    }
}
