//! Mood background: a radial gradient covering the whole canvas.

use super::Stage;
use super::svg::{render_scene, scene};
use crate::canvas::{CANVAS_CENTER, Canvas};
use crate::color::{self, HexColor};
use crate::error::StickerResult;
use crate::request::Mood;

/// Outer radius of the gradient; pixels beyond it take the outer color.
pub const GRADIENT_RADIUS: f32 = 300.0;

/// How much darker the outer stop is than the base color.
pub const SECONDARY_SHIFT: i32 = -20;

/// Paints the mood's base color at the center fading to a darker rim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundStage {
    /// Color at the center (stop 0).
    pub base: HexColor,
    /// Color at radius 300 and beyond (stop 1).
    pub secondary: HexColor,
}

impl BackgroundStage {
    pub fn new(base: HexColor) -> Self {
        Self {
            base,
            secondary: base.adjusted(SECONDARY_SHIFT),
        }
    }

    /// Looks the mood up in the palette; `None` uses the fallback color.
    pub fn for_mood(mood: Option<Mood>) -> Self {
        Self::new(color::mood_base_color(mood))
    }

    fn to_svg(self) -> String {
        let defs = format!(
            r#"<radialGradient id="bg" gradientUnits="userSpaceOnUse" cx="{c}" cy="{c}" fx="{c}" fy="{c}" r="{r}" spreadMethod="pad"><stop offset="0" stop-color="{base}"/><stop offset="1" stop-color="{secondary}"/></radialGradient>"#,
            c = CANVAS_CENTER,
            r = GRADIENT_RADIUS,
            base = self.base,
            secondary = self.secondary,
        );
        scene(&defs, r#"<rect width="512" height="512" fill="url(#bg)"/>"#)
    }
}

impl Stage for BackgroundStage {
    fn name(&self) -> &'static str {
        "background"
    }

    fn render(&self, mut canvas: Canvas) -> StickerResult<Canvas> {
        render_scene(&mut canvas, &self.to_svg())?;
        Ok(canvas)
    }
}
