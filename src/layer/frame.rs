//! Frame layer: a translucent white border just inside the canvas edge.

use super::Stage;
use super::svg::{render_scene, scene};
use crate::canvas::{CANVAS_SIZE, Canvas};
use crate::color::HexColor;
use crate::error::StickerResult;

/// Border stroke settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStage {
    pub color: HexColor,
    pub opacity: f32,
    /// Stroke width, in pixels.
    pub width: f32,
    /// Distance from the canvas edge to the stroke's center line.
    pub inset: f32,
}

impl Default for FrameStage {
    fn default() -> Self {
        Self {
            color: HexColor::WHITE,
            opacity: 0.3,
            width: 4.0,
            inset: 2.0,
        }
    }
}

impl FrameStage {
    fn to_svg(self) -> String {
        let side = CANVAS_SIZE as f32 - 2.0 * self.inset;
        let body = format!(
            r#"<rect x="{i}" y="{i}" width="{side}" height="{side}" fill="none" stroke="{color}" stroke-opacity="{opacity}" stroke-width="{width}"/>"#,
            i = self.inset,
            color = self.color,
            opacity = self.opacity,
            width = self.width,
        );
        scene("", &body)
    }
}

impl Stage for FrameStage {
    fn name(&self) -> &'static str {
        "frame"
    }

    fn render(&self, mut canvas: Canvas) -> StickerResult<Canvas> {
        render_scene(&mut canvas, &self.to_svg())?;
        Ok(canvas)
    }
}
