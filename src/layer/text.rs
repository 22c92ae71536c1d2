//! Caption layer: optional text near the bottom in one of six styles.

use resvg::usvg::{Group, Node};

use super::Stage;
use super::svg::{escape_xml, parse_svg, render_scene, scene};
use crate::canvas::{CANVAS_CENTER, Canvas};
use crate::color::{HexColor, rainbow_color};
use crate::error::StickerResult;
use crate::request::TextEffect;

/// Caption font size, in pixels.
pub const FONT_SIZE: f32 = 48.0;

/// Horizontal anchor of the caption (its visual center).
pub const TEXT_ANCHOR_X: f32 = CANVAS_CENTER;

/// Vertical anchor of the caption (its visual center).
pub const TEXT_ANCHOR_Y: f32 = 400.0;

/// Average advance of a bold sans glyph, as a fraction of the font size.
const ESTIMATED_ADVANCE_EM: f32 = 0.6;

// ============================================================================
// TextStyle
// ============================================================================

/// A caption style with the colors it needs already derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextStyle {
    /// One fill in the caption color.
    Plain { color: HexColor },

    /// A translucent black copy offset down-right, then the caption on top.
    Shadow {
        color: HexColor,
        offset: f32,
        opacity: f32,
    },

    /// The caption over a blurred halo of its own color.
    Glow { color: HexColor, blur: f32 },

    /// Stroked outline only, no interior fill.
    Outline { stroke: HexColor, width: f32 },

    /// Vertical gradient over the caption's own height.
    Gradient { top: HexColor, bottom: HexColor },

    /// Each character takes the next color of the rainbow cycle.
    Rainbow,
}

impl TextStyle {
    /// Derives the concrete style for an effect and caption color.
    pub fn resolve(effect: TextEffect, color: HexColor) -> Self {
        match effect {
            TextEffect::None => Self::Plain { color },
            TextEffect::Shadow => Self::Shadow {
                color,
                offset: 3.0,
                opacity: 0.5,
            },
            TextEffect::Glow => Self::Glow { color, blur: 10.0 },
            TextEffect::Outline => Self::Outline {
                stroke: color.adjusted(-40),
                width: 4.0,
            },
            TextEffect::Gradient => Self::Gradient {
                top: color,
                bottom: color.adjusted(-30),
            },
            TextEffect::Rainbow => Self::Rainbow,
        }
    }
}

// ============================================================================
// Measurement
// ============================================================================

/// Measures the advance width of a run of caption text.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

/// Measures with the shared font database, estimating when no installed
/// font can shape the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontMeasure;

impl TextMeasure for FontMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        match measure_with_fonts(text, font_size) {
            Some(width) if width > 0.0 => width,
            _ => {
                tracing::debug!(%text, "font measurement unavailable; estimating width");
                estimate_width(text, font_size)
            }
        }
    }
}

fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * ESTIMATED_ADVANCE_EM
}

fn measure_with_fonts(text: &str, font_size: f32) -> Option<f32> {
    let body = format!(
        r#"<text x="0" y="{font_size}" font-family="sans-serif" font-weight="bold" font-size="{font_size}">{}</text>"#,
        escape_xml(text),
    );
    let tree = parse_svg(&scene("", &body)).ok()?;
    find_text_width(tree.root())
}

fn find_text_width(group: &Group) -> Option<f32> {
    group.children().iter().find_map(|node| match node {
        Node::Text(text) => Some(text.bounding_box().width()),
        Node::Group(group) => find_text_width(group),
        _ => None,
    })
}

/// Where one rainbow character is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub ch: char,
    /// Center of the character's cell.
    pub x: f32,
    pub color: HexColor,
}

/// Lays characters out in equal cells across the measured width of the
/// whole string, centered as a block on the caption anchor.
///
/// Equal cells only approximate proportional advances, which is the
/// intended look.
pub fn rainbow_layout(text: &str, measure: &dyn TextMeasure) -> Vec<GlyphPlacement> {
    let count = text.chars().count();
    if count == 0 {
        return Vec::new();
    }

    let total = measure.text_width(text, FONT_SIZE);
    let cell = total / count as f32;
    let start = TEXT_ANCHOR_X - total / 2.0;

    text.chars()
        .enumerate()
        .map(|(i, ch)| GlyphPlacement {
            ch,
            x: start + cell * (i as f32 + 0.5),
            color: rainbow_color(i),
        })
        .collect()
}

// ============================================================================
// TextStage
// ============================================================================

/// Draws the caption centered on (256, 400).
#[derive(Debug, Clone, PartialEq)]
pub struct TextStage {
    pub text: String,
    pub style: TextStyle,
}

impl TextStage {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Builds the caption scene, measuring rainbow cells with `measure`.
    pub fn to_svg(&self, measure: &dyn TextMeasure) -> String {
        let text = self.text.trim();
        let caption = escape_xml(text);
        let (x, y) = (TEXT_ANCHOR_X, TEXT_ANCHOR_Y);

        let (defs, body) = match self.style {
            TextStyle::Plain { color } => (
                String::new(),
                text_element(x, y, &format!(r#"fill="{color}""#), &caption),
            ),
            TextStyle::Shadow {
                color,
                offset,
                opacity,
            } => {
                let shadow = text_element(
                    x + offset,
                    y + offset,
                    &format!(r##"fill="#000000" fill-opacity="{opacity}""##),
                    &caption,
                );
                let main = text_element(x, y, &format!(r#"fill="{color}""#), &caption);
                (String::new(), shadow + &main)
            }
            TextStyle::Glow { color, blur } => {
                // Canvas-style blur radius maps to a Gaussian sigma of half.
                let defs = format!(
                    r#"<filter id="glow" x="0" y="0" width="512" height="512" filterUnits="userSpaceOnUse"><feGaussianBlur in="SourceGraphic" stdDeviation="{sigma}" result="halo"/><feMerge><feMergeNode in="halo"/><feMergeNode in="SourceGraphic"/></feMerge></filter>"#,
                    sigma = blur / 2.0,
                );
                let attrs = format!(r#"fill="{color}" filter="url(#glow)""#);
                (defs, text_element(x, y, &attrs, &caption))
            }
            TextStyle::Outline { stroke, width } => (
                String::new(),
                text_element(
                    x,
                    y,
                    &format!(r#"fill="none" stroke="{stroke}" stroke-width="{width}""#),
                    &caption,
                ),
            ),
            TextStyle::Gradient { top, bottom } => {
                let defs = format!(
                    r#"<linearGradient id="caption" x1="0" y1="0" x2="0" y2="1"><stop offset="0" stop-color="{top}"/><stop offset="1" stop-color="{bottom}"/></linearGradient>"#,
                );
                (defs, text_element(x, y, r#"fill="url(#caption)""#, &caption))
            }
            TextStyle::Rainbow => {
                let body = rainbow_layout(text, measure)
                    .into_iter()
                    .map(|glyph| {
                        text_element(
                            glyph.x,
                            y,
                            &format!(r#"fill="{}""#, glyph.color),
                            &escape_xml(glyph.ch.encode_utf8(&mut [0; 4])),
                        )
                    })
                    .collect::<String>();
                (String::new(), body)
            }
        };

        let body = format!(
            r#"<g font-family="sans-serif" font-weight="bold" font-size="{FONT_SIZE}" text-anchor="middle" dominant-baseline="central">{body}</g>"#,
        );
        scene(&defs, &body)
    }
}

fn text_element(x: f32, y: f32, attrs: &str, content: &str) -> String {
    format!(r#"<text x="{x}" y="{y}" {attrs}>{content}</text>"#)
}

impl Stage for TextStage {
    fn name(&self) -> &'static str {
        "text"
    }

    fn render(&self, mut canvas: Canvas) -> StickerResult<Canvas> {
        if self.is_empty() {
            return Ok(canvas);
        }
        render_scene(&mut canvas, &self.to_svg(&FontMeasure))?;
        Ok(canvas)
    }
}
