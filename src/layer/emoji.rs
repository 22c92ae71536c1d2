//! Emoji layer: the chosen glyph, centered, over a soft drop shadow.

use resvg::tiny_skia::Transform;

use super::Stage;
use super::svg::{
    SvgSource, escape_xml, parse_svg, render_scene, render_tree, replace_svg_colors, scene,
};
use crate::canvas::{CANVAS_CENTER, Canvas};
use crate::error::StickerResult;

/// Em height of the glyph, in pixels.
pub const EMOJI_SIZE: f32 = 200.0;

/// Shadow offset on both axes, in pixels.
pub const SHADOW_OFFSET: f32 = 2.0;

/// Opacity of the black shadow copy.
pub const SHADOW_OPACITY: f32 = 0.2;

/// Draws one glyph centered on the canvas.
///
/// Glyphs known to twemoji are drawn from its vector artwork; anything else
/// is shaped with the system fonts. Either way the shadow goes down first so
/// it never covers the glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiStage {
    pub glyph: String,
}

impl EmojiStage {
    pub fn new(glyph: impl Into<String>) -> Self {
        Self {
            glyph: glyph.into(),
        }
    }

    /// Whether the glyph has vector artwork. Without it the glyph is shaped
    /// from the system fonts, which may have no face that covers it.
    pub fn has_artwork(&self) -> bool {
        SvgSource::from_emoji(&self.glyph).is_some()
    }

    /// Draws SVG artwork scaled so its larger side spans [`EMOJI_SIZE`].
    fn draw_artwork(&self, canvas: &mut Canvas, svg_data: &str) -> StickerResult<()> {
        let shadow = parse_svg(&replace_svg_colors(svg_data, "#000000"))?;
        let tree = parse_svg(svg_data)?;

        let size = tree.size();
        let scale = EMOJI_SIZE / size.width().max(size.height());
        let left = CANVAS_CENTER - size.width() * scale / 2.0;
        let top = CANVAS_CENTER - size.height() * scale / 2.0;

        let place =
            |dx: f32, dy: f32| Transform::from_row(scale, 0.0, 0.0, scale, left + dx, top + dy);

        render_tree(canvas, &shadow, place(SHADOW_OFFSET, SHADOW_OFFSET), SHADOW_OPACITY)?;
        render_tree(canvas, &tree, place(0.0, 0.0), 1.0)
    }

    /// Draws the glyph as font text anchored at its visual center.
    ///
    /// The shadow copy is flattened to black through a color matrix, which
    /// also works for bitmap color-emoji fonts that ignore `fill`.
    fn draw_text_glyph(&self, canvas: &mut Canvas) -> StickerResult<()> {
        let defs = format!(
            r#"<filter id="shade" x="0" y="0" width="512" height="512" filterUnits="userSpaceOnUse"><feColorMatrix type="matrix" values="0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 {SHADOW_OPACITY} 0"/></filter>"#,
        );
        let glyph = escape_xml(&self.glyph);
        let body = format!(
            r#"<g font-family="sans-serif" font-size="{EMOJI_SIZE}" text-anchor="middle" dominant-baseline="central"><text x="{sx}" y="{sy}" filter="url(#shade)">{glyph}</text><text x="{c}" y="{c}">{glyph}</text></g>"#,
            sx = CANVAS_CENTER + SHADOW_OFFSET,
            sy = CANVAS_CENTER + SHADOW_OFFSET,
            c = CANVAS_CENTER,
        );
        render_scene(canvas, &scene(&defs, &body))
    }
}

impl Stage for EmojiStage {
    fn name(&self) -> &'static str {
        "emoji"
    }

    fn render(&self, mut canvas: Canvas) -> StickerResult<Canvas> {
        let artwork = SvgSource::from_emoji(&self.glyph);
        match artwork.as_ref().and_then(SvgSource::resolve) {
            Some(svg_data) => self.draw_artwork(&mut canvas, svg_data)?,
            None => {
                tracing::warn!(glyph = %self.glyph, "no vector artwork; drawing glyph from fonts");
                self.draw_text_glyph(&mut canvas)?;
            }
        }
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::BackgroundStage;
    use crate::request::Mood;

    const RED_TILE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 36 36"><rect width="36" height="36" fill="#ff0000"/></svg>"##;

    fn backdrop() -> Canvas {
        BackgroundStage::for_mood(Some(Mood::Cool))
            .render(Canvas::new().unwrap())
            .unwrap()
    }

    #[test]
    fn artwork_is_centered_at_emoji_size() {
        let mut canvas = backdrop();
        EmojiStage::new("x").draw_artwork(&mut canvas, RED_TILE).unwrap();

        // 200px tile spans 156..356 on both axes
        assert_eq!(canvas.pixel(256, 256).unwrap().0, [255, 0, 0, 255]);
        assert_eq!(canvas.pixel(157, 157).unwrap().0, [255, 0, 0, 255]);
        assert_eq!(canvas.pixel(354, 354).unwrap().0, [255, 0, 0, 255]);
        assert_ne!(canvas.pixel(150, 256).unwrap().0, [255, 0, 0, 255]);
    }

    #[test]
    fn shadow_sits_below_and_right_of_the_glyph() {
        let clean = backdrop();
        let mut canvas = clean.clone();
        EmojiStage::new("x").draw_artwork(&mut canvas, RED_TILE).unwrap();

        // Only the shadow reaches the two pixels past the tile's bottom-right edge.
        let shaded = canvas.pixel(357, 357).unwrap();
        let plain = clean.pixel(357, 357).unwrap();
        for channel in 0..3 {
            let expected = (plain[channel] as f32 * (1.0 - SHADOW_OPACITY)).round();
            assert!(
                (shaded[channel] as f32 - expected).abs() <= 2.0,
                "channel {channel}: {} vs {expected}",
                shaded[channel]
            );
        }

        // Nothing up and to the left of the tile.
        assert_eq!(canvas.pixel(154, 154), clean.pixel(154, 154));
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn twemoji_glyph_changes_the_center() {
        let clean = backdrop();
        let canvas = EmojiStage::new("🎉").render(clean.clone()).unwrap();
        let region = crate::canvas::RectPx::centered(256, 256, 120);
        assert_ne!(canvas.average_color(region), clean.average_color(region));
        // Corners stay untouched.
        assert_eq!(canvas.pixel(5, 5), clean.pixel(5, 5));
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn keyboard_selector_forms_draw_the_same_artwork() {
        let clean = BackgroundStage::for_mood(Some(Mood::Love))
            .render(Canvas::new().unwrap())
            .unwrap();
        let region = crate::canvas::RectPx::centered(256, 256, 60);

        for keyed in ["❤️", "☺️", "✌️"] {
            let stage = EmojiStage::new(keyed);
            assert!(stage.has_artwork(), "{keyed:?} should use twemoji");

            let drawn = stage.render(clean.clone()).unwrap();
            assert_ne!(drawn.average_color(region), clean.average_color(region), "{keyed:?}");
        }

        let heart = EmojiStage::new("❤️").render(clean.clone()).unwrap();
        let bare = EmojiStage::new("❤").render(clean).unwrap();
        assert_eq!(heart, bare);
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn common_glyphs_have_artwork() {
        for glyph in ["😊", "🎉", "🔥", "💖", "😢", "😡", "😴", "😎"] {
            assert!(EmojiStage::new(glyph).has_artwork(), "{glyph:?}");
        }
        assert!(!EmojiStage::new("<&>").has_artwork());
    }

    #[test]
    fn font_fallback_draws_in_the_center() {
        if crate::layer::svg::font_database().is_empty() {
            return;
        }
        let clean = backdrop();
        let stage = EmojiStage::new("W");
        assert!(!stage.has_artwork());

        let canvas = stage.render(clean.clone()).unwrap();
        let region = crate::canvas::RectPx::centered(256, 256, 120);
        assert_ne!(canvas.average_color(region), clean.average_color(region));
        assert_eq!(canvas.pixel(5, 5), clean.pixel(5, 5));
    }

    #[test]
    fn unknown_glyph_still_renders() {
        let clean = backdrop();
        let canvas = EmojiStage::new("<&>").render(clean.clone()).unwrap();
        assert_eq!(canvas.pixel(5, 5), clean.pixel(5, 5));
    }
}
