//! SVG rendering utilities using resvg/usvg.
//!
//! Every stage describes what it draws as an SVG scene in canvas user space
//! and rasterizes it through the helpers here, so gradients, blur and
//! strokes all come from one backend.

use std::sync::{Arc, OnceLock};

use resvg::tiny_skia::{Pixmap, PixmapPaint, Transform};
use resvg::usvg::fontdb::{Database, Family, Query};
use resvg::usvg::{Options, Tree};

use crate::canvas::{CANVAS_SIZE, Canvas};
use crate::error::{StickerError, StickerResult};

// ============================================================================
// SvgSource
// ============================================================================

/// Where the artwork for an emoji glyph comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvgSource {
    /// Raw SVG markup string.
    Raw(String),

    /// An emoji resolved via twemoji_assets at render time.
    ///
    /// Only resolvable when the `twemoji` feature is enabled.
    Emoji(String),
}

impl SvgSource {
    /// Creates a source from raw SVG markup.
    pub fn from_svg(svg: impl Into<String>) -> Self {
        Self::Raw(svg.into())
    }

    /// Creates a source from an emoji character.
    ///
    /// Returns `None` if twemoji has no artwork for it, or if the `twemoji`
    /// feature is disabled.
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        #[cfg(feature = "twemoji")]
        {
            twemoji_asset(emoji)?;
            Some(Self::Emoji(emoji.to_string()))
        }
        #[cfg(not(feature = "twemoji"))]
        {
            let _ = emoji;
            None
        }
    }

    /// Resolves this source to SVG markup.
    pub fn resolve(&self) -> Option<&str> {
        match self {
            Self::Raw(svg) => Some(svg.as_str()),
            #[cfg(feature = "twemoji")]
            Self::Emoji(emoji) => {
                let asset = twemoji_asset(emoji)?;
                Some(asset.as_ref())
            }
            #[cfg(not(feature = "twemoji"))]
            Self::Emoji(_) => None,
        }
    }

    pub fn is_emoji(&self) -> bool {
        matches!(self, Self::Emoji(_))
    }
}

/// Variation selector asking for emoji presentation. Keyboards append it to
/// glyphs such as U+2764, but twemoji keys those assets without it.
#[cfg(feature = "twemoji")]
const EMOJI_PRESENTATION: char = '\u{FE0F}';

/// Looks up twemoji artwork, retrying without presentation selectors.
#[cfg(feature = "twemoji")]
fn twemoji_asset(emoji: &str) -> Option<&'static twemoji_assets::svg::SvgTwemojiAsset> {
    use twemoji_assets::svg::SvgTwemojiAsset;

    SvgTwemojiAsset::from_emoji(emoji).or_else(|| {
        if !emoji.contains(EMOJI_PRESENTATION) {
            return None;
        }
        SvgTwemojiAsset::from_emoji(&emoji.replace(EMOJI_PRESENTATION, ""))
    })
}

// ============================================================================
// Fonts
// ============================================================================

/// Shared, read-only font database loaded from the system on first use.
pub fn font_database() -> Arc<Database> {
    static FONTS: OnceLock<Arc<Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = Database::new();
            db.load_system_fonts();
            pin_sans_serif(&mut db);
            tracing::debug!(faces = db.len(), "loaded font database");
            Arc::new(db)
        })
        .clone()
}

/// Points the generic `sans-serif` family at an installed face when the
/// default mapping resolves to nothing.
fn pin_sans_serif(db: &mut Database) {
    let query = Query {
        families: &[Family::SansSerif],
        ..Query::default()
    };
    if db.query(&query).is_some() {
        return;
    }

    let families: Vec<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect();
    let pick = families
        .iter()
        .find(|name| name.contains("Sans"))
        .or_else(|| families.first());

    match pick {
        Some(name) => {
            tracing::debug!(family = %name, "using as sans-serif");
            db.set_sans_serif_family(name.clone());
        }
        None => tracing::warn!("no system fonts found; text will not be drawn"),
    }
}

// ============================================================================
// SVG Rendering
// ============================================================================

/// Parses SVG markup with the shared font database.
pub fn parse_svg(svg_data: &str) -> StickerResult<Tree> {
    let mut opts = Options::default();
    opts.fontdb = font_database();
    Tree::from_str(svg_data, &opts).map_err(|err| StickerError::svg(err.to_string()))
}

/// Wraps scene elements in a canvas-sized SVG document.
pub fn scene(defs: &str, body: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{s}" height="{s}" viewBox="0 0 {s} {s}"><defs>{defs}</defs>{body}</svg>"#,
        s = CANVAS_SIZE,
    )
}

/// Rasterizes a canvas-space scene onto the canvas at full opacity.
pub fn render_scene(canvas: &mut Canvas, svg_data: &str) -> StickerResult<()> {
    let tree = parse_svg(svg_data)?;
    render_tree(canvas, &tree, Transform::identity(), 1.0)
}

/// Draws a parsed tree onto the canvas with the given transform and opacity.
///
/// Partial opacity renders into a scratch layer first so overlapping shapes
/// inside the tree do not darken each other.
pub fn render_tree(
    canvas: &mut Canvas,
    tree: &Tree,
    transform: Transform,
    opacity: f32,
) -> StickerResult<()> {
    let target = canvas.pixmap_mut();
    if opacity >= 1.0 {
        resvg::render(tree, transform, &mut target.as_mut());
        return Ok(());
    }

    let mut layer =
        Pixmap::new(target.width(), target.height()).ok_or(StickerError::Allocation {
            width: target.width(),
            height: target.height(),
        })?;
    resvg::render(tree, transform, &mut layer.as_mut());

    let paint = PixmapPaint {
        opacity,
        ..PixmapPaint::default()
    };
    target.draw_pixmap(0, 0, layer.as_ref(), &paint, Transform::identity(), None);
    Ok(())
}

/// Replaces common color attributes in SVG with the specified color.
///
/// This is a simple text-based replacement that handles `fill="..."` and
/// `stroke="..."` attributes, which is how twemoji artwork is colored.
pub fn replace_svg_colors(svg_data: &str, hex_color: &str) -> String {
    let result = replace_color_attr(svg_data, "fill", hex_color);
    replace_color_attr(&result, "stroke", hex_color)
}

/// Replaces a color attribute value, preserving "none" values.
fn replace_color_attr(svg: &str, attr: &str, new_color: &str) -> String {
    let mut result = String::with_capacity(svg.len());
    let pattern = format!("{}=\"", attr);
    let mut remaining = svg;

    while let Some(start) = remaining.find(&pattern) {
        result.push_str(&remaining[..start + pattern.len()]);
        remaining = &remaining[start + pattern.len()..];

        if let Some(end) = remaining.find('"') {
            let value = &remaining[..end];
            if value == "none" || value == "transparent" {
                result.push_str(value);
            } else {
                result.push_str(new_color);
            }
            remaining = &remaining[end..];
        }
    }

    result.push_str(remaining);
    result
}

/// Escapes text for use inside SVG character data or attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const RED_SQUARE: &str = r##"<rect x="100" y="100" width="50" height="50" fill="#ff0000"/>"##;

    #[test]
    fn render_scene_draws_in_canvas_space() {
        let mut canvas = Canvas::new().unwrap();
        render_scene(&mut canvas, &scene("", RED_SQUARE)).unwrap();

        assert_eq!(canvas.pixel(125, 125).unwrap().0, [255, 0, 0, 255]);
        assert_eq!(canvas.pixel(10, 10).unwrap().0, [0, 0, 0, 0]);
    }

    #[test]
    fn partial_opacity_blends() {
        let mut canvas = Canvas::new().unwrap();
        let tree = parse_svg(&scene("", RED_SQUARE)).unwrap();
        render_tree(&mut canvas, &tree, Transform::identity(), 0.5).unwrap();

        let pixel = canvas.pixel(125, 125).unwrap();
        assert!((120..=136).contains(&pixel[3]), "alpha {}", pixel[3]);
        assert!(pixel[0] > 250);
    }

    #[test]
    fn invalid_markup_is_an_error() {
        let err = parse_svg("<svg").unwrap_err();
        assert!(matches!(err, StickerError::Svg(_)));
    }

    #[test]
    fn replace_color_preserves_none() {
        let svg = r##"<circle fill="none" stroke="#000000"/><path fill="#FFCC4D"/>"##;
        let result = replace_svg_colors(svg, "#000000");
        assert!(result.contains(r#"fill="none""#));
        assert!(result.contains(r##"fill="#000000""##));
        assert!(!result.contains("FFCC4D"));
    }

    #[test]
    fn escape_xml_handles_markup_characters() {
        assert_eq!(escape_xml(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
        assert_eq!(escape_xml("héllo 🎉"), "héllo 🎉");
    }

    #[test]
    fn raw_source_resolves_to_itself() {
        let source = SvgSource::from_svg("<svg></svg>");
        assert!(!source.is_emoji());
        assert_eq!(source.resolve(), Some("<svg></svg>"));
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn emoji_source_resolves_to_twemoji() {
        let source = SvgSource::from_emoji("🎉").expect("party popper should be in twemoji");
        assert!(source.is_emoji());
        assert!(source.resolve().unwrap().contains("<svg"));
        assert!(SvgSource::from_emoji("not-an-emoji").is_none());
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn presentation_selector_falls_back_to_bare_codepoint() {
        for (keyed, bare) in [("\u{2764}\u{FE0F}", "\u{2764}"), ("\u{270C}\u{FE0F}", "\u{270C}")] {
            let source = SvgSource::from_emoji(keyed).expect("selector form should resolve");
            let expected = SvgSource::from_emoji(bare).unwrap();
            assert_eq!(source.resolve(), expected.resolve());
        }
        assert!(SvgSource::from_emoji("\u{FE0F}").is_none());
    }
}
