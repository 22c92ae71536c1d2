//! Serializable sticker request.
//!
//! A [`StickerRequest`] carries the four user inputs (mood, emoji, caption
//! text and text effect) plus the caption color, in a JSON-friendly format
//! so the calling layer can forward what the client sent.
//!
//! # Example
//!
//! ```
//! use mood_sticker::{Mood, StickerRequest, TextEffect};
//!
//! let request = StickerRequest::new(Mood::Happy)
//!     .with_emoji("🎉")
//!     .with_text("Party!")
//!     .with_effect(TextEffect::Glow);
//!
//! let json = request.to_json().unwrap();
//! let restored = StickerRequest::from_json(&json).unwrap();
//! assert_eq!(restored, request);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::color::{self, HexColor};
use crate::error::{StickerError, StickerResult};

/// Longest caption accepted, in Unicode scalar values.
pub const MAX_TEXT_CHARS: usize = 20;

/// Glyph used when a request does not name one.
pub const DEFAULT_EMOJI: &str = "😊";

// ============================================================================
// Mood
// ============================================================================

/// Emotional category that drives the background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Excited,
    Calm,
    Love,
    Cool,
    Tired,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Angry,
        Mood::Excited,
        Mood::Calm,
        Mood::Love,
        Mood::Cool,
        Mood::Tired,
    ];

    /// The lowercase wire name of this mood.
    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::Excited => "excited",
            Mood::Calm => "calm",
            Mood::Love => "love",
            Mood::Cool => "cool",
            Mood::Tired => "tired",
        }
    }

    pub fn base_color(self) -> HexColor {
        color::mood_base_color(Some(self))
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string names none of the eight moods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMood(pub String);

impl fmt::Display for UnknownMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mood {:?}", self.0)
    }
}

impl std::error::Error for UnknownMood {}

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

/// Reads a mood leniently: anything outside the eight categories becomes
/// `None`, which renders with the fallback background.
fn deserialize_mood<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Mood>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_mood_lenient))
}

fn serialize_mood<S: Serializer>(mood: &Option<Mood>, serializer: S) -> Result<S::Ok, S::Error> {
    match mood {
        Some(mood) => serializer.serialize_str(mood.label()),
        None => serializer.serialize_none(),
    }
}

/// Parses a mood name, logging and discarding unknown values.
pub fn parse_mood_lenient(raw: &str) -> Option<Mood> {
    match raw.parse() {
        Ok(mood) => Some(mood),
        Err(err) => {
            tracing::debug!(%err, "falling back to default background");
            None
        }
    }
}

// ============================================================================
// TextEffect
// ============================================================================

/// Caption rendering style. Exactly one applies per sticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum TextEffect {
    #[default]
    None,
    Shadow,
    Glow,
    Outline,
    Gradient,
    Rainbow,
}

impl TextEffect {
    pub const ALL: [TextEffect; 6] = [
        TextEffect::None,
        TextEffect::Shadow,
        TextEffect::Glow,
        TextEffect::Outline,
        TextEffect::Gradient,
        TextEffect::Rainbow,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TextEffect::None => "none",
            TextEffect::Shadow => "shadow",
            TextEffect::Glow => "glow",
            TextEffect::Outline => "outline",
            TextEffect::Gradient => "gradient",
            TextEffect::Rainbow => "rainbow",
        }
    }
}

impl fmt::Display for TextEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// StickerRequest
// ============================================================================

/// Everything needed to compose one sticker.
///
/// # JSON Format
///
/// ```json
/// {
///   "mood": "happy",
///   "emoji": "🎉",
///   "text": "Party!",
///   "textColor": "#000000",
///   "effect": "glow"
/// }
/// ```
///
/// Every field is optional on input. An unrecognized `mood` deserializes to
/// `None`; a malformed `textColor` is a deserialization error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerRequest {
    /// Background mood. `None` when the caller sent a mood outside the eight
    /// categories.
    #[serde(
        default,
        deserialize_with = "deserialize_mood",
        serialize_with = "serialize_mood"
    )]
    pub mood: Option<Mood>,

    /// Emoji drawn in the middle of the sticker.
    ///
    /// Callers pass one glyph (a single grapheme, possibly with selectors or
    /// joiners). The string is drawn as given, so a word renders as a 200 px
    /// word. Blank input selects [`DEFAULT_EMOJI`].
    #[serde(default = "default_emoji")]
    pub emoji: String,

    /// Optional caption, at most [`MAX_TEXT_CHARS`] characters.
    #[serde(default)]
    pub text: String,

    /// Caption color.
    #[serde(default)]
    pub text_color: HexColor,

    /// Caption style.
    #[serde(default)]
    pub effect: TextEffect,
}

fn default_emoji() -> String {
    DEFAULT_EMOJI.to_string()
}

impl Default for StickerRequest {
    fn default() -> Self {
        Self {
            mood: None,
            emoji: default_emoji(),
            text: String::new(),
            text_color: HexColor::BLACK,
            effect: TextEffect::None,
        }
    }
}

impl StickerRequest {
    /// Creates a request for `mood` with the default emoji and no caption.
    pub fn new(mood: Mood) -> Self {
        Self {
            mood: Some(mood),
            ..Self::default()
        }
    }

    /// Sets the emoji; pass exactly one glyph.
    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_text_color(mut self, color: HexColor) -> Self {
        self.text_color = color;
        self
    }

    pub fn with_effect(mut self, effect: TextEffect) -> Self {
        self.effect = effect;
        self
    }

    /// Sets the mood from a free-form name; unknown names select the fallback.
    pub fn with_mood_name(mut self, name: &str) -> Self {
        self.mood = parse_mood_lenient(name);
        self
    }

    /// Sets the caption color from a hex string.
    pub fn with_text_color_hex(self, color: &str) -> StickerResult<Self> {
        Ok(self.with_text_color(color.parse()?))
    }

    /// Checks the limits the renderer relies on.
    pub fn validate(&self) -> StickerResult<()> {
        let len = self.text.chars().count();
        if len > MAX_TEXT_CHARS {
            return Err(StickerError::TextTooLong {
                len,
                max: MAX_TEXT_CHARS,
            });
        }
        Ok(())
    }

    /// The glyph to draw, substituting the default for a blank value.
    pub fn glyph(&self) -> &str {
        match self.emoji.trim() {
            "" => DEFAULT_EMOJI,
            glyph => glyph,
        }
    }

    /// The caption with surrounding whitespace removed.
    pub fn caption(&self) -> &str {
        self.text.trim()
    }

    /// Serializes the request to a JSON string.
    pub fn to_json(&self) -> StickerResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the request to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> StickerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes and validates a request from a JSON string.
    pub fn from_json(json: &str) -> StickerResult<Self> {
        let request: Self = serde_json::from_str(json)?;
        request.validate()?;
        Ok(request)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_format_uses_camel_case() {
        let request = StickerRequest::new(Mood::Love)
            .with_text("hi")
            .with_text_color(HexColor::rgb(0xFF, 0, 0))
            .with_effect(TextEffect::Outline);

        let json = request.to_json_pretty().unwrap();
        assert!(json.contains("\"textColor\": \"#FF0000\""));
        assert!(json.contains("\"mood\": \"love\""));
        assert!(json.contains("\"effect\": \"outline\""));
    }

    #[test]
    fn empty_document_uses_defaults() {
        let request = StickerRequest::from_json("{}").unwrap();
        assert_eq!(request, StickerRequest::default());
        assert_eq!(request.glyph(), DEFAULT_EMOJI);
        assert_eq!(request.text_color, HexColor::BLACK);
        assert_eq!(request.effect, TextEffect::None);
    }

    #[test]
    fn unknown_mood_is_not_an_error() {
        let request = StickerRequest::from_json(r#"{"mood":"grumpy"}"#).unwrap();
        assert_eq!(request.mood, None);

        let request = StickerRequest::from_json(r#"{"mood":"Calm"}"#).unwrap();
        assert_eq!(request.mood, Some(Mood::Calm));
    }

    #[test]
    fn malformed_text_color_is_rejected() {
        let err = StickerRequest::from_json(r##"{"textColor":"#zzzzzz"}"##).unwrap_err();
        assert!(matches!(err, StickerError::Request(_)));

        let err = StickerRequest::default()
            .with_text_color_hex("black")
            .unwrap_err();
        assert!(matches!(err, StickerError::InvalidColor(_)));
    }

    #[test]
    fn unknown_effect_is_rejected() {
        assert!(StickerRequest::from_json(r#"{"effect":"sparkle"}"#).is_err());
    }

    #[test]
    fn text_limit_counts_characters_not_bytes() {
        let twenty = "é".repeat(MAX_TEXT_CHARS);
        assert!(StickerRequest::default().with_text(twenty).validate().is_ok());

        let long = "a".repeat(MAX_TEXT_CHARS + 1);
        let err = StickerRequest::default().with_text(long).validate().unwrap_err();
        assert!(matches!(err, StickerError::TextTooLong { len: 21, max: 20 }));
    }

    #[test]
    fn from_json_enforces_text_limit() {
        let json = format!(r#"{{"text":"{}"}}"#, "x".repeat(25));
        assert!(matches!(
            StickerRequest::from_json(&json),
            Err(StickerError::TextTooLong { .. })
        ));
    }

    #[test]
    fn blank_emoji_uses_default_glyph() {
        let request = StickerRequest::default().with_emoji("   ");
        assert_eq!(request.glyph(), DEFAULT_EMOJI);
        let request = StickerRequest::default().with_emoji(" 🔥 ");
        assert_eq!(request.glyph(), "🔥");
    }

    #[test]
    fn emoji_is_passed_through_unchanged() {
        // Selector and joiner sequences stay intact for the artwork lookup.
        let request = StickerRequest::default().with_emoji("❤️");
        assert_eq!(request.glyph(), "\u{2764}\u{FE0F}");
        let request = StickerRequest::default().with_emoji("👩‍💻");
        assert_eq!(request.glyph().chars().count(), 3);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn caption_is_trimmed() {
        let request = StickerRequest::default().with_text("  yo  ");
        assert_eq!(request.caption(), "yo");
    }

    #[test]
    fn mood_names_roundtrip() {
        for mood in Mood::ALL {
            assert_eq!(mood.label().parse::<Mood>().unwrap(), mood);
            assert_eq!(mood.to_string(), mood.label());
        }
        assert!("meh".parse::<Mood>().is_err());
        assert_eq!(StickerRequest::default().with_mood_name("meh").mood, None);
    }

    #[test]
    fn fallback_mood_serializes_as_null() {
        let json = StickerRequest::default().to_json().unwrap();
        assert!(json.contains("\"mood\":null"));
        assert_eq!(StickerRequest::from_json(&json).unwrap().mood, None);
    }
}
