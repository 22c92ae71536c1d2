//! Hex colors, brightness adjustment, and the fixed palettes.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{StickerError, StickerResult};
use crate::request::Mood;

// ============================================================================
// Palettes
// ============================================================================

/// Base color used when a request carries no recognized mood.
pub const FALLBACK_BASE: HexColor = HexColor::rgb(0xFF, 0xE0, 0x66);

/// Mood to background base color. Read-only for the lifetime of the process.
pub const MOOD_PALETTE: [(Mood, HexColor); 8] = [
    (Mood::Happy, HexColor::rgb(0xFF, 0xE0, 0x66)),
    (Mood::Sad, HexColor::rgb(0x6C, 0x9B, 0xD1)),
    (Mood::Angry, HexColor::rgb(0xFF, 0x6B, 0x6B)),
    (Mood::Excited, HexColor::rgb(0xFF, 0x9F, 0x43)),
    (Mood::Calm, HexColor::rgb(0x7E, 0xD6, 0xA5)),
    (Mood::Love, HexColor::rgb(0xFF, 0x8F, 0xB1)),
    (Mood::Cool, HexColor::rgb(0x4E, 0xCD, 0xC4)),
    (Mood::Tired, HexColor::rgb(0xA2, 0x9B, 0xFE)),
];

/// Seven-color cycle for the rainbow text effect, in order.
pub const RAINBOW_PALETTE: [HexColor; 7] = [
    HexColor::rgb(0xFF, 0x00, 0x00), // red
    HexColor::rgb(0xFF, 0x7F, 0x00), // orange
    HexColor::rgb(0xFF, 0xFF, 0x00), // yellow
    HexColor::rgb(0x00, 0xFF, 0x00), // green
    HexColor::rgb(0x00, 0x00, 0xFF), // blue
    HexColor::rgb(0x4B, 0x00, 0x82), // indigo
    HexColor::rgb(0x94, 0x00, 0xD3), // violet
];

/// Looks up the background base color for a mood, falling back to
/// [`FALLBACK_BASE`] when no mood was recognized.
pub fn mood_base_color(mood: Option<Mood>) -> HexColor {
    mood.and_then(|mood| {
        MOOD_PALETTE
            .iter()
            .find(|(entry, _)| *entry == mood)
            .map(|(_, color)| *color)
    })
    .unwrap_or(FALLBACK_BASE)
}

/// Returns the rainbow color for the character at `index`.
pub fn rainbow_color(index: usize) -> HexColor {
    RAINBOW_PALETTE[index % RAINBOW_PALETTE.len()]
}

// ============================================================================
// HexColor
// ============================================================================

/// An opaque sRGB color written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl HexColor {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns the channels as a palette color.
    pub fn to_srgb(self) -> Srgb<u8> {
        Srgb::new(self.red, self.green, self.blue)
    }

    pub fn channels(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    /// Adds `amount` to every channel, saturating at 0 and 255.
    ///
    /// ```
    /// use mood_sticker::HexColor;
    ///
    /// let white: HexColor = "#FFFFFF".parse().unwrap();
    /// assert_eq!(white.adjusted(-50).to_string(), "#CDCDCD");
    /// ```
    pub fn adjusted(self, amount: i32) -> Self {
        let shift = |channel: u8| (i32::from(channel) + amount).clamp(0, 255) as u8;
        Self::rgb(shift(self.red), shift(self.green), shift(self.blue))
    }
}

impl From<Srgb<u8>> for HexColor {
    fn from(color: Srgb<u8>) -> Self {
        Self::rgb(color.red, color.green, color.blue)
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl FromStr for HexColor {
    type Err = StickerError;

    /// Parses `#RRGGBB` or the short `#RGB` form, case-insensitively.
    fn from_str(s: &str) -> StickerResult<Self> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| StickerError::invalid_color(s))?;

        // palette slices by byte offset, so only hand it plain hex digits
        if !matches!(digits.len(), 3 | 6) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(StickerError::invalid_color(s));
        }

        digits
            .parse::<Srgb<u8>>()
            .map(Self::from)
            .map_err(|_| StickerError::invalid_color(s))
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Adjusts each channel of a hex color by `amount`, clamping to `[0, 255]`.
///
/// Fails only when `color` is not a valid hex color.
pub fn adjust_brightness(color: &str, amount: i32) -> StickerResult<String> {
    let color: HexColor = color.parse()?;
    Ok(color.adjusted(amount).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn darken_white_saturates_per_channel() {
        assert_eq!(adjust_brightness("#FFFFFF", -50).unwrap(), "#CDCDCD");
    }

    #[test]
    fn brighten_black_clamps_instead_of_wrapping() {
        assert_eq!(adjust_brightness("#000000", 300).unwrap(), "#FFFFFF");
        assert_eq!(adjust_brightness("#000000", 50).unwrap(), "#323232");
    }

    #[test]
    fn darken_clamps_at_zero() {
        assert_eq!(adjust_brightness("#1020FF", -40).unwrap(), "#0000D7");
    }

    #[test]
    fn channels_move_independently() {
        let color = HexColor::rgb(0xFF, 0xE0, 0x66).adjusted(-20);
        assert_eq!(color, HexColor::rgb(0xEB, 0xCC, 0x52));
    }

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!("#ff8000".parse::<HexColor>().unwrap(), HexColor::rgb(255, 128, 0));
        assert_eq!("#F80".parse::<HexColor>().unwrap(), HexColor::rgb(255, 136, 0));
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["", "#", "000000", "#12345", "#GGGGGG", "#1234567", "#ÿÿÿ", "red"] {
            let err = bad.parse::<HexColor>().unwrap_err();
            assert!(matches!(err, StickerError::InvalidColor(_)), "{bad:?} parsed");
        }
        assert!(adjust_brightness("nope", 10).is_err());
    }

    #[test]
    fn displays_uppercase_hex() {
        assert_eq!(HexColor::rgb(0x0a, 0xbc, 0x01).to_string(), "#0ABC01");
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&HexColor::rgb(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: HexColor = serde_json::from_str("\"#abcdef\"").unwrap();
        assert_eq!(back, HexColor::rgb(0xAB, 0xCD, 0xEF));
        assert!(serde_json::from_str::<HexColor>("\"blue\"").is_err());
    }

    #[test]
    fn every_mood_has_one_palette_entry() {
        for mood in Mood::ALL {
            let hits = MOOD_PALETTE.iter().filter(|(m, _)| *m == mood).count();
            assert_eq!(hits, 1, "{mood:?}");
        }
    }

    #[test]
    fn missing_mood_falls_back() {
        assert_eq!(mood_base_color(None), FALLBACK_BASE);
        assert_eq!(FALLBACK_BASE.to_string(), "#FFE066");
        assert_eq!(mood_base_color(Some(Mood::Sad)).to_string(), "#6C9BD1");
    }

    #[test]
    fn rainbow_cycles_after_seven() {
        assert_eq!(rainbow_color(0), HexColor::rgb(0xFF, 0, 0));
        assert_eq!(rainbow_color(1), HexColor::rgb(0xFF, 0x7F, 0));
        assert_eq!(rainbow_color(7), rainbow_color(0));
        assert_eq!(rainbow_color(13), rainbow_color(6));
    }

    #[test]
    fn palette_roundtrip() {
        let color = HexColor::rgb(12, 34, 56);
        assert_eq!(HexColor::from(color.to_srgb()), color);
    }
}
