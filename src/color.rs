use std::str::FromStr;

use image::Rgba;
use palette::{LinSrgb, Srgb};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FormatError;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Core color type used throughout the crate.
/// Wraps RGBA u8 components; alpha 255 is fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// An ordered list of colors. Position is significant: slot N of one palette
/// corresponds to slot N of another.
pub type Palette = Vec<Color>;

/// Concatenate palettes in order, then in-palette order.
pub fn flatten(palettes: &[Palette]) -> impl Iterator<Item = Color> + '_ {
    palettes.iter().flatten().copied()
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Compare color channels only, ignoring alpha.
    pub fn same_rgb(self, other: Color) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    /// Parse a lowercase hex color code: `rrggbb` or `rrggbbaa`.
    ///
    /// Alpha defaults to 255 when only six digits are given. No `#` prefix
    /// and no uppercase digits are accepted.
    pub fn from_hex(hex: &str) -> Result<Self, FormatError> {
        let bytes = hex.as_bytes();
        if bytes.len() != 6 && bytes.len() != 8 {
            return Err(FormatError::Length(bytes.len()));
        }

        let mut nibbles = [0u8; 8];
        for (position, found) in hex.char_indices() {
            nibbles[position] = hex_value(found).ok_or(FormatError::Digit { position, found })?;
        }
        let pair = |i: usize| nibbles[i] * 16 + nibbles[i + 1];

        let a = if bytes.len() == 8 { pair(6) } else { 255 };
        Ok(Self::rgba(pair(0), pair(2), pair(4), a))
    }

    /// Serialize to lowercase hex, `rrggbb` for opaque colors and `rrggbbaa`
    /// otherwise.
    pub fn to_hex(self) -> String {
        let mut out = String::with_capacity(8);
        push_hex(&mut out, self.r);
        push_hex(&mut out, self.g);
        push_hex(&mut out, self.b);
        if !self.is_opaque() {
            push_hex(&mut out, self.a);
        }
        out
    }

    /// Convert to `palette::Srgb<u8>`, dropping alpha.
    pub fn to_srgb_u8(self) -> Srgb<u8> {
        Srgb::new(self.r, self.g, self.b)
    }

    /// WCAG 2.0 relative luminance of the color channels.
    pub fn relative_luminance(self) -> f32 {
        let linear: LinSrgb<f32> = self.to_srgb_u8().into_format::<f32>().into_linear();
        0.2126 * linear.red + 0.7152 * linear.green + 0.0722 * linear.blue
    }
}

fn push_hex(out: &mut String, value: u8) {
    out.push(HEX_DIGITS[usize::from(value >> 4)] as char);
    out.push(HEX_DIGITS[usize::from(value & 0x0f)] as char);
}

fn hex_value(c: char) -> Option<u8> {
    HEX_DIGITS
        .iter()
        .position(|&d| char::from(d) == c)
        .map(|i| i as u8)
}

impl From<Rgba<u8>> for Color {
    fn from(Rgba([r, g, b, a]): Rgba<u8>) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba([c.r, c.g, c.b, c.a])
    }
}

impl FromStr for Color {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Color = Color::rgb(0, 0, 0);
    const WHITE: Color = Color::rgb(255, 255, 255);

    #[test]
    fn opaque_color_encodes_six_digits() {
        assert_eq!(Color::rgb(255, 136, 0).to_hex(), "ff8800");
    }

    #[test]
    fn translucent_color_encodes_alpha() {
        assert_eq!(Color::rgba(1, 2, 3, 0x80).to_hex(), "01020380");
        assert_eq!(Color::TRANSPARENT.to_hex(), "00000000");
    }

    #[test]
    fn decode_six_digits_defaults_alpha() {
        let color = Color::from_hex("aabbcc").unwrap();
        assert_eq!(color, Color::rgba(0xaa, 0xbb, 0xcc, 255));
    }

    #[test]
    fn decode_eight_digits_reads_alpha() {
        let color = Color::from_hex("0a0b0c0d").unwrap();
        assert_eq!(color, Color::rgba(10, 11, 12, 13));
    }

    #[test]
    fn explicit_opaque_alpha_decodes_to_same_color() {
        assert_eq!(
            Color::from_hex("123456ff").unwrap(),
            Color::from_hex("123456").unwrap()
        );
    }

    #[test]
    fn hex_invalid_length() {
        assert_eq!(Color::from_hex("fffff"), Err(FormatError::Length(5)));
        assert_eq!(Color::from_hex("fffffffff"), Err(FormatError::Length(9)));
        assert_eq!(Color::from_hex(""), Err(FormatError::Length(0)));
    }

    #[test]
    fn hex_invalid_chars() {
        assert_eq!(
            Color::from_hex("gggggg"),
            Err(FormatError::Digit {
                position: 0,
                found: 'g'
            })
        );
    }

    #[test]
    fn hex_rejects_uppercase_and_prefix() {
        assert!(matches!(
            Color::from_hex("FF8800"),
            Err(FormatError::Digit { position: 0, .. })
        ));
        assert!(matches!(
            Color::from_hex("#ff8800"),
            Err(FormatError::Length(7))
        ));
    }

    #[test]
    fn hex_rejects_multibyte_chars() {
        // "é" is two bytes, so the byte length is six.
        let err = Color::from_hex("é0000").unwrap_err();
        assert_eq!(
            err,
            FormatError::Digit {
                position: 0,
                found: 'é'
            }
        );
    }

    #[test]
    fn display_matches_to_hex() {
        let color = Color::rgba(171, 205, 239, 7);
        assert_eq!(format!("{color}"), color.to_hex());
    }

    #[test]
    fn parse_via_from_str() {
        let color: Color = "00ff00".parse().unwrap();
        assert_eq!(color, Color::rgb(0, 255, 0));
    }

    #[test]
    fn rgba_pixel_conversion() {
        let pixel = Rgba([9, 8, 7, 6]);
        let color = Color::from(pixel);
        assert_eq!(color, Color::rgba(9, 8, 7, 6));
        assert_eq!(Rgba::from(color), pixel);
    }

    #[test]
    fn same_rgb_ignores_alpha() {
        assert!(Color::rgba(1, 2, 3, 0).same_rgb(Color::rgb(1, 2, 3)));
        assert!(!Color::rgb(1, 2, 3).same_rgb(Color::rgb(1, 2, 4)));
    }

    #[test]
    fn flatten_preserves_palette_then_slot_order() {
        let palettes = vec![
            vec![Color::rgb(1, 0, 0), Color::rgb(2, 0, 0)],
            vec![],
            vec![Color::rgb(3, 0, 0)],
        ];
        let flat: Vec<Color> = flatten(&palettes).collect();
        assert_eq!(
            flat,
            vec![Color::rgb(1, 0, 0), Color::rgb(2, 0, 0), Color::rgb(3, 0, 0)]
        );
    }

    #[test]
    fn serde_uses_hex_strings() {
        let palette: Palette = vec![Color::rgb(255, 0, 0), Color::rgba(0, 0, 255, 16)];
        let json = serde_json::to_string(&palette).unwrap();
        assert_eq!(json, r#"["ff0000","0000ff10"]"#);

        let back: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(back, palette);
    }

    #[test]
    fn serde_rejects_bad_hex() {
        let err = serde_json::from_str::<Color>(r#""12345""#).unwrap_err();
        assert!(err.to_string().contains("wrong color code"), "got: {err}");
    }

    #[test]
    fn relative_luminance_black() {
        assert!(BLACK.relative_luminance() < 0.001);
    }

    #[test]
    fn relative_luminance_white() {
        assert!((WHITE.relative_luminance() - 1.0).abs() < 0.001);
    }
}
