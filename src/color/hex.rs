use std::{fmt, str::FromStr};

use palette::Srgb;
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::error::GradientError;

/// Canonical interchange form of a color: three 8-bit sRGB channels.
///
/// Serialises as a lowercase `#rrggbb` string and parses `#rgb`, `#rrggbb`
/// with or without the leading `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const BLACK: HexColor = HexColor::new(0, 0, 0);
    pub const WHITE: HexColor = HexColor::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a 3- or 6-digit hex string.
    pub fn parse(input: &str) -> Result<Self, GradientError> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GradientError::InvalidColorFormat(format!(
                "`{input}` contains non-hexadecimal characters"
            )));
        }

        let channel = |slice: &str| {
            u8::from_str_radix(slice, 16).map_err(|err| {
                GradientError::InvalidColorFormat(format!("`{input}`: {err}"))
            })
        };

        match digits.len() {
            3 => {
                let mut expanded = [0u8; 3];
                for (slot, c) in expanded.iter_mut().zip(digits.chars()) {
                    let doubled: String = [c, c].iter().collect();
                    *slot = channel(&doubled)?;
                }
                Ok(Self::new(expanded[0], expanded[1], expanded[2]))
            }
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            len => Err(GradientError::InvalidColorFormat(format!(
                "`{input}` must have 3 or 6 hex digits (got {len})"
            ))),
        }
    }

    /// Gamma-encoded float form with channels in `[0, 1]`.
    pub fn to_srgb(self) -> Srgb {
        Srgb::<u8>::new(self.r, self.g, self.b).into_format()
    }

    /// Quantise a gamma-encoded float color, clipping out-of-gamut channels.
    pub fn from_srgb(rgb: Srgb) -> Self {
        Self::new(
            quantize(rgb.red),
            quantize(rgb.green),
            quantize(rgb.blue),
        )
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

#[inline]
pub(crate) fn quantize(value: f32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (value * 255.0).round().clamp(0.0, 255.0) as u8
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = GradientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_forms() {
        assert_eq!(HexColor::parse("#ff8000").unwrap(), HexColor::new(255, 128, 0));
        assert_eq!(HexColor::parse("FF8000").unwrap(), HexColor::new(255, 128, 0));
        assert_eq!(HexColor::parse("  #0a0B0c ").unwrap(), HexColor::new(10, 11, 12));
    }

    #[test]
    fn expands_three_digit_form() {
        assert_eq!(HexColor::parse("#f80").unwrap(), HexColor::new(255, 136, 0));
        assert_eq!(HexColor::parse("abc").unwrap(), HexColor::new(0xaa, 0xbb, 0xcc));
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", "#", "#12", "#1234", "#ggg", "#12345z", "red", "#ff00ff00"] {
            assert!(
                matches!(HexColor::parse(bad), Err(GradientError::InvalidColorFormat(_))),
                "expected `{bad}` to be rejected"
            );
        }
    }

    #[test]
    fn displays_lowercase_hex() {
        assert_eq!(HexColor::new(171, 205, 239).to_string(), "#abcdef");
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&HexColor::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let parsed: HexColor = serde_json::from_str("\"#fff\"").unwrap();
        assert_eq!(parsed, HexColor::WHITE);
        assert!(serde_json::from_str::<HexColor>("\"nope\"").is_err());
    }

    #[test]
    fn srgb_round_trip_is_exact() {
        let color = HexColor::new(12, 200, 99);
        assert_eq!(HexColor::from_srgb(color.to_srgb()), color);
    }

    #[test]
    fn out_of_gamut_channels_clip() {
        let clipped = HexColor::from_srgb(Srgb::new(1.4, -0.2, 0.5));
        assert_eq!(clipped, HexColor::new(255, 0, 128));
    }
}
