//! Conversions between the hex interchange form and the float color spaces the
//! engine interpolates in.
//!
//! Everything goes through `palette`: sRGB is gamma-decoded to linear light,
//! then projected into OKLab (the perceptual space) or CIE LAB/LCH (D65).
//! The inverse path clips out-of-gamut channels instead of failing.

use std::{fmt, str::FromStr};

use palette::{FromColor, Hsl, Lab, Lch, Oklab, Oklch, Srgb};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{color::HexColor, error::GradientError};

/// Chroma (or HSL saturation) below which a color is treated as having no hue.
const ACHROMATIC_EPSILON: f32 = 1e-3;

/// Convert a color into OKLab.
pub fn to_perceptual(color: HexColor) -> Oklab {
    Oklab::from_color(color.to_srgb())
}

/// Convert an OKLab color back to hex, clipping to the sRGB gamut.
pub fn from_perceptual(color: Oklab) -> HexColor {
    let rgb: Srgb = Srgb::from_color(color);
    HexColor::from_srgb(rgb)
}

pub fn to_hsl(color: HexColor) -> Hsl {
    Hsl::from_color(color.to_srgb())
}

pub fn from_hsl(color: Hsl) -> HexColor {
    let rgb: Srgb = Srgb::from_color(color);
    HexColor::from_srgb(rgb)
}

pub fn to_lab(color: HexColor) -> Lab {
    Lab::from_color(color.to_srgb())
}

pub fn from_lab(color: Lab) -> HexColor {
    let rgb: Srgb = Srgb::from_color(color);
    HexColor::from_srgb(rgb)
}

pub fn to_lch(color: HexColor) -> Lch {
    Lch::from_color(color.to_srgb())
}

pub fn from_lch(color: Lch) -> HexColor {
    let rgb: Srgb = Srgb::from_color(color);
    HexColor::from_srgb(rgb)
}

pub fn to_oklch(color: HexColor) -> Oklch {
    Oklch::from_color(color.to_srgb())
}

pub fn from_oklch(color: Oklch) -> HexColor {
    let rgb: Srgb = Srgb::from_color(color);
    HexColor::from_srgb(rgb)
}

/// Color spaces supported by interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, SerializeDisplay, DeserializeFromStr)]
pub enum ColorSpace {
    /// Gamma-encoded sRGB channels.
    Rgb,
    Hsl,
    Lab,
    Lch,
    #[default]
    Oklab,
    Oklch,
}

impl ColorSpace {
    pub const ALL: [ColorSpace; 6] = [
        ColorSpace::Rgb,
        ColorSpace::Hsl,
        ColorSpace::Lab,
        ColorSpace::Lch,
        ColorSpace::Oklab,
        ColorSpace::Oklch,
    ];

    /// Index of the circular hue channel, if the space has one.
    pub fn hue_channel(self) -> Option<usize> {
        match self {
            ColorSpace::Hsl => Some(0),
            ColorSpace::Lch | ColorSpace::Oklch => Some(2),
            ColorSpace::Rgb | ColorSpace::Lab | ColorSpace::Oklab => None,
        }
    }

    /// True when the channels describe a color whose hue is meaningless.
    pub fn is_achromatic(self, channels: [f32; 3]) -> bool {
        match self {
            // saturation for HSL, chroma for the LCH family
            ColorSpace::Hsl | ColorSpace::Lch | ColorSpace::Oklch => {
                channels[1].abs() < ACHROMATIC_EPSILON
            }
            ColorSpace::Rgb | ColorSpace::Lab | ColorSpace::Oklab => false,
        }
    }

    /// Split a color into the three float channels of this space.
    pub fn decompose(self, color: HexColor) -> [f32; 3] {
        match self {
            ColorSpace::Rgb => {
                let rgb = color.to_srgb();
                [rgb.red, rgb.green, rgb.blue]
            }
            ColorSpace::Hsl => {
                let hsl = to_hsl(color);
                [hsl.hue.into_positive_degrees(), hsl.saturation, hsl.lightness]
            }
            ColorSpace::Lab => {
                let lab = to_lab(color);
                [lab.l, lab.a, lab.b]
            }
            ColorSpace::Lch => {
                let lch = to_lch(color);
                [lch.l, lch.chroma, lch.hue.into_positive_degrees()]
            }
            ColorSpace::Oklab => {
                let lab = to_perceptual(color);
                [lab.l, lab.a, lab.b]
            }
            ColorSpace::Oklch => {
                let lch = to_oklch(color);
                [lch.l, lch.chroma, lch.hue.into_positive_degrees()]
            }
        }
    }

    /// Rebuild a hex color from channels produced by [`ColorSpace::decompose`].
    pub fn compose(self, [c0, c1, c2]: [f32; 3]) -> HexColor {
        match self {
            ColorSpace::Rgb => HexColor::from_srgb(Srgb::new(c0, c1, c2)),
            ColorSpace::Hsl => from_hsl(Hsl::new(c0, c1, c2)),
            ColorSpace::Lab => from_lab(Lab::new(c0, c1, c2)),
            ColorSpace::Lch => from_lch(Lch::new(c0, c1, c2)),
            ColorSpace::Oklab => from_perceptual(Oklab::new(c0, c1, c2)),
            ColorSpace::Oklch => from_oklch(Oklch::new(c0, c1, c2)),
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorSpace::Rgb => "rgb",
            ColorSpace::Hsl => "hsl",
            ColorSpace::Lab => "lab",
            ColorSpace::Lch => "lch",
            ColorSpace::Oklab => "oklab",
            ColorSpace::Oklch => "oklch",
        };
        f.write_str(name)
    }
}

impl FromStr for ColorSpace {
    type Err = GradientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rgb" => Ok(ColorSpace::Rgb),
            "hsl" => Ok(ColorSpace::Hsl),
            "lab" => Ok(ColorSpace::Lab),
            "lch" => Ok(ColorSpace::Lch),
            "oklab" => Ok(ColorSpace::Oklab),
            "oklch" => Ok(ColorSpace::Oklch),
            _ => Err(GradientError::unsupported("color space", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: HexColor, expected: HexColor) {
        for (a, e) in actual.channels().into_iter().zip(expected.channels()) {
            assert!(
                a.abs_diff(e) <= 1,
                "expected {expected} within ±1, got {actual}"
            );
        }
    }

    fn sample_colors() -> Vec<HexColor> {
        // coarse lattice over the cube plus a few awkward values
        let mut colors = Vec::new();
        for r in (0..=255u16).step_by(51) {
            for g in (0..=255u16).step_by(51) {
                for b in (0..=255u16).step_by(51) {
                    colors.push(HexColor::new(r as u8, g as u8, b as u8));
                }
            }
        }
        colors.extend([
            HexColor::new(1, 2, 3),
            HexColor::new(254, 1, 128),
            HexColor::new(17, 250, 77),
        ]);
        colors
    }

    #[test]
    fn perceptual_round_trip_within_one() {
        for color in sample_colors() {
            assert_close(from_perceptual(to_perceptual(color)), color);
        }
    }

    #[test]
    fn every_space_round_trips_within_one() {
        for space in ColorSpace::ALL {
            for color in sample_colors() {
                assert_close(space.compose(space.decompose(color)), color);
            }
        }
    }

    #[test]
    fn white_and_black_have_extreme_lightness() {
        assert!((to_perceptual(HexColor::WHITE).l - 1.0).abs() < 1e-3);
        assert!(to_perceptual(HexColor::BLACK).l.abs() < 1e-3);
    }

    #[test]
    fn gray_is_achromatic() {
        let gray = HexColor::new(128, 128, 128);
        assert!(ColorSpace::Oklch.is_achromatic(ColorSpace::Oklch.decompose(gray)));
        assert!(ColorSpace::Hsl.is_achromatic(ColorSpace::Hsl.decompose(gray)));
        let red = HexColor::new(255, 0, 0);
        assert!(!ColorSpace::Oklch.is_achromatic(ColorSpace::Oklch.decompose(red)));
    }

    #[test]
    fn out_of_gamut_perceptual_values_clip() {
        let color = from_perceptual(Oklab::new(0.9, 0.5, 0.5));
        assert_eq!(color.r, 255);
    }

    #[test]
    fn parses_space_names() {
        assert_eq!("OKLCH".parse::<ColorSpace>().unwrap(), ColorSpace::Oklch);
        assert_eq!(" rgb".parse::<ColorSpace>().unwrap(), ColorSpace::Rgb);
        assert!(matches!(
            "cmyk".parse::<ColorSpace>(),
            Err(GradientError::UnsupportedMode { kind: "color space", .. })
        ));
    }
}
