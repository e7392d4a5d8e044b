use std::{fmt, str::FromStr};

use serde::Serialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{
    color::{ColorSpace, HexColor, mix::mix},
    error::GradientError,
};

/// How far toward white the lightest entry of a ramp is pushed.
const RAMP_TINT: f32 = 0.85;
/// How far toward black the darkest entry of a ramp is pushed.
const RAMP_SHADE: f32 = 0.75;

/// Easing applied to the normalized interpolation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, SerializeDisplay, DeserializeFromStr)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ];

    /// Map `t ∈ [0, 1]` onto the eased curve. Both ends are fixed points.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        };
        f.write_str(name)
    }
}

impl FromStr for Easing {
    type Err = GradientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "linear" => Ok(Easing::Linear),
            "ease-in" => Ok(Easing::EaseIn),
            "ease-out" => Ok(Easing::EaseOut),
            "ease-in-out" => Ok(Easing::EaseInOut),
            _ => Err(GradientError::unsupported("easing", s)),
        }
    }
}

/// Produce `steps` colors spread across the control stops `colors`.
///
/// Stops sit at `t = i / (n - 1)`. Each output samples an eased `t`, finds the
/// surrounding pair of stops and interpolates every channel of `space`
/// linearly (hue channels along the shorter arc). Samples that land exactly
/// on a stop return that stop unchanged, so the first and last outputs are
/// always the first and last inputs.
pub fn interpolate(
    colors: &[HexColor],
    steps: usize,
    space: ColorSpace,
    easing: Easing,
) -> Result<Vec<HexColor>, GradientError> {
    if colors.len() < 2 {
        return Err(GradientError::InvalidParameter(format!(
            "interpolation needs at least 2 colors (got {})",
            colors.len()
        )));
    }
    if steps < 2 {
        return Err(GradientError::InvalidParameter(format!(
            "interpolation needs at least 2 steps (got {steps})"
        )));
    }

    let stops: Vec<[f32; 3]> = colors.iter().map(|c| space.decompose(*c)).collect();
    let segments = colors.len() - 1;

    #[allow(clippy::cast_precision_loss)]
    let samples = (0..steps)
        .map(|i| {
            let t = i as f32 / (steps - 1) as f32;
            let position = easing.apply(t).clamp(0.0, 1.0) * segments as f32;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let index = (position.floor() as usize).min(segments - 1);
            let local = position - index as f32;

            if local <= 0.0 {
                colors[index]
            } else if local >= 1.0 {
                colors[index + 1]
            } else {
                space.compose(lerp_channels(space, stops[index], stops[index + 1], local))
            }
        })
        .collect();

    Ok(samples)
}

fn lerp_channels(space: ColorSpace, mut from: [f32; 3], mut to: [f32; 3], t: f32) -> [f32; 3] {
    let hue = space.hue_channel();

    if let Some(h) = hue {
        // A gray has no hue of its own; borrow the other end's so the blend
        // does not swing through an arbitrary red.
        match (space.is_achromatic(from), space.is_achromatic(to)) {
            (true, false) => from[h] = to[h],
            (false, true) => to[h] = from[h],
            _ => {}
        }
    }

    let mut out = [0.0; 3];
    for channel in 0..3 {
        out[channel] = if Some(channel) == hue {
            lerp_hue(from[channel], to[channel], t)
        } else {
            from[channel] + (to[channel] - from[channel]) * t
        };
    }
    out
}

/// Interpolate two angles in degrees along the shorter arc.
#[inline]
pub fn lerp_hue(from: f32, to: f32, t: f32) -> f32 {
    let delta = (to - from + 540.0).rem_euclid(360.0) - 180.0;
    (from + delta * t).rem_euclid(360.0)
}

/// Tint-to-shade ramp through `base`, used for the color-ramp export.
pub fn ramp(base: HexColor, steps: usize, space: ColorSpace) -> Result<Vec<HexColor>, GradientError> {
    if steps < 3 {
        return Err(GradientError::InvalidParameter(format!(
            "a ramp needs at least 3 steps (got {steps})"
        )));
    }
    let tint = mix(base, HexColor::WHITE, RAMP_TINT)?;
    let shade = mix(base, HexColor::BLACK, RAMP_SHADE)?;
    interpolate(&[tint, base, shade], steps, space, Easing::Linear)
}

/// A duotone pair together with its two-stop gradient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duotone {
    pub from: HexColor,
    pub to: HexColor,
    /// CSS `linear-gradient` between the two colors.
    pub gradient: String,
}

pub fn duotone(from: HexColor, to: HexColor) -> Duotone {
    Duotone {
        from,
        to,
        gradient: format!("linear-gradient(135deg, {from} 0%, {to} 100%)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::to_perceptual;

    fn hex(s: &str) -> HexColor {
        HexColor::parse(s).unwrap()
    }

    #[test]
    fn easing_fixes_endpoints() {
        for easing in Easing::ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing}");
        }
        assert_eq!(Easing::EaseIn.apply(0.5), 0.25);
        assert_eq!(Easing::EaseOut.apply(0.5), 0.75);
        assert_eq!(Easing::EaseInOut.apply(0.5), 0.5);
    }

    #[test]
    fn black_to_white_in_rgb() {
        let out = interpolate(
            &[hex("#000000"), hex("#ffffff")],
            3,
            ColorSpace::Rgb,
            Easing::Linear,
        )
        .unwrap();
        assert_eq!(out[0], HexColor::BLACK);
        assert!(out[1] == hex("#7f7f7f") || out[1] == hex("#808080"), "{}", out[1]);
        assert_eq!(out[2], HexColor::WHITE);
    }

    #[test]
    fn endpoints_are_exact_for_every_space_and_easing() {
        let a = hex("#3a7bd5");
        let b = hex("#ff5e62");
        for space in ColorSpace::ALL {
            for easing in Easing::ALL {
                for steps in [2, 3, 7, 16] {
                    let out = interpolate(&[a, b], steps, space, easing).unwrap();
                    assert_eq!(out.len(), steps);
                    assert_eq!(out[0], a, "{space} {easing}");
                    assert_eq!(out[steps - 1], b, "{space} {easing}");
                }
            }
        }
    }

    #[test]
    fn interior_stops_are_hit_exactly() {
        let stops = [hex("#112233"), hex("#abcdef"), hex("#fedcba")];
        let out = interpolate(&stops, 5, ColorSpace::Oklch, Easing::Linear).unwrap();
        assert_eq!(out[2], stops[1]);
    }

    #[test]
    fn rejects_degenerate_requests() {
        assert!(matches!(
            interpolate(&[hex("#000")], 4, ColorSpace::Rgb, Easing::Linear),
            Err(GradientError::InvalidParameter(_))
        ));
        assert!(matches!(
            interpolate(&[hex("#000"), hex("#fff")], 1, ColorSpace::Rgb, Easing::Linear),
            Err(GradientError::InvalidParameter(_))
        ));
    }

    #[test]
    fn is_deterministic() {
        let stops = [hex("#ff0000"), hex("#00ff00"), hex("#0000ff")];
        let first = interpolate(&stops, 11, ColorSpace::Lch, Easing::EaseInOut).unwrap();
        let second = interpolate(&stops, 11, ColorSpace::Lch, Easing::EaseInOut).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn hue_takes_shorter_arc() {
        assert!(lerp_hue(350.0, 10.0, 0.5).abs() < 1e-3);
        assert!((lerp_hue(10.0, 350.0, 0.25) - 5.0).abs() < 1e-3);
        assert!((lerp_hue(0.0, 90.0, 0.5) - 45.0).abs() < 1e-3);
    }

    #[test]
    fn hsl_midpoint_of_red_and_magenta_stays_reddish() {
        // red (0°) to magenta (300°): the short way passes through 330°, not green
        let out = interpolate(&[hex("#ff0000"), hex("#ff00ff")], 3, ColorSpace::Hsl, Easing::Linear)
            .unwrap();
        let mid = out[1];
        assert_eq!(mid.r, 255);
        assert_eq!(mid.g, 0);
    }

    #[test]
    fn gray_endpoint_borrows_hue() {
        let out = interpolate(&[hex("#808080"), hex("#0000ff")], 3, ColorSpace::Oklch, Easing::Linear)
            .unwrap();
        let mid = out[1];
        assert!(mid.b > mid.r && mid.b > mid.g, "expected bluish midpoint, got {mid}");
    }

    #[test]
    fn ramp_runs_light_to_dark_through_base() {
        let base = hex("#3a7bd5");
        let out = ramp(base, 5, ColorSpace::Oklab).unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(out[2], base);
        let lightness: Vec<f32> = out.iter().map(|c| to_perceptual(*c).l).collect();
        assert!(lightness.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn duotone_builds_two_stop_gradient() {
        let pair = duotone(hex("#000"), hex("#fff"));
        assert_eq!(
            pair.gradient,
            "linear-gradient(135deg, #000000 0%, #ffffff 100%)"
        );
    }
}
