use std::{fmt, str::FromStr};

use palette::{Oklab, Srgb};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{
    color::{HexColor, from_perceptual, to_perceptual},
    error::GradientError,
};

/// Separable compositing operators, evaluated on gamma-encoded channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, SerializeDisplay, DeserializeFromStr)]
pub enum BlendMode {
    /// Plain source-over: the overlay replaces the base.
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    SoftLight,
}

impl BlendMode {
    pub const ALL: [BlendMode; 5] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::SoftLight,
    ];

    /// Blend one channel of `source` onto `backdrop` (both in `[0, 1]`).
    #[inline]
    pub fn apply_channel(self, backdrop: f32, source: f32) -> f32 {
        match self {
            BlendMode::Normal => source,
            BlendMode::Multiply => backdrop * source,
            BlendMode::Screen => screen(backdrop, source),
            BlendMode::Overlay => {
                if backdrop <= 0.5 {
                    2.0 * backdrop * source
                } else {
                    screen(source, 2.0 * backdrop - 1.0)
                }
            }
            BlendMode::SoftLight => soft_light(backdrop, source),
        }
    }

    /// Blend a whole pixel, then mix the result over `backdrop` by `alpha`.
    #[inline]
    pub fn composite(self, backdrop: [f32; 3], source: [f32; 3], alpha: f32) -> [f32; 3] {
        let mut out = backdrop;
        for (dst, (cb, cs)) in out.iter_mut().zip(backdrop.into_iter().zip(source)) {
            let blended = self.apply_channel(cb, cs);
            *dst = cb + (blended - cb) * alpha;
        }
        out
    }
}

#[inline]
fn screen(a: f32, b: f32) -> f32 {
    1.0 - (1.0 - a) * (1.0 - b)
}

#[inline]
fn soft_light(backdrop: f32, source: f32) -> f32 {
    if source <= 0.5 {
        backdrop - (1.0 - 2.0 * source) * backdrop * (1.0 - backdrop)
    } else {
        let d = if backdrop <= 0.25 {
            ((16.0 * backdrop - 12.0) * backdrop + 4.0) * backdrop
        } else {
            backdrop.sqrt()
        };
        backdrop + (2.0 * source - 1.0) * (d - backdrop)
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::SoftLight => "soft-light",
        };
        f.write_str(name)
    }
}

impl FromStr for BlendMode {
    type Err = GradientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "normal" | "source-over" => Ok(BlendMode::Normal),
            "multiply" => Ok(BlendMode::Multiply),
            "screen" => Ok(BlendMode::Screen),
            "overlay" => Ok(BlendMode::Overlay),
            "soft-light" => Ok(BlendMode::SoftLight),
            _ => Err(GradientError::unsupported("blend mode", s)),
        }
    }
}

fn ensure_unit(name: &str, value: f32) -> Result<(), GradientError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GradientError::InvalidParameter(format!(
            "{name} must be within [0, 1] (got {value})"
        )))
    }
}

/// Mix two colors in OKLab. `ratio = 0` yields `a`, `ratio = 1` yields `b`.
pub fn mix(a: HexColor, b: HexColor, ratio: f32) -> Result<HexColor, GradientError> {
    ensure_unit("mix ratio", ratio)?;
    if ratio == 0.0 {
        return Ok(a);
    }
    if ratio == 1.0 {
        return Ok(b);
    }
    let centroid = weighted_centroid(&[
        (to_perceptual(a), 1.0 - ratio),
        (to_perceptual(b), ratio),
    ]);
    Ok(from_perceptual(centroid))
}

/// Weighted centroid of several colors in OKLab.
///
/// Weights are normalised internally; they must be finite, non-negative and
/// sum to a positive total.
pub fn mix_many(colors: &[HexColor], weights: &[f32]) -> Result<HexColor, GradientError> {
    if colors.is_empty() {
        return Err(GradientError::InvalidParameter(
            "cannot mix an empty color list".into(),
        ));
    }
    if colors.len() != weights.len() {
        return Err(GradientError::InvalidParameter(format!(
            "got {} colors but {} weights",
            colors.len(),
            weights.len()
        )));
    }
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(GradientError::InvalidParameter(format!(
            "weights must be finite and non-negative (got {bad})"
        )));
    }

    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return Err(GradientError::InvalidParameter(
            "total weight must be greater than zero".into(),
        ));
    }

    let samples: Vec<(Oklab, f32)> = colors
        .iter()
        .zip(weights)
        .map(|(color, weight)| (to_perceptual(*color), weight / total))
        .collect();
    Ok(from_perceptual(weighted_centroid(&samples)))
}

fn weighted_centroid(samples: &[(Oklab, f32)]) -> Oklab {
    let (l, a, b) = samples
        .iter()
        .fold((0.0, 0.0, 0.0), |(l, a, b), (color, weight)| {
            (l + color.l * weight, a + color.a * weight, b + color.b * weight)
        });
    Oklab::new(l, a, b)
}

/// Composite `overlay` onto `base` with `mode`, then fade the result by `opacity`.
pub fn blend(
    base: HexColor,
    overlay: HexColor,
    mode: BlendMode,
    opacity: f32,
) -> Result<HexColor, GradientError> {
    ensure_unit("opacity", opacity)?;
    let backdrop = base.to_srgb();
    let source = overlay.to_srgb();
    let [r, g, b] = mode.composite(
        [backdrop.red, backdrop.green, backdrop.blue],
        [source.red, source.green, source.blue],
        opacity,
    );
    Ok(HexColor::from_srgb(Srgb::new(r, g, b)))
}
