//! Procedural grain textures.
//!
//! Every grain type owns one fixed turbulence recipe. The recipe drives both
//! the SVG filter embedded in the vector descriptor and the deterministic
//! noise field sampled by the rasterizer, so the two targets stay comparable.

use std::{fmt, str::FromStr};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::error::GradientError;

/// Side length of the SVG tile, in user units.
const TILE_SIZE: u32 = 200;
/// Period of the canvas weave, in pixels.
const WEAVE_PERIOD: f32 = 6.0;

/// Texture simulated by the grain overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, SerializeDisplay, DeserializeFromStr)]
pub enum GrainType {
    /// Fine isotropic turbulence.
    #[default]
    Noise,
    /// Long streaks stretched along the vertical axis.
    Fibers,
    /// Soft low-frequency paper fiber.
    Paper,
    /// Dense high-frequency film grain.
    Film,
    /// Regular woven pattern.
    Canvas,
}

/// Turbulence parameters shared by the SVG and raster grain paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrainRecipe {
    /// Base frequency along x and y, in cycles per pixel.
    pub base_frequency: (f32, f32),
    pub octaves: u8,
    /// `fractalNoise` when true, `turbulence` otherwise.
    pub fractal: bool,
    pub seed: u32,
}

impl GrainType {
    pub const ALL: [GrainType; 5] = [
        GrainType::Noise,
        GrainType::Fibers,
        GrainType::Paper,
        GrainType::Film,
        GrainType::Canvas,
    ];

    pub fn recipe(self) -> GrainRecipe {
        match self {
            GrainType::Noise => GrainRecipe {
                base_frequency: (0.9, 0.9),
                octaves: 4,
                fractal: true,
                seed: 2,
            },
            GrainType::Fibers => GrainRecipe {
                base_frequency: (0.04, 0.6),
                octaves: 2,
                fractal: false,
                seed: 7,
            },
            GrainType::Paper => GrainRecipe {
                base_frequency: (0.05, 0.05),
                octaves: 5,
                fractal: true,
                seed: 11,
            },
            GrainType::Film => GrainRecipe {
                base_frequency: (1.4, 1.4),
                octaves: 2,
                fractal: true,
                seed: 23,
            },
            GrainType::Canvas => GrainRecipe {
                base_frequency: (0.35, 0.35),
                octaves: 1,
                fractal: false,
                seed: 5,
            },
        }
    }

    /// Standalone SVG document for this grain at `opacity`.
    pub fn svg(self, opacity: f32) -> String {
        let opacity = opacity.clamp(0.0, 1.0);
        let recipe = self.recipe();
        let (fx, fy) = recipe.base_frequency;
        let kind = if recipe.fractal { "fractalNoise" } else { "turbulence" };

        let body = match self {
            GrainType::Canvas => {
                let period = WEAVE_PERIOD;
                let half = period / 2.0;
                format!(
                    "<defs><pattern id='w' width='{period}' height='{period}' patternUnits='userSpaceOnUse'>\
                     <rect width='{half}' height='{half}' fill='#fff'/>\
                     <rect x='{half}' y='{half}' width='{half}' height='{half}' fill='#fff'/>\
                     <rect x='{half}' width='{half}' height='{half}' fill='#000'/>\
                     <rect y='{half}' width='{half}' height='{half}' fill='#000'/>\
                     </pattern><filter id='g'><feTurbulence type='{kind}' baseFrequency='{fx} {fy}' \
                     numOctaves='{octaves}' seed='{seed}'/><feColorMatrix type='saturate' values='0'/>\
                     <feBlend in2='SourceGraphic' mode='multiply'/></filter></defs>\
                     <rect width='100%' height='100%' fill='url(#w)' filter='url(#g)' opacity='{opacity}'/>",
                    octaves = recipe.octaves,
                    seed = recipe.seed,
                )
            }
            _ => format!(
                "<filter id='g'><feTurbulence type='{kind}' baseFrequency='{fx} {fy}' \
                 numOctaves='{octaves}' seed='{seed}' stitchTiles='stitch'/>\
                 <feColorMatrix type='saturate' values='0'/></filter>\
                 <rect width='100%' height='100%' filter='url(#g)' opacity='{opacity}'/>",
                octaves = recipe.octaves,
                seed = recipe.seed,
            ),
        };

        format!(
            "<svg xmlns='http://www.w3.org/2000/svg' width='{TILE_SIZE}' height='{TILE_SIZE}' \
             viewBox='0 0 {TILE_SIZE} {TILE_SIZE}'>{body}</svg>"
        )
    }

    /// The SVG grain encoded as a base64 `data:` URI.
    pub fn data_uri(self, opacity: f32) -> String {
        format!(
            "data:image/svg+xml;base64,{}",
            STANDARD.encode(self.svg(opacity))
        )
    }

    /// Grain intensity in `[0, 1]` at pixel `(x, y)`; 0.5 is neutral.
    ///
    /// Deterministic: the same type and coordinates always yield the same value.
    #[allow(clippy::cast_precision_loss)]
    pub fn sample(self, x: u32, y: u32) -> f32 {
        let recipe = self.recipe();
        let (px, py) = (x as f32, y as f32);

        let field = if self == GrainType::Canvas {
            let weave = weave(px, py);
            let fibre = value_noise(px * recipe.base_frequency.0, py * recipe.base_frequency.1, recipe.seed);
            0.5 + (weave - 0.5) * 0.7 + (fibre - 0.5) * 0.3
        } else {
            octave_noise(px, py, recipe)
        };
        field.clamp(0.0, 1.0)
    }
}

fn weave(x: f32, y: f32) -> f32 {
    let half = WEAVE_PERIOD / 2.0;
    let warp = (x.rem_euclid(WEAVE_PERIOD) < half) == (y.rem_euclid(WEAVE_PERIOD) < half);
    if warp { 0.75 } else { 0.25 }
}

fn octave_noise(x: f32, y: f32, recipe: GrainRecipe) -> f32 {
    let (fx, fy) = recipe.base_frequency;
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut norm = 0.0;
    let mut scale = 1.0;

    for octave in 0..u32::from(recipe.octaves.max(1)) {
        let n = value_noise(x * fx * scale, y * fy * scale, recipe.seed.wrapping_add(octave));
        let n = if recipe.fractal { n } else { (n * 2.0 - 1.0).abs() };
        total += n * amplitude;
        norm += amplitude;
        amplitude *= 0.5;
        scale *= 2.0;
    }

    let value = total / norm;
    if recipe.fractal {
        value
    } else {
        // turbulence folds around zero; recentre it on the neutral mid-gray
        0.25 + value * 0.5
    }
}

/// Smoothly interpolated lattice noise in `[0, 1]`.
#[allow(clippy::cast_possible_truncation)]
fn value_noise(x: f32, y: f32, seed: u32) -> f32 {
    let (x0, y0) = (x.floor(), y.floor());
    let (tx, ty) = (smooth(x - x0), smooth(y - y0));
    let (ix, iy) = (x0 as i32, y0 as i32);

    let a = lattice(ix, iy, seed);
    let b = lattice(ix + 1, iy, seed);
    let c = lattice(ix, iy + 1, seed);
    let d = lattice(ix + 1, iy + 1, seed);

    let top = a + (b - a) * tx;
    let bottom = c + (d - c) * tx;
    top + (bottom - top) * ty
}

#[inline]
fn smooth(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[allow(clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn lattice(x: i32, y: i32, seed: u32) -> f32 {
    let mut h = (x as u32).wrapping_mul(0x8da6_b343)
        ^ (y as u32).wrapping_mul(0xd816_3841)
        ^ seed.wrapping_mul(0xcb1a_b31f);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2c1b_3c6d);
    h ^= h >> 12;
    h = h.wrapping_mul(0x297a_2d39);
    h ^= h >> 15;
    (h & 0x00ff_ffff) as f32 / 16_777_215.0
}

impl fmt::Display for GrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GrainType::Noise => "noise",
            GrainType::Fibers => "fibers",
            GrainType::Paper => "paper",
            GrainType::Film => "film",
            GrainType::Canvas => "canvas",
        };
        f.write_str(name)
    }
}

impl FromStr for GrainType {
    type Err = GradientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "noise" => Ok(GrainType::Noise),
            "fibers" | "fibres" => Ok(GrainType::Fibers),
            "paper" => Ok(GrainType::Paper),
            "film" => Ok(GrainType::Film),
            "canvas" => Ok(GrainType::Canvas),
            _ => Err(GradientError::unsupported("grain type", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_carries_recipe() {
        let svg = GrainType::Paper.svg(0.4);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("baseFrequency='0.05 0.05'"));
        assert!(svg.contains("numOctaves='5'"));
        assert!(svg.contains("opacity='0.4'"));
        assert!(GrainType::Canvas.svg(1.0).contains("<pattern"));
    }

    #[test]
    fn data_uri_decodes_back_to_svg() {
        let uri = GrainType::Film.data_uri(0.2);
        let encoded = uri.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let svg = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(svg, GrainType::Film.svg(0.2));
    }

    #[test]
    fn samples_are_deterministic_and_bounded() {
        for grain in GrainType::ALL {
            for (x, y) in [(0, 0), (13, 7), (511, 1023)] {
                let value = grain.sample(x, y);
                assert!((0.0..=1.0).contains(&value), "{grain} {value}");
                assert_eq!(value, grain.sample(x, y));
            }
        }
    }

    #[test]
    fn noise_field_varies() {
        let values: Vec<f32> = (0..64).map(|i| GrainType::Film.sample(i, i * 3)).collect();
        let min = values.iter().copied().fold(f32::MAX, f32::min);
        let max = values.iter().copied().fold(f32::MIN, f32::max);
        assert!(max - min > 0.1);
    }

    #[test]
    fn canvas_weave_is_periodic() {
        assert_eq!(weave(0.0, 0.0), weave(WEAVE_PERIOD, WEAVE_PERIOD));
        assert_ne!(weave(0.0, 0.0), weave(WEAVE_PERIOD / 2.0, 0.0));
    }

    #[test]
    fn unknown_grain_is_unsupported() {
        assert!(matches!(
            "sand".parse::<GrainType>(),
            Err(GradientError::UnsupportedMode { kind: "grain type", .. })
        ));
        assert_eq!("Fibres".parse::<GrainType>().unwrap(), GrainType::Fibers);
    }
}
