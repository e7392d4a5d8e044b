use std::{fmt, str::FromStr};

use palette::Hsl;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{
    color::{
        HexColor,
        space::{from_hsl, to_hsl},
    },
    error::GradientError,
    mesh::{MeshPoint, clamp_coord},
};

const MIN_SCALE: f32 = 0.5;
const MAX_SCALE: f32 = 1.5;

/// Scale every point about the canvas center `(50, 50)`.
///
/// The factor is clamped to `[0.5, 1.5]`; a non-finite factor leaves the
/// points untouched.
pub fn scale_points(points: &[MeshPoint], factor: f32) -> Vec<MeshPoint> {
    if !factor.is_finite() {
        return points.to_vec();
    }
    let factor = factor.clamp(MIN_SCALE, MAX_SCALE);
    if factor == 1.0 {
        return points.to_vec();
    }

    points
        .iter()
        .map(|point| MeshPoint {
            x: clamp_coord(50.0 + (point.x - 50.0) * factor),
            y: clamp_coord(50.0 + (point.y - 50.0) * factor),
            ..point.clone()
        })
        .collect()
}

/// Hue relationships available for recoloring a mesh from one base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum HarmonyKind {
    Analogous,
    Triadic,
    SplitComplementary,
}

impl HarmonyKind {
    /// Hue offsets in degrees, base color first.
    fn offsets(self) -> [f32; 3] {
        match self {
            HarmonyKind::Analogous => [0.0, -30.0, 30.0],
            HarmonyKind::Triadic => [0.0, 120.0, 240.0],
            HarmonyKind::SplitComplementary => [0.0, 150.0, 210.0],
        }
    }
}

impl fmt::Display for HarmonyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HarmonyKind::Analogous => "analogous",
            HarmonyKind::Triadic => "triadic",
            HarmonyKind::SplitComplementary => "split-complementary",
        };
        f.write_str(name)
    }
}

impl FromStr for HarmonyKind {
    type Err = GradientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "analogous" => Ok(HarmonyKind::Analogous),
            "triadic" => Ok(HarmonyKind::Triadic),
            "split-complementary" => Ok(HarmonyKind::SplitComplementary),
            _ => Err(GradientError::unsupported("harmony", s)),
        }
    }
}

/// The three harmony colors for `base`. Saturation and lightness follow the
/// base; only the hue rotates.
pub fn harmony_colors(base: HexColor, kind: HarmonyKind) -> [HexColor; 3] {
    let hsl = to_hsl(base);
    let hue = hsl.hue.into_positive_degrees();
    kind.offsets().map(|offset| {
        if offset == 0.0 {
            base
        } else {
            from_hsl(Hsl::new(
                (hue + offset).rem_euclid(360.0),
                hsl.saturation,
                hsl.lightness,
            ))
        }
    })
}

pub(crate) fn apply_harmony(points: &mut [MeshPoint], base: HexColor, kind: HarmonyKind) {
    let colors = harmony_colors(base, kind);
    for (point, color) in points.iter_mut().zip(colors.iter().cycle()) {
        point.color = *color;
    }
}

/// Global hue/saturation/lightness shift applied on top of the stored colors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TonalAdjustment {
    /// Hue rotation in degrees.
    pub hue: f32,
    /// Saturation delta in `[-1, 1]`.
    pub saturation: f32,
    /// Lightness delta in `[-1, 1]`.
    pub lightness: f32,
}

impl TonalAdjustment {
    pub fn is_identity(&self) -> bool {
        self.hue.rem_euclid(360.0) == 0.0 && self.saturation == 0.0 && self.lightness == 0.0
    }

    pub fn apply(&self, color: HexColor) -> HexColor {
        if self.is_identity() {
            return color;
        }
        let hsl = to_hsl(color);
        from_hsl(Hsl::new(
            (hsl.hue.into_positive_degrees() + self.hue).rem_euclid(360.0),
            (hsl.saturation + self.saturation).clamp(0.0, 1.0),
            (hsl.lightness + self.lightness).clamp(0.0, 1.0),
        ))
    }
}

/// Derived display copy of `points` with `adjustment` applied to every color.
pub fn adjust_points(points: &[MeshPoint], adjustment: &TonalAdjustment) -> Vec<MeshPoint> {
    if adjustment.is_identity() {
        return points.to_vec();
    }
    points
        .iter()
        .map(|point| MeshPoint {
            color: adjustment.apply(point.color),
            ..point.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> HexColor {
        HexColor::parse(s).unwrap()
    }

    fn points() -> Vec<MeshPoint> {
        vec![
            MeshPoint::new(0.0, 0.0, hex("#ff0000")),
            MeshPoint::new(25.0, 80.0, hex("#00ff00")),
            MeshPoint::new(100.0, 50.0, hex("#0000ff")),
        ]
    }

    #[test]
    fn unit_scale_is_identity() {
        let before = points();
        assert_eq!(scale_points(&before, 1.0), before);
        assert_eq!(scale_points(&before, f32::NAN), before);
    }

    #[test]
    fn scaling_moves_about_center_and_clamps() {
        let before = points();
        let shrunk = scale_points(&before, 0.5);
        assert_eq!((shrunk[0].x, shrunk[0].y), (25.0, 25.0));
        assert_eq!((shrunk[2].x, shrunk[2].y), (75.0, 50.0));
        assert_eq!(shrunk[1].id, before[1].id);

        // factor clamps to 1.5, then coordinates clamp to the plane
        let grown = scale_points(&before, 4.0);
        assert_eq!((grown[0].x, grown[0].y), (0.0, 0.0));
        assert_eq!(grown[1].x, 12.5);
        assert_eq!(grown[1].y, 95.0);
    }

    #[test]
    fn triadic_rotates_hue_by_thirds() {
        let [base, second, third] = harmony_colors(hex("#ff0000"), HarmonyKind::Triadic);
        assert_eq!(base, hex("#ff0000"));
        assert_eq!(second, hex("#00ff00"));
        assert_eq!(third, hex("#0000ff"));
    }

    #[test]
    fn harmony_is_assigned_cyclically() {
        let mut mesh = points();
        mesh.push(MeshPoint::new(50.0, 50.0, HexColor::BLACK));
        apply_harmony(&mut mesh, hex("#ff0000"), HarmonyKind::Triadic);
        assert_eq!(mesh[0].color, mesh[3].color);
        assert_eq!(mesh[1].color, hex("#00ff00"));
    }

    #[test]
    fn split_complementary_keeps_saturation_and_lightness() {
        let base = hex("#3a7bd5");
        let colors = harmony_colors(base, HarmonyKind::SplitComplementary);
        let reference = to_hsl(base);
        for color in &colors[1..] {
            let hsl = to_hsl(*color);
            assert!((hsl.saturation - reference.saturation).abs() < 0.02);
            assert!((hsl.lightness - reference.lightness).abs() < 0.02);
        }
    }

    #[test]
    fn adjustment_never_touches_stored_colors() {
        let stored = points();
        let adjustment = TonalAdjustment {
            lightness: -0.25,
            ..TonalAdjustment::default()
        };
        let shown = adjust_points(&stored, &adjustment);
        assert_eq!(stored[0].color, hex("#ff0000"));
        assert_ne!(shown[0].color, stored[0].color);
        assert_eq!(shown[0].id, stored[0].id);

        assert_eq!(adjust_points(&stored, &TonalAdjustment::default()), stored);
    }

    #[test]
    fn hue_rotation_by_full_turn_is_identity() {
        let adjustment = TonalAdjustment {
            hue: 360.0,
            ..TonalAdjustment::default()
        };
        assert!(adjustment.is_identity());
        assert_eq!(adjustment.apply(hex("#123456")), hex("#123456"));
    }

    #[test]
    fn unknown_harmony_is_unsupported() {
        assert_eq!(
            "split_complementary".parse::<HarmonyKind>().unwrap(),
            HarmonyKind::SplitComplementary
        );
        assert!("tetradic".parse::<HarmonyKind>().is_err());
    }
}
