use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    color::{HexColor, PaletteSet},
    error::GradientError,
    mesh::{
        symmetry::{MirrorMode, propagate_color},
        transform::{HarmonyKind, apply_harmony, scale_points},
    },
};

/// Smallest grid side length a mesh can be generated with.
pub const MIN_DENSITY: u8 = 2;

/// Clamp a coordinate onto the 0–100 plane. Non-finite input lands on the center.
#[inline]
pub fn clamp_coord(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        50.0
    }
}

/// A single color point of the mesh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshPoint {
    /// Stable identifier, never reused across regenerations.
    pub id: Uuid,
    /// Horizontal position in percent of the canvas width.
    pub x: f32,
    /// Vertical position in percent of the canvas height.
    pub y: f32,
    pub color: HexColor,
    /// Per-point spread override; clamped only when rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub influence: Option<f32>,
}

impl MeshPoint {
    /// Build a point with a fresh identifier at a clamped position.
    pub fn new(x: f32, y: f32, color: HexColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: clamp_coord(x),
            y: clamp_coord(y),
            color,
            influence: None,
        }
    }
}

/// Changes applied to one point in a single edit gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointEdit {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub color: Option<HexColor>,
    /// `Some(None)` clears the override, `None` leaves it untouched.
    pub influence: Option<Option<f32>>,
}

/// Current point set together with the density that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshState {
    points: Vec<MeshPoint>,
    density: u8,
}

impl MeshState {
    /// Generate a `density × density` grid, edges included, with colors drawn
    /// from the palette's mid tones.
    pub fn generate<R: Rng>(
        palette: &PaletteSet,
        density: u8,
        rng: &mut R,
    ) -> Result<Self, GradientError> {
        if density < MIN_DENSITY {
            return Err(GradientError::InvalidParameter(format!(
                "mesh density must be at least {MIN_DENSITY} (got {density})"
            )));
        }

        let candidates = palette.mid_tones();
        if candidates.is_empty() {
            return Err(GradientError::InvalidParameter(
                "palette contains no colors to seed the mesh".into(),
            ));
        }

        let span = f32::from(density - 1);
        let mut points = Vec::with_capacity(usize::from(density) * usize::from(density));
        for row in 0..density {
            for col in 0..density {
                let color = candidates[rng.random_range(0..candidates.len())];
                points.push(MeshPoint::new(
                    f32::from(col) / span * 100.0,
                    f32::from(row) / span * 100.0,
                    color,
                ));
            }
        }

        Ok(Self { points, density })
    }

    pub fn points(&self) -> &[MeshPoint] {
        &self.points
    }

    pub fn density(&self) -> u8 {
        self.density
    }

    pub fn point(&self, id: Uuid) -> Option<&MeshPoint> {
        self.points.iter().find(|point| point.id == id)
    }

    /// Apply a single-point edit, then propagate the point's color to its
    /// mirror images when a mirror mode is active.
    ///
    /// Returns the edited point with the number of mirrored points that were
    /// recolored, or `None` when `id` is unknown.
    pub fn edit_point(
        &mut self,
        id: Uuid,
        edit: PointEdit,
        mirror: MirrorMode,
        tolerance: f32,
    ) -> Option<(MeshPoint, usize)> {
        let point = self.points.iter_mut().find(|point| point.id == id)?;

        if let Some(x) = edit.x {
            point.x = clamp_coord(x);
        }
        if let Some(y) = edit.y {
            point.y = clamp_coord(y);
        }
        if let Some(color) = edit.color {
            point.color = color;
        }
        if let Some(influence) = edit.influence {
            point.influence = influence;
        }
        let edited = point.clone();

        let mirrored = propagate_color(&mut self.points, id, mirror, tolerance);
        Some((edited, mirrored))
    }

    /// Replace point colors 1:1 in order, cycling when fewer colors are given.
    pub fn import_colors(&mut self, colors: &[HexColor]) -> Result<(), GradientError> {
        if colors.is_empty() {
            return Err(GradientError::InvalidParameter(
                "cannot import an empty color list".into(),
            ));
        }
        for (point, color) in self.points.iter_mut().zip(colors.iter().cycle()) {
            point.color = *color;
        }
        Ok(())
    }

    /// Scale every point about the canvas center.
    pub fn scale(&mut self, factor: f32) {
        self.points = scale_points(&self.points, factor);
    }

    /// Recolor the mesh with a hue harmony derived from `base`.
    pub fn apply_harmony(&mut self, base: HexColor, kind: HarmonyKind) {
        apply_harmony(&mut self.points, base, kind);
    }
}
