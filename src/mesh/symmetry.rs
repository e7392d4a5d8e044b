use std::{fmt, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};
use uuid::Uuid;

use crate::{error::GradientError, mesh::MeshPoint};

/// Per-axis distance within which a point counts as another point's mirror image.
pub const DEFAULT_MIRROR_TOLERANCE: f32 = 5.0;

/// Symmetry constraint propagating color edits to mirrored points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, SerializeDisplay, DeserializeFromStr)]
pub enum MirrorMode {
    #[default]
    None,
    /// Mirror across the vertical center line.
    X,
    /// Mirror across the horizontal center line.
    Y,
    /// Both axes plus the 180° rotation about the center.
    Both,
}

impl MirrorMode {
    /// Geometric mirror images of `(x, y)` under this mode.
    pub fn images(self, x: f32, y: f32) -> Vec<(f32, f32)> {
        let (mx, my) = (100.0 - x, 100.0 - y);
        match self {
            MirrorMode::None => Vec::new(),
            MirrorMode::X => vec![(mx, y)],
            MirrorMode::Y => vec![(x, my)],
            MirrorMode::Both => vec![(mx, y), (x, my), (mx, my)],
        }
    }
}

impl fmt::Display for MirrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MirrorMode::None => "none",
            MirrorMode::X => "x",
            MirrorMode::Y => "y",
            MirrorMode::Both => "both",
        };
        f.write_str(name)
    }
}

impl FromStr for MirrorMode {
    type Err = GradientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(MirrorMode::None),
            "x" => Ok(MirrorMode::X),
            "y" => Ok(MirrorMode::Y),
            "both" | "xy" => Ok(MirrorMode::Both),
            _ => Err(GradientError::unsupported("mirror mode", s)),
        }
    }
}

/// Copy the color of `source_id` onto every other point sitting within
/// `tolerance` of one of its mirror images.
///
/// Matching is best effort: dragged points rarely sit on exact mirror
/// coordinates, and points without a match are left alone. Returns how many
/// points were recolored.
pub fn propagate_color(
    points: &mut [MeshPoint],
    source_id: Uuid,
    mode: MirrorMode,
    tolerance: f32,
) -> usize {
    let Some(source) = points.iter().find(|point| point.id == source_id) else {
        return 0;
    };
    let images = mode.images(source.x, source.y);
    if images.is_empty() {
        return 0;
    }
    let color = source.color;
    let tolerance = tolerance.abs();

    let mut updated = 0;
    for point in points.iter_mut().filter(|point| point.id != source_id) {
        let matches = images.iter().any(|(ix, iy)| {
            (point.x - ix).abs() <= tolerance && (point.y - iy).abs() <= tolerance
        });
        if matches {
            point.color = color;
            updated += 1;
        }
    }
    updated
}
