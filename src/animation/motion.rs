use std::{f32::consts::TAU, fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{
    error::GradientError,
    mesh::{MeshPoint, clamp_coord},
};

/// Phase offset between consecutive points, in radians.
pub const PHASE_STEP: f32 = 0.7;
/// Peak offset of the smooth oscillation, in plane units.
const SMOOTH_AMPLITUDE: f32 = 5.0;
const BOUNCY_AMPLITUDE: f32 = 6.0;
const DRIFT_RADIUS: f32 = 2.5;
/// Distance within which magnetism captures a point.
pub const CAPTURE_RADIUS: f32 = 30.0;
/// Fraction of the way to the pointer a point travels at zero distance.
const MAGNET_PULL: f32 = 0.4;

/// Oscillation profile of the animation driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, SerializeDisplay, DeserializeFromStr)]
pub enum MotionProfile {
    /// Plain sine/cosine sway.
    #[default]
    Smooth,
    /// Faster oscillation whose amplitude swells and fades.
    Bouncy,
    /// Slow constant-rate circular drift.
    Linear,
}

impl MotionProfile {
    /// Offset of a point with phase `phase` at scaled time `t` seconds.
    fn offset(self, t: f32, phase: f32) -> (f32, f32) {
        match self {
            MotionProfile::Smooth => (
                (t + phase).sin() * SMOOTH_AMPLITUDE,
                (t * 0.8 + phase).cos() * SMOOTH_AMPLITUDE,
            ),
            MotionProfile::Bouncy => {
                let envelope = 0.5 + 0.5 * (t * 0.5 + phase).sin().abs();
                let amplitude = BOUNCY_AMPLITUDE * envelope;
                (
                    (t * 2.4 + phase).sin() * amplitude,
                    (t * 3.1 + phase).cos() * amplitude,
                )
            }
            MotionProfile::Linear => {
                let angle = (t * 0.6 + phase).rem_euclid(TAU);
                (angle.cos() * DRIFT_RADIUS, angle.sin() * DRIFT_RADIUS)
            }
        }
    }
}

impl fmt::Display for MotionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MotionProfile::Smooth => "smooth",
            MotionProfile::Bouncy => "bouncy",
            MotionProfile::Linear => "linear",
        };
        f.write_str(name)
    }
}

impl FromStr for MotionProfile {
    type Err = GradientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smooth" => Ok(MotionProfile::Smooth),
            "bouncy" => Ok(MotionProfile::Bouncy),
            "linear" => Ok(MotionProfile::Linear),
            _ => Err(GradientError::unsupported("motion profile", s)),
        }
    }
}

/// Last known pointer position on the 0–100 plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

/// Derive the animated copy of `points` at `elapsed` time.
///
/// The stored points are never touched. With `magnetism` on, points within
/// [`CAPTURE_RADIUS`] of the pointer are pulled toward it, harder the closer
/// they already are.
#[allow(clippy::cast_precision_loss)]
pub fn animate_points(
    points: &[MeshPoint],
    elapsed: Duration,
    speed: f32,
    motion: MotionProfile,
    pointer: Option<Pointer>,
    magnetism: bool,
) -> Vec<MeshPoint> {
    let speed = if speed.is_finite() { speed.max(0.0) } else { 1.0 };
    let t = elapsed.as_secs_f32() * speed;
    let magnet = pointer.filter(|_| magnetism);

    points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let (dx, dy) = motion.offset(t, index as f32 * PHASE_STEP);
            let (mut x, mut y) = (point.x + dx, point.y + dy);

            if let Some(pointer) = magnet {
                let distance = (pointer.x - x).hypot(pointer.y - y);
                if distance < CAPTURE_RADIUS {
                    let pull = (1.0 - distance / CAPTURE_RADIUS) * MAGNET_PULL;
                    x += (pointer.x - x) * pull;
                    y += (pointer.y - y) * pull;
                }
            }

            MeshPoint {
                x: clamp_coord(x),
                y: clamp_coord(y),
                ..point.clone()
            }
        })
        .collect()
}
