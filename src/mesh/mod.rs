//! The mesh-gradient point model: a grid of color points addressed by stable
//! ids, plus the geometric and tonal operations applied to it.

pub mod point;
pub mod sampling;
pub mod symmetry;
pub mod transform;

pub use point::{MeshPoint, MeshState, PointEdit, clamp_coord};
pub use symmetry::{DEFAULT_MIRROR_TOLERANCE, MirrorMode, propagate_color};
pub use transform::{HarmonyKind, TonalAdjustment, adjust_points, harmony_colors, scale_points};
