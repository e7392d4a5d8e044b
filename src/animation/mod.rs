//! Animation driver: derives transient, perturbed copies of the mesh points
//! each frame without touching the stored model.

pub mod motion;
pub mod task;

pub use motion::{MotionProfile, Pointer, animate_points};
pub use task::AnimationTask;
