use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::mesh::PointDto;

/// Request to start animating a session. Omitted fields use the session effects.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct StartAnimationRequest {
    #[validate(range(exclusive_min = 0.0, max = 20.0))]
    pub speed: Option<f32>,
    /// `smooth`, `bouncy` or `linear`.
    pub motion: Option<String>,
    pub magnetism: Option<bool>,
}

/// Whether a session is animating, and how.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnimationStatus {
    pub active: bool,
    pub motion: String,
    pub speed: f32,
    pub magnetism: bool,
    /// Rate of the frame stream.
    pub fps: u32,
}

/// Payload of a `frame` event on the animation stream.
#[derive(Debug, Serialize, ToSchema)]
pub struct FrameEvent {
    /// Monotonic frame counter starting at zero.
    pub index: u64,
    /// CSS declarations (`background` and `background-blend-mode`) for this frame.
    pub css: String,
    pub points: Vec<PointDto>,
}
