//! DTO definitions for studio sessions and their mesh edits.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    animation::Pointer,
    color::PaletteSet,
    dto::{
        format_timestamp,
        validation::{validate_hex_color, validate_hex_colors},
    },
    mesh::{MeshPoint, TonalAdjustment},
    render::EffectParameters,
    state::StudioSession,
};

/// Payload used to open a new studio session.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct CreateSessionRequest {
    /// Grid side length; 4 when omitted, capped by the configured maximum.
    #[validate(range(min = 2))]
    pub density: Option<u8>,
    /// Restrict seeding to one palette family.
    pub family: Option<String>,
    /// Family name to shade list, used instead of the configured palettes.
    #[schema(value_type = Option<Object>)]
    pub palette: Option<PaletteSet>,
    /// Seed for reproducible color picks.
    pub seed: Option<u64>,
    #[validate(nested)]
    pub effects: Option<EffectsUpdateRequest>,
}

/// A mesh point as exposed to clients.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct PointDto {
    pub id: Uuid,
    pub x: f32,
    pub y: f32,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub influence: Option<f32>,
}

impl From<&MeshPoint> for PointDto {
    fn from(point: &MeshPoint) -> Self {
        Self {
            id: point.id,
            x: point.x,
            y: point.y,
            color: point.color.to_string(),
            influence: point.influence,
        }
    }
}

/// Convert a point slice into its DTO projection.
pub fn point_dtos(points: &[MeshPoint]) -> Vec<PointDto> {
    points.iter().map(PointDto::from).collect()
}

/// Effect parameters as exposed to clients.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct EffectsDto {
    pub influence: f32,
    pub vignette: f32,
    pub grain: f32,
    pub grain_type: String,
    pub blend_mode: String,
    pub animation_speed: f32,
    pub motion: String,
    pub magnetism: bool,
}

impl From<&EffectParameters> for EffectsDto {
    fn from(params: &EffectParameters) -> Self {
        Self {
            influence: params.influence,
            vignette: params.vignette,
            grain: params.grain,
            grain_type: params.grain_type.to_string(),
            blend_mode: params.blend_mode.to_string(),
            animation_speed: params.animation_speed,
            motion: params.motion.to_string(),
            magnetism: params.magnetism,
        }
    }
}

/// Partial update of the session effect parameters. Omitted fields keep their value.
#[derive(Clone, Debug, Default, Deserialize, ToSchema, Validate)]
pub struct EffectsUpdateRequest {
    #[validate(range(min = 0.0, max = 100.0))]
    pub influence: Option<f32>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub vignette: Option<f32>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub grain: Option<f32>,
    /// `noise`, `fibers`, `paper`, `film` or `canvas`.
    pub grain_type: Option<String>,
    /// `normal`, `multiply`, `screen`, `overlay` or `soft-light`.
    pub blend_mode: Option<String>,
    #[validate(range(exclusive_min = 0.0, max = 20.0))]
    pub animation_speed: Option<f32>,
    /// `smooth`, `bouncy` or `linear`.
    pub motion: Option<String>,
    pub magnetism: Option<bool>,
}

/// Global tonal adjustment, also used as the request body of its update.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct AdjustmentDto {
    /// Hue rotation in degrees.
    #[validate(range(min = -360.0, max = 360.0))]
    #[serde(default)]
    pub hue: f32,
    #[validate(range(min = -1.0, max = 1.0))]
    #[serde(default)]
    pub saturation: f32,
    #[validate(range(min = -1.0, max = 1.0))]
    #[serde(default)]
    pub lightness: f32,
}

impl From<AdjustmentDto> for TonalAdjustment {
    fn from(value: AdjustmentDto) -> Self {
        Self {
            hue: value.hue,
            saturation: value.saturation,
            lightness: value.lightness,
        }
    }
}

impl From<TonalAdjustment> for AdjustmentDto {
    fn from(value: TonalAdjustment) -> Self {
        Self {
            hue: value.hue,
            saturation: value.saturation,
            lightness: value.lightness,
        }
    }
}

/// Full projection of a studio session.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub created_at: String,
    pub density: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette_family: Option<String>,
    pub mirror: String,
    /// Stored points; colors do not include the tonal adjustment.
    pub points: Vec<PointDto>,
    pub effects: EffectsDto,
    pub adjustment: AdjustmentDto,
    pub animating: bool,
    pub dragging: bool,
}

impl From<&StudioSession> for SessionResponse {
    fn from(session: &StudioSession) -> Self {
        Self {
            id: session.id,
            created_at: format_timestamp(session.created_at),
            density: session.mesh.density(),
            palette_family: session.palette_family.clone(),
            mirror: session.mirror.to_string(),
            points: point_dtos(session.mesh.points()),
            effects: EffectsDto::from(&session.params),
            adjustment: session.adjustment.into(),
            animating: session.is_animating(),
            dragging: session.drag_active,
        }
    }
}

/// Request to regenerate the mesh at a new density.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DensityRequest {
    #[validate(range(min = 2))]
    pub density: u8,
}

/// Edit of a single point. Omitted fields are left untouched.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct PointUpdateRequest {
    #[validate(range(min = 0.0, max = 100.0))]
    pub x: Option<f32>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub y: Option<f32>,
    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,
    /// A number sets the override; `null` clears it.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<f32>)]
    pub influence: Option<Option<f32>>,
}

/// Response to a point edit.
#[derive(Debug, Serialize, ToSchema)]
pub struct PointUpdateResponse {
    pub point: PointDto,
    /// Points whose color changed through mirror propagation.
    pub mirrored: usize,
}

/// Request to change the symmetry mode.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct MirrorRequest {
    /// `none`, `x`, `y` or `both`.
    pub mode: String,
}

/// Request to scale the mesh about its center.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ScaleRequest {
    pub factor: f32,
}

/// Request to recolor the mesh with a hue harmony.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct HarmonyRequest {
    #[validate(custom(function = "validate_hex_color"))]
    pub base: String,
    /// `analogous`, `triadic` or `split-complementary`.
    pub kind: String,
}

/// Request to replace the point colors with an imported list.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ImportColorsRequest {
    #[validate(length(min = 1), custom(function = "validate_hex_colors"))]
    pub colors: Vec<String>,
}

/// Request to sample point colors from an image.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ImportImageRequest {
    /// PNG, JPEG or GIF bytes, base64 encoded.
    #[validate(length(min = 1))]
    pub image_base64: String,
}

/// Request toggling the drag gesture flag.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DragRequest {
    pub active: bool,
}

/// Latest pointer position; `null` coordinates clear it.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PointerRequest {
    #[validate(range(min = 0.0, max = 100.0))]
    pub x: Option<f32>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub y: Option<f32>,
}

impl PointerRequest {
    pub fn into_pointer(self) -> Option<Pointer> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Pointer { x, y }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn influence_null_differs_from_missing() {
        let cleared: PointUpdateRequest = serde_json::from_str(r#"{"influence": null}"#).unwrap();
        assert_eq!(cleared.influence, Some(None));
        let untouched: PointUpdateRequest = serde_json::from_str(r#"{"x": 12.5}"#).unwrap();
        assert_eq!(untouched.influence, None);
        let set: PointUpdateRequest = serde_json::from_str(r#"{"influence": 40}"#).unwrap();
        assert_eq!(set.influence, Some(Some(40.0)));
    }

    #[test]
    fn point_update_rejects_bad_color_and_position() {
        let request = PointUpdateRequest {
            x: Some(120.0),
            color: Some("#12".into()),
            ..PointUpdateRequest::default()
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("x"));
        assert!(errors.field_errors().contains_key("color"));
    }

    #[test]
    fn effects_update_rejects_zero_speed() {
        let request = EffectsUpdateRequest {
            animation_speed: Some(0.0),
            ..EffectsUpdateRequest::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn pointer_needs_both_coordinates() {
        let request = PointerRequest { x: Some(10.0), y: None };
        assert!(request.into_pointer().is_none());
    }
}
