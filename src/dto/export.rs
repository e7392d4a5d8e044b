//! Export payloads handed to the host integration.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::{mesh::PointDto, validation::validate_hex_color};

/// Request for a tint-to-shade ramp around one base color.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RampRequest {
    #[validate(custom(function = "validate_hex_color"))]
    pub base: String,
    #[validate(range(min = 3, max = 64))]
    pub steps: usize,
    /// Color space name, `oklab` when omitted.
    #[serde(default)]
    pub space: Option<String>,
}

/// Request for a duotone pair.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DuotoneRequest {
    #[validate(custom(function = "validate_hex_color"))]
    pub from: String,
    #[validate(custom(function = "validate_hex_color"))]
    pub to: String,
}

/// Request to export a session's mesh.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct MeshExportRequest {
    #[validate(range(min = 1))]
    pub width: u32,
    #[validate(range(min = 1))]
    pub height: u32,
    /// Attach a base64 PNG rendering of the mesh.
    #[serde(default)]
    pub include_raster: bool,
}

/// Mesh descriptor bundle with the parameters it was rendered with.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeshBundle {
    pub points: Vec<PointDto>,
    pub width: u32,
    pub height: u32,
    pub influence: f32,
    pub vignette: f32,
    pub grain: f32,
    pub grain_type: String,
    pub blend_mode: String,
    /// CSS declarations (`background` and `background-blend-mode`) reproducing the mesh.
    pub css: String,
    /// Base64 PNG, present when a raster was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raster_png: Option<String>,
}

/// Structured export message, tagged by `kind`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportPayload {
    ColorRamp {
        colors: Vec<String>,
    },
    Duotone {
        from: String,
        to: String,
        gradient: String,
    },
    Interpolation {
        colors: Vec<String>,
        space: String,
        easing: String,
    },
    Mesh(MeshBundle),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_tagged_by_kind() {
        let payload = ExportPayload::Duotone {
            from: "#000000".into(),
            to: "#ffffff".into(),
            gradient: "linear-gradient(135deg, #000000 0%, #ffffff 100%)".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "duotone");
        assert_eq!(json["from"], "#000000");
    }

    #[test]
    fn mesh_bundle_omits_missing_raster() {
        let payload = ExportPayload::Mesh(MeshBundle {
            points: Vec::new(),
            width: 10,
            height: 10,
            influence: 60.0,
            vignette: 0.0,
            grain: 0.0,
            grain_type: "noise".into(),
            blend_mode: "normal".into(),
            css: String::new(),
            raster_png: None,
        });
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "mesh");
        assert!(json.get("raster_png").is_none());
    }
}
