//! DTO definitions for the stateless color endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    color::{ColorSpace, HexColor, PaletteSet},
    dto::validation::{validate_hex_color, validate_hex_colors},
};

/// Request to express one color in every supported color space.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ConvertRequest {
    #[validate(custom(function = "validate_hex_color"))]
    pub color: String,
}

/// A color expressed in every supported color space.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConvertResponse {
    /// Canonical lowercase `#rrggbb`.
    pub hex: String,
    pub rgb: [f32; 3],
    /// Hue in degrees, saturation and lightness in `[0, 1]`.
    pub hsl: [f32; 3],
    pub lab: [f32; 3],
    pub lch: [f32; 3],
    pub oklab: [f32; 3],
    pub oklch: [f32; 3],
}

impl From<HexColor> for ConvertResponse {
    fn from(color: HexColor) -> Self {
        Self {
            hex: color.to_string(),
            rgb: ColorSpace::Rgb.decompose(color),
            hsl: ColorSpace::Hsl.decompose(color),
            lab: ColorSpace::Lab.decompose(color),
            lch: ColorSpace::Lch.decompose(color),
            oklab: ColorSpace::Oklab.decompose(color),
            oklch: ColorSpace::Oklch.decompose(color),
        }
    }
}

/// Request to sample a multi-stop gradient.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct InterpolateRequest {
    #[validate(
        length(min = 2, message = "at least two colors are required"),
        custom(function = "validate_hex_colors")
    )]
    pub colors: Vec<String>,
    #[validate(range(min = 2, max = 256))]
    pub steps: usize,
    /// Color space name, `oklab` when omitted.
    #[serde(default)]
    pub space: Option<String>,
    /// Easing name, `linear` when omitted.
    #[serde(default)]
    pub easing: Option<String>,
}

/// Ordered list of hex colors.
#[derive(Debug, Serialize, ToSchema)]
pub struct ColorListResponse {
    pub colors: Vec<String>,
}

impl From<Vec<HexColor>> for ColorListResponse {
    fn from(colors: Vec<HexColor>) -> Self {
        Self {
            colors: colors.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Request to mix two colors perceptually.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct MixRequest {
    #[validate(custom(function = "validate_hex_color"))]
    pub a: String,
    #[validate(custom(function = "validate_hex_color"))]
    pub b: String,
    #[validate(range(min = 0.0, max = 1.0))]
    pub ratio: f32,
}

/// Request for a weighted perceptual centroid.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct MixManyRequest {
    #[validate(length(min = 1), custom(function = "validate_hex_colors"))]
    pub colors: Vec<String>,
    pub weights: Vec<f32>,
}

/// Request to composite one color over another.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct BlendRequest {
    #[validate(custom(function = "validate_hex_color"))]
    pub base: String,
    #[validate(custom(function = "validate_hex_color"))]
    pub overlay: String,
    /// Blend mode name.
    pub mode: String,
    /// Overlay opacity, fully opaque when omitted.
    #[serde(default = "full_opacity")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub opacity: f32,
}

fn full_opacity() -> f32 {
    1.0
}

/// A single hex color.
#[derive(Debug, Serialize, ToSchema)]
pub struct ColorResponse {
    pub color: String,
}

impl From<HexColor> for ColorResponse {
    fn from(color: HexColor) -> Self {
        Self {
            color: color.to_string(),
        }
    }
}

/// One shade of a palette family.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShadeDto {
    pub shade: u16,
    pub value: String,
}

/// A palette family and its ordered shades.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaletteFamilyDto {
    pub name: String,
    pub shades: Vec<ShadeDto>,
}

/// Flatten a palette set into its families, preserving order.
pub fn palette_families(set: &PaletteSet) -> Vec<PaletteFamilyDto> {
    set.families()
        .iter()
        .map(|(name, shades)| PaletteFamilyDto {
            name: name.clone(),
            shades: shades
                .iter()
                .map(|entry| ShadeDto {
                    shade: entry.shade,
                    value: entry.value.to_string(),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_request_validation() {
        let request = InterpolateRequest {
            colors: vec!["#000".into()],
            steps: 1,
            space: None,
            easing: None,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("colors"));
        assert!(fields.contains_key("steps"));
    }

    #[test]
    fn blend_request_defaults_to_opaque() {
        let request: BlendRequest =
            serde_json::from_str(r##"{"base":"#fff","overlay":"#000","mode":"multiply"}"##)
                .unwrap();
        assert_eq!(request.opacity, 1.0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn convert_response_carries_canonical_hex() {
        let response = ConvertResponse::from(HexColor::new(255, 0, 0));
        assert_eq!(response.hex, "#ff0000");
        assert_eq!(response.rgb, [1.0, 0.0, 0.0]);
    }
}
