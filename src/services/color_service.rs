use std::str::FromStr;

use crate::{
    color::{self, BlendMode, ColorSpace, Easing, HexColor},
    dto::color::{
        BlendRequest, ColorListResponse, ColorResponse, ConvertRequest, ConvertResponse,
        InterpolateRequest, MixManyRequest, MixRequest, PaletteFamilyDto, palette_families,
    },
    error::{GradientError, ServiceError},
    state::SharedState,
};

/// Parse a hex color supplied by a client.
pub fn parse_color(value: &str) -> Result<HexColor, ServiceError> {
    Ok(HexColor::parse(value)?)
}

pub fn parse_colors(values: &[String]) -> Result<Vec<HexColor>, ServiceError> {
    values.iter().map(|value| parse_color(value)).collect()
}

/// Parse an optional mode name, falling back to the mode's default.
pub fn parse_mode<T>(value: Option<&str>) -> Result<T, ServiceError>
where
    T: FromStr<Err = GradientError> + Default,
{
    match value {
        Some(name) => Ok(name.parse()?),
        None => Ok(T::default()),
    }
}

/// Express a color in every supported space.
pub fn convert(payload: ConvertRequest) -> Result<ConvertResponse, ServiceError> {
    Ok(parse_color(&payload.color)?.into())
}

/// Sample `steps` colors across the requested stops.
pub fn interpolate(payload: InterpolateRequest) -> Result<ColorListResponse, ServiceError> {
    let colors = parse_colors(&payload.colors)?;
    let space: ColorSpace = parse_mode(payload.space.as_deref())?;
    let easing: Easing = parse_mode(payload.easing.as_deref())?;
    Ok(color::interpolate(&colors, payload.steps, space, easing)?.into())
}

pub fn mix(payload: MixRequest) -> Result<ColorResponse, ServiceError> {
    let a = parse_color(&payload.a)?;
    let b = parse_color(&payload.b)?;
    Ok(color::mix(a, b, payload.ratio)?.into())
}

pub fn mix_many(payload: MixManyRequest) -> Result<ColorResponse, ServiceError> {
    let colors = parse_colors(&payload.colors)?;
    Ok(color::mix_many(&colors, &payload.weights)?.into())
}

pub fn blend(payload: BlendRequest) -> Result<ColorResponse, ServiceError> {
    let base = parse_color(&payload.base)?;
    let overlay = parse_color(&payload.overlay)?;
    let mode: BlendMode = payload.mode.parse()?;
    Ok(color::blend(base, overlay, mode, payload.opacity)?.into())
}

/// Palette families configured on this server.
pub fn palettes(state: &SharedState) -> Vec<PaletteFamilyDto> {
    palette_families(state.config().palettes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_defaults_to_oklab_linear() {
        let response = interpolate(InterpolateRequest {
            colors: vec!["#000000".into(), "#ffffff".into()],
            steps: 4,
            space: None,
            easing: None,
        })
        .unwrap();
        assert_eq!(response.colors.len(), 4);
        assert_eq!(response.colors[0], "#000000");
        assert_eq!(response.colors[3], "#ffffff");
    }

    #[test]
    fn unknown_space_is_unsupported() {
        let err = interpolate(InterpolateRequest {
            colors: vec!["#000".into(), "#fff".into()],
            steps: 3,
            space: Some("cmyk".into()),
            easing: None,
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Gradient(GradientError::UnsupportedMode { .. })
        ));
    }

    #[test]
    fn blend_parses_mode_names() {
        let response = blend(BlendRequest {
            base: "#ffffff".into(),
            overlay: "#000000".into(),
            mode: "screen".into(),
            opacity: 1.0,
        })
        .unwrap();
        assert_eq!(response.color, "#ffffff");

        let err = blend(BlendRequest {
            base: "#ffffff".into(),
            overlay: "#000000".into(),
            mode: "dodge".into(),
            opacity: 1.0,
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Gradient(GradientError::UnsupportedMode { .. })
        ));
    }

    #[test]
    fn malformed_color_is_reported() {
        assert!(matches!(
            parse_color("#abcd"),
            Err(ServiceError::Gradient(GradientError::InvalidColorFormat(_)))
        ));
    }
}
