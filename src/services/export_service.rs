//! Structured export payloads for the host integration.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::info;
use uuid::Uuid;

use crate::{
    color::{self, ColorSpace, Easing},
    dto::{
        color::InterpolateRequest,
        export::{DuotoneRequest, ExportPayload, MeshBundle, MeshExportRequest, RampRequest},
        mesh::point_dtos,
    },
    error::ServiceError,
    render::{GradientDescriptor, RasterSize, rasterize},
    services::{
        color_service::{parse_color, parse_colors, parse_mode},
        mesh_service::session_handle,
    },
    state::SharedState,
};

pub fn ramp(payload: RampRequest) -> Result<ExportPayload, ServiceError> {
    let base = parse_color(&payload.base)?;
    let space: ColorSpace = parse_mode(payload.space.as_deref())?;
    let colors = color::ramp(base, payload.steps, space)?;
    Ok(ExportPayload::ColorRamp {
        colors: colors.iter().map(ToString::to_string).collect(),
    })
}

pub fn duotone(payload: DuotoneRequest) -> Result<ExportPayload, ServiceError> {
    let pair = color::duotone(parse_color(&payload.from)?, parse_color(&payload.to)?);
    Ok(ExportPayload::Duotone {
        from: pair.from.to_string(),
        to: pair.to.to_string(),
        gradient: pair.gradient,
    })
}

pub fn interpolation(payload: InterpolateRequest) -> Result<ExportPayload, ServiceError> {
    let colors = parse_colors(&payload.colors)?;
    let space: ColorSpace = parse_mode(payload.space.as_deref())?;
    let easing: Easing = parse_mode(payload.easing.as_deref())?;
    let samples = color::interpolate(&colors, payload.steps, space, easing)?;
    Ok(ExportPayload::Interpolation {
        colors: samples.iter().map(ToString::to_string).collect(),
        space: space.to_string(),
        easing: easing.to_string(),
    })
}

/// Bundle the session's mesh at rest, optionally with a PNG rendering.
///
/// The points and parameters are snapshotted under the read lock, so edits
/// made while the raster is being drawn do not leak into the export.
pub async fn export_mesh(
    state: &SharedState,
    id: Uuid,
    payload: MeshExportRequest,
) -> Result<ExportPayload, ServiceError> {
    let size = RasterSize::new(payload.width, payload.height, state.config().max_raster_size())?;

    let handle = session_handle(state, id)?;
    let (points, params) = {
        let session = handle.read().await;
        (session.render_points(), session.params)
    };

    let css = GradientDescriptor::build(&points, &params)?.to_style();
    let raster_png = if payload.include_raster {
        let raster_points = points.clone();
        let png = tokio::task::spawn_blocking(move || {
            rasterize(&raster_points, &params, size).and_then(|image| image.encode_png())
        })
        .await
        .map_err(|err| ServiceError::Internal(format!("export task failed: {err}")))??;
        Some(STANDARD.encode(png))
    } else {
        None
    };

    info!(
        session = %id,
        width = size.width(),
        height = size.height(),
        raster = raster_png.is_some(),
        "mesh exported"
    );
    Ok(ExportPayload::Mesh(MeshBundle {
        points: point_dtos(&points),
        width: size.width(),
        height: size.height(),
        influence: params.influence,
        vignette: params.vignette,
        grain: params.grain,
        grain_type: params.grain_type.to_string(),
        blend_mode: params.blend_mode.to_string(),
        css,
        raster_png,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig, dto::mesh::CreateSessionRequest, services::mesh_service::create_session,
        state::AppState,
    };

    #[test]
    fn ramp_runs_from_tint_to_shade() {
        let ExportPayload::ColorRamp { colors } = ramp(RampRequest {
            base: "#3b82f6".into(),
            steps: 5,
            space: None,
        })
        .unwrap() else {
            panic!("expected a color ramp");
        };
        assert_eq!(colors.len(), 5);
        assert_eq!(colors[2], "#3b82f6");
        assert_ne!(colors[0], colors[4]);
    }

    #[test]
    fn duotone_carries_both_colors() {
        let ExportPayload::Duotone { from, to, gradient } = duotone(DuotoneRequest {
            from: "#FF0000".into(),
            to: "#00f".into(),
        })
        .unwrap() else {
            panic!("expected a duotone");
        };
        assert_eq!(from, "#ff0000");
        assert_eq!(to, "#0000ff");
        assert!(gradient.contains("#ff0000 0%") && gradient.contains("#0000ff 100%"));
    }

    #[test]
    fn interpolation_echoes_resolved_modes() {
        let ExportPayload::Interpolation { colors, space, easing } =
            interpolation(InterpolateRequest {
                colors: vec!["#000000".into(), "#ffffff".into()],
                steps: 3,
                space: Some("rgb".into()),
                easing: None,
            })
            .unwrap()
        else {
            panic!("expected an interpolation");
        };
        assert_eq!(colors.len(), 3);
        assert_eq!(space, "rgb");
        assert_eq!(easing, "linear");
    }

    #[tokio::test]
    async fn mesh_export_attaches_raster_on_request() {
        let state = AppState::new(AppConfig::default());
        let session = create_session(
            &state,
            CreateSessionRequest {
                density: Some(2),
                seed: Some(11),
                ..CreateSessionRequest::default()
            },
        )
        .await
        .unwrap();

        let ExportPayload::Mesh(bundle) = export_mesh(
            &state,
            session.id,
            MeshExportRequest {
                width: 20,
                height: 10,
                include_raster: true,
            },
        )
        .await
        .unwrap() else {
            panic!("expected a mesh bundle");
        };
        assert_eq!(bundle.points.len(), 4);
        assert!(bundle.css.starts_with("background: radial-gradient(circle at "));
        assert!(bundle.css.ends_with("background-blend-mode: normal, normal, normal, normal;"));
        let png = STANDARD.decode(bundle.raster_png.unwrap()).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (20, 10));

        let ExportPayload::Mesh(bundle) = export_mesh(
            &state,
            session.id,
            MeshExportRequest {
                width: 20,
                height: 10,
                include_raster: false,
            },
        )
        .await
        .unwrap() else {
            panic!("expected a mesh bundle");
        };
        assert!(bundle.raster_png.is_none());
    }
}
