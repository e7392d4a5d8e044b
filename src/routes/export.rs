use axum::{Json, Router, routing::post};
use axum_valid::Valid;

use crate::{
    dto::{
        color::InterpolateRequest,
        export::{DuotoneRequest, ExportPayload, RampRequest},
    },
    error::AppError,
    services::export_service,
    state::SharedState,
};

/// Session-independent export payloads.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/export/ramp", post(ramp))
        .route("/export/duotone", post(duotone))
        .route("/export/interpolation", post(interpolation))
}

/// Tint-to-shade ramp around one base color.
#[utoipa::path(
    post,
    path = "/export/ramp",
    tag = "export",
    request_body = RampRequest,
    responses((status = 200, description = "Color ramp payload", body = ExportPayload))
)]
pub async fn ramp(
    Valid(Json(payload)): Valid<Json<RampRequest>>,
) -> Result<Json<ExportPayload>, AppError> {
    Ok(Json(export_service::ramp(payload)?))
}

#[utoipa::path(
    post,
    path = "/export/duotone",
    tag = "export",
    request_body = DuotoneRequest,
    responses((status = 200, description = "Duotone payload", body = ExportPayload))
)]
pub async fn duotone(
    Valid(Json(payload)): Valid<Json<DuotoneRequest>>,
) -> Result<Json<ExportPayload>, AppError> {
    Ok(Json(export_service::duotone(payload)?))
}

#[utoipa::path(
    post,
    path = "/export/interpolation",
    tag = "export",
    request_body = InterpolateRequest,
    responses((status = 200, description = "Interpolation payload", body = ExportPayload))
)]
pub async fn interpolation(
    Valid(Json(payload)): Valid<Json<InterpolateRequest>>,
) -> Result<Json<ExportPayload>, AppError> {
    Ok(Json(export_service::interpolation(payload)?))
}
