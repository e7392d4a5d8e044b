use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, patch, post, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        export::{ExportPayload, MeshExportRequest},
        mesh::{
            AdjustmentDto, CreateSessionRequest, DensityRequest, DragRequest,
            EffectsUpdateRequest, HarmonyRequest, ImportColorsRequest, ImportImageRequest,
            MirrorRequest, PointUpdateRequest, PointUpdateResponse, PointerRequest, ScaleRequest,
            SessionResponse,
        },
        render::{DescriptorResponse, PreviewQuery},
    },
    error::AppError,
    services::{export_service, mesh_service, render_service},
    state::SharedState,
};

/// Session lifecycle, mesh editing and rendering routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/sessions/{id}/density", post(regenerate))
        .route("/sessions/{id}/points/{point_id}", patch(update_point))
        .route("/sessions/{id}/mirror", put(set_mirror))
        .route("/sessions/{id}/scale", post(scale))
        .route("/sessions/{id}/harmony", post(harmony))
        .route("/sessions/{id}/import", post(import_colors))
        .route("/sessions/{id}/import/image", post(import_image))
        .route("/sessions/{id}/adjustment", put(set_adjustment))
        .route("/sessions/{id}/effects", put(update_effects))
        .route("/sessions/{id}/drag", put(set_drag))
        .route("/sessions/{id}/pointer", put(set_pointer))
        .route("/sessions/{id}/descriptor", get(descriptor))
        .route("/sessions/{id}/preview.png", get(preview))
        .route("/sessions/{id}/export", post(export_mesh))
}

/// Open a studio session with a freshly generated mesh.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = SessionResponse),
        (status = 404, description = "Unknown palette family")
    )
)]
pub async fn create_session(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateSessionRequest>>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let session = mesh_service::create_session(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    get,
    path = "/sessions/{id}",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Session state", body = SessionResponse),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(mesh_service::get_session(&state, id).await?))
}

/// Close a session and end its frame stream.
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 204, description = "Session closed"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn delete_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    mesh_service::delete_session(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace every point with a new grid of the given density.
#[utoipa::path(
    post,
    path = "/sessions/{id}/density",
    tag = "mesh",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = DensityRequest,
    responses(
        (status = 200, description = "Mesh regenerated", body = SessionResponse),
        (status = 400, description = "Density out of range")
    )
)]
pub async fn regenerate(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<DensityRequest>>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(mesh_service::regenerate(&state, id, payload).await?))
}

/// Move, recolor or resize one point.
#[utoipa::path(
    patch,
    path = "/sessions/{id}/points/{point_id}",
    tag = "mesh",
    params(
        ("id" = Uuid, Path, description = "Session identifier"),
        ("point_id" = Uuid, Path, description = "Point identifier")
    ),
    request_body = PointUpdateRequest,
    responses(
        (status = 200, description = "Point updated", body = PointUpdateResponse),
        (status = 404, description = "Unknown session or point")
    )
)]
pub async fn update_point(
    State(state): State<SharedState>,
    Path((id, point_id)): Path<(Uuid, Uuid)>,
    Valid(Json(payload)): Valid<Json<PointUpdateRequest>>,
) -> Result<Json<PointUpdateResponse>, AppError> {
    Ok(Json(
        mesh_service::update_point(&state, id, point_id, payload).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/sessions/{id}/mirror",
    tag = "mesh",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = MirrorRequest,
    responses((status = 200, description = "Mirror mode set", body = SessionResponse))
)]
pub async fn set_mirror(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<MirrorRequest>>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(mesh_service::set_mirror(&state, id, payload).await?))
}

/// Scale the points about the canvas center.
#[utoipa::path(
    post,
    path = "/sessions/{id}/scale",
    tag = "mesh",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = ScaleRequest,
    responses((status = 200, description = "Mesh scaled", body = SessionResponse))
)]
pub async fn scale(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<ScaleRequest>>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(mesh_service::scale(&state, id, payload).await?))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/harmony",
    tag = "mesh",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = HarmonyRequest,
    responses((status = 200, description = "Mesh recolored", body = SessionResponse))
)]
pub async fn harmony(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<HarmonyRequest>>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(mesh_service::apply_harmony(&state, id, payload).await?))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/import",
    tag = "mesh",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = ImportColorsRequest,
    responses((status = 200, description = "Colors imported", body = SessionResponse))
)]
pub async fn import_colors(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<ImportColorsRequest>>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(mesh_service::import_colors(&state, id, payload).await?))
}

/// Sample point colors from an uploaded image.
#[utoipa::path(
    post,
    path = "/sessions/{id}/import/image",
    tag = "mesh",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = ImportImageRequest,
    responses(
        (status = 200, description = "Colors sampled", body = SessionResponse),
        (status = 400, description = "Undecodable image"),
        (status = 409, description = "Points moved or were regenerated while the image was sampled")
    )
)]
pub async fn import_image(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<ImportImageRequest>>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(mesh_service::import_image(&state, id, payload).await?))
}

#[utoipa::path(
    put,
    path = "/sessions/{id}/adjustment",
    tag = "mesh",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = AdjustmentDto,
    responses((status = 200, description = "Adjustment set", body = SessionResponse))
)]
pub async fn set_adjustment(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<AdjustmentDto>>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(mesh_service::set_adjustment(&state, id, payload).await?))
}

#[utoipa::path(
    put,
    path = "/sessions/{id}/effects",
    tag = "mesh",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = EffectsUpdateRequest,
    responses(
        (status = 200, description = "Effects updated", body = SessionResponse),
        (status = 422, description = "Unknown grain type, blend mode or motion")
    )
)]
pub async fn update_effects(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<EffectsUpdateRequest>>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(mesh_service::update_effects(&state, id, payload).await?))
}

/// Mark a drag gesture as started or finished.
#[utoipa::path(
    put,
    path = "/sessions/{id}/drag",
    tag = "mesh",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = DragRequest,
    responses((status = 200, description = "Drag flag set", body = SessionResponse))
)]
pub async fn set_drag(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<DragRequest>>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(mesh_service::set_drag(&state, id, payload).await?))
}

/// Record the pointer position used by magnetism.
#[utoipa::path(
    put,
    path = "/sessions/{id}/pointer",
    tag = "mesh",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = PointerRequest,
    responses((status = 204, description = "Pointer recorded"))
)]
pub async fn set_pointer(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<PointerRequest>>,
) -> Result<StatusCode, AppError> {
    mesh_service::set_pointer(&state, id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Layered CSS descriptor of the frame shown right now.
#[utoipa::path(
    get,
    path = "/sessions/{id}/descriptor",
    tag = "render",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses((status = 200, description = "Gradient descriptor", body = DescriptorResponse))
)]
pub async fn descriptor(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DescriptorResponse>, AppError> {
    Ok(Json(render_service::descriptor(&state, id).await?))
}

/// PNG preview of the current frame.
#[utoipa::path(
    get,
    path = "/sessions/{id}/preview.png",
    tag = "render",
    params(("id" = Uuid, Path, description = "Session identifier"), PreviewQuery),
    responses(
        (status = 200, description = "PNG image", content_type = "image/png", body = Vec<u8>),
        (status = 400, description = "Size outside the configured limit")
    )
)]
pub async fn preview(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PreviewQuery>,
) -> Result<impl IntoResponse, AppError> {
    let png = render_service::preview_png(&state, id, query).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// Export the session mesh, optionally with a rendered PNG.
#[utoipa::path(
    post,
    path = "/sessions/{id}/export",
    tag = "export",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = MeshExportRequest,
    responses((status = 200, description = "Mesh export payload", body = ExportPayload))
)]
pub async fn export_mesh(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<MeshExportRequest>>,
) -> Result<Json<ExportPayload>, AppError> {
    Ok(Json(export_service::export_mesh(&state, id, payload).await?))
}
