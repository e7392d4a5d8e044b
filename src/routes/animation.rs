use std::convert::Infallible;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::sse::{Event, Sse},
    routing::{get, post},
};
use axum_valid::Valid;
use futures::Stream;
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::animation::{AnimationStatus, StartAnimationRequest},
    error::AppError,
    services::animation_service,
    state::SharedState,
};

/// Animation control and the SSE frame stream.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions/{id}/animation/start", post(start))
        .route("/sessions/{id}/animation/stop", post(stop))
        .route("/sessions/{id}/animation/frames", get(frames))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/animation/start",
    tag = "animation",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = StartAnimationRequest,
    responses((status = 200, description = "Animation running", body = AnimationStatus))
)]
pub async fn start(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<StartAnimationRequest>>,
) -> Result<Json<AnimationStatus>, AppError> {
    Ok(Json(animation_service::start(&state, id, payload).await?))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/animation/stop",
    tag = "animation",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses((status = 200, description = "Animation stopped", body = AnimationStatus))
)]
pub async fn stop(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnimationStatus>, AppError> {
    Ok(Json(animation_service::stop(&state, id).await?))
}

/// Stream one `frame` event per tick while the animation runs.
#[utoipa::path(
    get,
    path = "/sessions/{id}/animation/frames",
    tag = "animation",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Frame stream", content_type = "text/event-stream", body = String),
        (status = 400, description = "Session is not animating")
    )
)]
pub async fn frames(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let stream = animation_service::frames(state, id).await?;
    info!(session = %id, "new animation stream");
    Ok(stream)
}
