use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::color::{
        BlendRequest, ColorListResponse, ColorResponse, ConvertRequest, ConvertResponse,
        InterpolateRequest, MixManyRequest, MixRequest, PaletteFamilyDto,
    },
    error::AppError,
    services::color_service,
    state::SharedState,
};

/// Stateless color math and the configured palettes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/palettes", get(palettes))
        .route("/colors/convert", post(convert))
        .route("/colors/interpolate", post(interpolate))
        .route("/colors/mix", post(mix))
        .route("/colors/mix-many", post(mix_many))
        .route("/colors/blend", post(blend))
}

/// List the palette families new sessions can be seeded from.
#[utoipa::path(
    get,
    path = "/palettes",
    tag = "colors",
    responses((status = 200, description = "Configured palette families", body = [PaletteFamilyDto]))
)]
pub async fn palettes(State(state): State<SharedState>) -> Json<Vec<PaletteFamilyDto>> {
    Json(color_service::palettes(&state))
}

/// Express a color in every supported color space.
#[utoipa::path(
    post,
    path = "/colors/convert",
    tag = "colors",
    request_body = ConvertRequest,
    responses(
        (status = 200, description = "Color in every space", body = ConvertResponse),
        (status = 400, description = "Malformed color")
    )
)]
pub async fn convert(
    Valid(Json(payload)): Valid<Json<ConvertRequest>>,
) -> Result<Json<ConvertResponse>, AppError> {
    Ok(Json(color_service::convert(payload)?))
}

#[utoipa::path(
    post,
    path = "/colors/interpolate",
    tag = "colors",
    request_body = InterpolateRequest,
    responses(
        (status = 200, description = "Sampled gradient", body = ColorListResponse),
        (status = 422, description = "Unknown color space or easing")
    )
)]
pub async fn interpolate(
    Valid(Json(payload)): Valid<Json<InterpolateRequest>>,
) -> Result<Json<ColorListResponse>, AppError> {
    Ok(Json(color_service::interpolate(payload)?))
}

#[utoipa::path(
    post,
    path = "/colors/mix",
    tag = "colors",
    request_body = MixRequest,
    responses((status = 200, description = "Perceptual mix", body = ColorResponse))
)]
pub async fn mix(
    Valid(Json(payload)): Valid<Json<MixRequest>>,
) -> Result<Json<ColorResponse>, AppError> {
    Ok(Json(color_service::mix(payload)?))
}

#[utoipa::path(
    post,
    path = "/colors/mix-many",
    tag = "colors",
    request_body = MixManyRequest,
    responses((status = 200, description = "Weighted perceptual mix", body = ColorResponse))
)]
pub async fn mix_many(
    Valid(Json(payload)): Valid<Json<MixManyRequest>>,
) -> Result<Json<ColorResponse>, AppError> {
    Ok(Json(color_service::mix_many(payload)?))
}

#[utoipa::path(
    post,
    path = "/colors/blend",
    tag = "colors",
    request_body = BlendRequest,
    responses(
        (status = 200, description = "Composited color", body = ColorResponse),
        (status = 422, description = "Unknown blend mode")
    )
)]
pub async fn blend(
    Valid(Json(payload)): Valid<Json<BlendRequest>>,
) -> Result<Json<ColorResponse>, AppError> {
    Ok(Json(color_service::blend(payload)?))
}
