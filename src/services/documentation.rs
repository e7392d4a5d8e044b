use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Prism Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::colors::palettes,
        crate::routes::colors::convert,
        crate::routes::colors::interpolate,
        crate::routes::colors::mix,
        crate::routes::colors::mix_many,
        crate::routes::colors::blend,
        crate::routes::export::ramp,
        crate::routes::export::duotone,
        crate::routes::export::interpolation,
        crate::routes::sessions::create_session,
        crate::routes::sessions::get_session,
        crate::routes::sessions::delete_session,
        crate::routes::sessions::regenerate,
        crate::routes::sessions::update_point,
        crate::routes::sessions::set_mirror,
        crate::routes::sessions::scale,
        crate::routes::sessions::harmony,
        crate::routes::sessions::import_colors,
        crate::routes::sessions::import_image,
        crate::routes::sessions::set_adjustment,
        crate::routes::sessions::update_effects,
        crate::routes::sessions::set_drag,
        crate::routes::sessions::set_pointer,
        crate::routes::sessions::descriptor,
        crate::routes::sessions::preview,
        crate::routes::sessions::export_mesh,
        crate::routes::animation::start,
        crate::routes::animation::stop,
        crate::routes::animation::frames,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::color::ConvertRequest,
            crate::dto::color::ConvertResponse,
            crate::dto::color::InterpolateRequest,
            crate::dto::color::ColorListResponse,
            crate::dto::color::MixRequest,
            crate::dto::color::MixManyRequest,
            crate::dto::color::BlendRequest,
            crate::dto::color::ColorResponse,
            crate::dto::color::ShadeDto,
            crate::dto::color::PaletteFamilyDto,
            crate::dto::mesh::CreateSessionRequest,
            crate::dto::mesh::PointDto,
            crate::dto::mesh::EffectsDto,
            crate::dto::mesh::EffectsUpdateRequest,
            crate::dto::mesh::AdjustmentDto,
            crate::dto::mesh::SessionResponse,
            crate::dto::mesh::DensityRequest,
            crate::dto::mesh::PointUpdateRequest,
            crate::dto::mesh::PointUpdateResponse,
            crate::dto::mesh::MirrorRequest,
            crate::dto::mesh::ScaleRequest,
            crate::dto::mesh::HarmonyRequest,
            crate::dto::mesh::ImportColorsRequest,
            crate::dto::mesh::ImportImageRequest,
            crate::dto::mesh::DragRequest,
            crate::dto::mesh::PointerRequest,
            crate::dto::render::LayerDto,
            crate::dto::render::DescriptorResponse,
            crate::dto::export::RampRequest,
            crate::dto::export::DuotoneRequest,
            crate::dto::export::MeshExportRequest,
            crate::dto::export::MeshBundle,
            crate::dto::export::ExportPayload,
            crate::dto::animation::StartAnimationRequest,
            crate::dto::animation::AnimationStatus,
            crate::dto::animation::FrameEvent,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "colors", description = "Stateless color conversion and mixing"),
        (name = "export", description = "Export payloads for the host integration"),
        (name = "sessions", description = "Studio session lifecycle"),
        (name = "mesh", description = "Mesh point editing"),
        (name = "render", description = "Vector descriptors and raster previews"),
        (name = "animation", description = "Animation control and frame stream"),
    )
)]
pub struct ApiDoc;
