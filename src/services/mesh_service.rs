//! Session lifecycle and mesh editing.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    color::{BlendMode, HexColor, PaletteSet},
    dto::mesh::{
        AdjustmentDto, CreateSessionRequest, DensityRequest, DragRequest, EffectsUpdateRequest,
        HarmonyRequest, ImportColorsRequest, ImportImageRequest, MirrorRequest, PointDto,
        PointUpdateRequest, PointUpdateResponse, PointerRequest, ScaleRequest, SessionResponse,
    },
    error::{GradientError, ServiceError},
    mesh::{HarmonyKind, MeshState, MirrorMode, PointEdit, sampling::sample_image_colors},
    render::{EffectParameters, GrainType},
    services::color_service::{parse_color, parse_colors},
    state::{SessionHandle, SharedState, StudioSession},
};

/// Grid side length used when a new session does not ask for one.
const DEFAULT_DENSITY: u8 = 4;

/// Resolve a session handle or report it as missing.
pub fn session_handle(state: &SharedState, id: Uuid) -> Result<SessionHandle, ServiceError> {
    state
        .session(id)
        .ok_or_else(|| ServiceError::NotFound(format!("session {id} not found")))
}

/// Open a new session with a freshly generated mesh.
pub async fn create_session(
    state: &SharedState,
    payload: CreateSessionRequest,
) -> Result<SessionResponse, ServiceError> {
    let config = state.config();
    let density = payload
        .density
        .unwrap_or(DEFAULT_DENSITY.min(config.max_density()));
    check_density(state, density)?;

    let palette = palette_for(state, payload.palette.as_ref(), payload.family.as_deref())?;
    let mesh = seed_mesh(&palette, density, payload.seed)?;

    let mut params = config.defaults();
    if let Some(update) = &payload.effects {
        params = apply_effects_update(params, update)?;
    }

    let mut session = StudioSession::new(mesh, params, payload.family);
    session.custom_palette = payload.palette;
    let response = SessionResponse::from(&session);
    state.insert_session(session);
    info!(session = %response.id, density, "session created");
    Ok(response)
}

pub async fn get_session(state: &SharedState, id: Uuid) -> Result<SessionResponse, ServiceError> {
    let handle = session_handle(state, id)?;
    let session = handle.read().await;
    Ok(SessionResponse::from(&*session))
}

/// Close a session. A running frame stream notices on its next tick.
pub async fn delete_session(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    state
        .remove_session(id)
        .ok_or_else(|| ServiceError::NotFound(format!("session {id} not found")))?;
    info!(session = %id, "session closed");
    Ok(())
}

/// Throw away every point and generate a new grid.
pub async fn regenerate(
    state: &SharedState,
    id: Uuid,
    payload: DensityRequest,
) -> Result<SessionResponse, ServiceError> {
    check_density(state, payload.density)?;
    let handle = session_handle(state, id)?;
    let mut session = handle.write().await;

    let palette = palette_for(
        state,
        session.custom_palette.as_ref(),
        session.palette_family.as_deref(),
    )?;
    session.mesh = seed_mesh(&palette, payload.density, None)?;
    debug!(session = %id, density = payload.density, "mesh regenerated");
    Ok(SessionResponse::from(&*session))
}

/// Edit one point, propagating its color to mirror partners.
pub async fn update_point(
    state: &SharedState,
    id: Uuid,
    point_id: Uuid,
    payload: PointUpdateRequest,
) -> Result<PointUpdateResponse, ServiceError> {
    let color = payload.color.as_deref().map(parse_color).transpose()?;
    let edit = PointEdit {
        x: payload.x,
        y: payload.y,
        color,
        influence: payload.influence,
    };

    let tolerance = state.config().mirror_tolerance();
    let handle = session_handle(state, id)?;
    let mut session = handle.write().await;
    let mirror = session.mirror;
    let (point, mirrored) = session
        .mesh
        .edit_point(point_id, edit, mirror, tolerance)
        .ok_or_else(|| ServiceError::NotFound(format!("point {point_id} not found")))?;

    Ok(PointUpdateResponse {
        point: PointDto::from(&point),
        mirrored,
    })
}

pub async fn set_mirror(
    state: &SharedState,
    id: Uuid,
    payload: MirrorRequest,
) -> Result<SessionResponse, ServiceError> {
    let mode: MirrorMode = payload.mode.parse()?;
    let handle = session_handle(state, id)?;
    let mut session = handle.write().await;
    session.mirror = mode;
    Ok(SessionResponse::from(&*session))
}

pub async fn scale(
    state: &SharedState,
    id: Uuid,
    payload: ScaleRequest,
) -> Result<SessionResponse, ServiceError> {
    let handle = session_handle(state, id)?;
    let mut session = handle.write().await;
    session.mesh.scale(payload.factor);
    Ok(SessionResponse::from(&*session))
}

pub async fn apply_harmony(
    state: &SharedState,
    id: Uuid,
    payload: HarmonyRequest,
) -> Result<SessionResponse, ServiceError> {
    let base = parse_color(&payload.base)?;
    let kind: HarmonyKind = payload.kind.parse()?;
    let handle = session_handle(state, id)?;
    let mut session = handle.write().await;
    session.mesh.apply_harmony(base, kind);
    Ok(SessionResponse::from(&*session))
}

pub async fn import_colors(
    state: &SharedState,
    id: Uuid,
    payload: ImportColorsRequest,
) -> Result<SessionResponse, ServiceError> {
    let colors = parse_colors(&payload.colors)?;
    let handle = session_handle(state, id)?;
    let mut session = handle.write().await;
    session.mesh.import_colors(&colors)?;
    Ok(SessionResponse::from(&*session))
}

/// Point ids and positions an image was sampled at.
type SampleLayout = Vec<(Uuid, f32, f32)>;

fn sample_layout(mesh: &MeshState) -> SampleLayout {
    mesh.points().iter().map(|p| (p.id, p.x, p.y)).collect()
}

/// Recolor the mesh with colors sampled at `layout`, provided the points are
/// still the ones that were sampled.
fn apply_sampled_colors(
    mesh: &mut MeshState,
    layout: &SampleLayout,
    colors: &[HexColor],
) -> Result<(), ServiceError> {
    if sample_layout(mesh) != *layout {
        return Err(ServiceError::InvalidState(
            "mesh changed while the image was being sampled".into(),
        ));
    }
    mesh.import_colors(colors)?;
    Ok(())
}

/// Sample point colors from an uploaded image at the current point positions.
///
/// Decoding runs without holding the session lock. If the points are moved,
/// added or regenerated in the meantime the import is rejected and the mesh is
/// left untouched.
pub async fn import_image(
    state: &SharedState,
    id: Uuid,
    payload: ImportImageRequest,
) -> Result<SessionResponse, ServiceError> {
    let bytes = STANDARD
        .decode(payload.image_base64.trim())
        .map_err(|err| ServiceError::InvalidInput(format!("image is not valid base64: {err}")))?;

    let handle = session_handle(state, id)?;
    let layout = sample_layout(&handle.read().await.mesh);
    let positions: Vec<(f32, f32)> = layout.iter().map(|&(_, x, y)| (x, y)).collect();

    let colors = tokio::task::spawn_blocking(move || sample_image_colors(&bytes, &positions))
        .await
        .map_err(|err| ServiceError::Internal(format!("image sampling task failed: {err}")))??;

    let mut session = handle.write().await;
    if let Err(err) = apply_sampled_colors(&mut session.mesh, &layout, &colors) {
        warn!(session = %id, error = %err, "discarding sampled image colors");
        return Err(err);
    }
    debug!(session = %id, count = colors.len(), "colors sampled from image");
    Ok(SessionResponse::from(&*session))
}

pub async fn set_adjustment(
    state: &SharedState,
    id: Uuid,
    payload: AdjustmentDto,
) -> Result<SessionResponse, ServiceError> {
    let handle = session_handle(state, id)?;
    let mut session = handle.write().await;
    session.adjustment = payload.into();
    Ok(SessionResponse::from(&*session))
}

pub async fn update_effects(
    state: &SharedState,
    id: Uuid,
    payload: EffectsUpdateRequest,
) -> Result<SessionResponse, ServiceError> {
    let handle = session_handle(state, id)?;
    let mut session = handle.write().await;
    session.params = apply_effects_update(session.params, &payload)?;
    Ok(SessionResponse::from(&*session))
}

pub async fn set_drag(
    state: &SharedState,
    id: Uuid,
    payload: DragRequest,
) -> Result<SessionResponse, ServiceError> {
    let handle = session_handle(state, id)?;
    let mut session = handle.write().await;
    session.drag_active = payload.active;
    Ok(SessionResponse::from(&*session))
}

pub async fn set_pointer(
    state: &SharedState,
    id: Uuid,
    payload: PointerRequest,
) -> Result<(), ServiceError> {
    let handle = session_handle(state, id)?;
    let mut session = handle.write().await;
    session.pointer = payload.into_pointer();
    Ok(())
}

/// Merge a partial effects update into `params` and check the result.
pub fn apply_effects_update(
    mut params: EffectParameters,
    update: &EffectsUpdateRequest,
) -> Result<EffectParameters, ServiceError> {
    if let Some(influence) = update.influence {
        params.influence = influence;
    }
    if let Some(vignette) = update.vignette {
        params.vignette = vignette;
    }
    if let Some(grain) = update.grain {
        params.grain = grain;
    }
    if let Some(name) = &update.grain_type {
        params.grain_type = name.parse::<GrainType>()?;
    }
    if let Some(name) = &update.blend_mode {
        params.blend_mode = name.parse::<BlendMode>()?;
    }
    if let Some(speed) = update.animation_speed {
        params.animation_speed = speed;
    }
    if let Some(name) = &update.motion {
        params.motion = name.parse()?;
    }
    if let Some(magnetism) = update.magnetism {
        params.magnetism = magnetism;
    }
    params.validate()?;
    Ok(params)
}

fn check_density(state: &SharedState, density: u8) -> Result<(), ServiceError> {
    let max = state.config().max_density();
    if density > max {
        return Err(ServiceError::InvalidInput(format!(
            "density must be at most {max} (got {density})"
        )));
    }
    Ok(())
}

/// Seeding palette: the client's own set when given, else the configured one,
/// optionally narrowed to a single family.
fn palette_for(
    state: &SharedState,
    custom: Option<&PaletteSet>,
    family: Option<&str>,
) -> Result<PaletteSet, ServiceError> {
    let palettes = custom.unwrap_or_else(|| state.config().palettes());
    if palettes.is_empty() {
        return Err(ServiceError::InvalidInput("palette has no colors".into()));
    }
    match family {
        Some(name) => palettes
            .only(name)
            .ok_or_else(|| ServiceError::NotFound(format!("palette family `{name}` not found"))),
        None => Ok(palettes.clone()),
    }
}

fn seed_mesh(palette: &PaletteSet, density: u8, seed: Option<u64>) -> Result<MeshState, GradientError> {
    match seed {
        Some(seed) => MeshState::generate(palette, density, &mut StdRng::seed_from_u64(seed)),
        None => MeshState::generate(palette, density, &mut rand::rng()),
    }
}
