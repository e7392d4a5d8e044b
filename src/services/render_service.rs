//! Vector descriptors and raster previews of a session's current frame.

use std::time::Instant;

use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::render::{DescriptorResponse, PreviewQuery},
    error::{GradientError, ServiceError},
    render::{GradientDescriptor, RasterImage, RasterSize, rasterize},
    services::mesh_service::session_handle,
    state::SharedState,
};

/// Edge length of a preview when the client does not pick one.
const DEFAULT_PREVIEW_SIZE: u32 = 512;

/// Describe the frame shown right now, animated if an animation is running.
pub async fn descriptor(state: &SharedState, id: Uuid) -> Result<DescriptorResponse, ServiceError> {
    let handle = session_handle(state, id)?;
    let session = handle.read().await;
    let points = session.frame_points(Instant::now());
    let descriptor = GradientDescriptor::build(&points, &session.params)?;
    Ok(DescriptorResponse::new(&descriptor, session.is_animating()))
}

/// Render the current frame to PNG.
///
/// Once the session and size are known, rendering failures produce a blank
/// white image of the requested size rather than an error.
pub async fn preview_png(
    state: &SharedState,
    id: Uuid,
    query: PreviewQuery,
) -> Result<Vec<u8>, ServiceError> {
    let size = RasterSize::new(
        query.width.unwrap_or(DEFAULT_PREVIEW_SIZE),
        query.height.unwrap_or(DEFAULT_PREVIEW_SIZE),
        state.config().max_raster_size(),
    )?;

    let handle = session_handle(state, id)?;
    let (points, params) = {
        let session = handle.read().await;
        (session.frame_points(Instant::now()), session.params)
    };

    let rendered = tokio::task::spawn_blocking(move || {
        rasterize(&points, &params, size).and_then(|image| image.encode_png())
    })
    .await
    .map_err(|err| GradientError::Render(format!("preview task failed: {err}")))
    .and_then(|result| result);

    match rendered {
        Ok(png) => Ok(png),
        Err(err) => {
            warn!(session = %id, error = %err, "preview rendering failed; serving blank image");
            Ok(RasterImage::blank(size).encode_png()?)
        }
    }
}
