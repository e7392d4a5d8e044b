//! Animation control and the frame stream.

use std::{convert::Infallible, time::Duration};

use async_stream::stream;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt, pin_mut};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    animation::{AnimationTask, MotionProfile},
    dto::{
        animation::{AnimationStatus, FrameEvent, StartAnimationRequest},
        mesh::point_dtos,
    },
    error::ServiceError,
    render::GradientDescriptor,
    services::mesh_service::session_handle,
    state::{SharedState, StudioSession},
};

/// Start (or restart) the session's animation.
pub async fn start(
    state: &SharedState,
    id: Uuid,
    payload: StartAnimationRequest,
) -> Result<AnimationStatus, ServiceError> {
    let handle = session_handle(state, id)?;
    let mut session = handle.write().await;

    let motion = match payload.motion.as_deref() {
        Some(name) => name.parse::<MotionProfile>()?,
        None => session.params.motion,
    };
    let speed = payload.speed.unwrap_or(session.params.animation_speed);
    let magnetism = payload.magnetism.unwrap_or(session.params.magnetism);

    session.animation = Some(AnimationTask::new(
        std::time::Instant::now(),
        speed,
        motion,
        magnetism,
    ));
    info!(session = %id, %motion, speed, magnetism, "animation started");
    Ok(status(&session, state.config().animation_fps()))
}

/// Stop the animation. Running frame streams end on their next tick.
pub async fn stop(state: &SharedState, id: Uuid) -> Result<AnimationStatus, ServiceError> {
    let handle = session_handle(state, id)?;
    let mut session = handle.write().await;
    if session.animation.take().is_some() {
        info!(session = %id, "animation stopped");
    }
    Ok(status(&session, state.config().animation_fps()))
}

/// Server-sent `frame` events for a running animation, closed by an `end`
/// event once the animation stops or the session goes away.
pub async fn frames(
    state: SharedState,
    id: Uuid,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ServiceError> {
    let handle = session_handle(&state, id)?;
    if !handle.read().await.is_animating() {
        return Err(ServiceError::InvalidInput(format!(
            "session {id} is not animating"
        )));
    }

    let fps = state.config().animation_fps();
    let frames = frame_events(state, id, fps);
    let stream = stream! {
        pin_mut!(frames);
        while let Some(frame) = frames.next().await {
            match Event::default().event("frame").json_data(&frame) {
                Ok(event) => yield Ok::<_, Infallible>(event),
                Err(err) => warn!(session = %id, error = %err, "failed to encode frame"),
            }
        }
        info!(session = %id, "animation stream closed");
        yield Ok(Event::default().event("end").data("animation stopped"));
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}

/// One frame per tick at `fps` for as long as the session animates.
pub fn frame_events(state: SharedState, id: Uuid, fps: u32) -> impl Stream<Item = FrameEvent> {
    stream! {
        let mut ticker = interval(Duration::from_secs_f64(1.0 / f64::from(fps.max(1))));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut index = 0u64;

        loop {
            let tick = ticker.tick().await;
            let Some(handle) = state.session(id) else {
                break;
            };
            let session = handle.read().await;
            if !session.is_animating() {
                break;
            }

            let points = session.frame_points(tick.into_std());
            let descriptor = GradientDescriptor::build(&points, &session.params);
            drop(session);

            match descriptor {
                Ok(descriptor) => {
                    yield FrameEvent {
                        index,
                        css: descriptor.to_style(),
                        points: point_dtos(&points),
                    };
                    index += 1;
                }
                Err(err) => warn!(session = %id, error = %err, "skipping unrenderable frame"),
            }
        }
    }
}

fn status(session: &StudioSession, fps: u32) -> AnimationStatus {
    match &session.animation {
        Some(task) => AnimationStatus {
            active: true,
            motion: task.motion().to_string(),
            speed: task.speed(),
            magnetism: task.magnetism(),
            fps,
        },
        None => AnimationStatus {
            active: false,
            motion: session.params.motion.to_string(),
            speed: session.params.animation_speed,
            magnetism: session.params.magnetism,
            fps,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dto::mesh::CreateSessionRequest,
        services::mesh_service::{create_session, delete_session},
        state::AppState,
    };

    async fn setup() -> (SharedState, Uuid) {
        let state = AppState::new(AppConfig::default());
        let session = create_session(
            &state,
            CreateSessionRequest {
                density: Some(2),
                seed: Some(5),
                ..CreateSessionRequest::default()
            },
        )
        .await
        .unwrap();
        (state, session.id)
    }

    #[tokio::test]
    async fn start_then_stop_reports_status() {
        let (state, id) = setup().await;
        let started = start(
            &state,
            id,
            StartAnimationRequest {
                motion: Some("bouncy".into()),
                speed: Some(2.0),
                ..StartAnimationRequest::default()
            },
        )
        .await
        .unwrap();
        assert!(started.active);
        assert_eq!(started.motion, "bouncy");
        assert_eq!(started.speed, 2.0);

        let stopped = stop(&state, id).await.unwrap();
        assert!(!stopped.active);
        assert_eq!(stopped.motion, "smooth");
    }

    #[tokio::test]
    async fn unknown_motion_is_rejected() {
        let (state, id) = setup().await;
        let result = start(
            &state,
            id,
            StartAnimationRequest {
                motion: Some("wobbly".into()),
                ..StartAnimationRequest::default()
            },
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Gradient(_))));
    }

    #[tokio::test]
    async fn stream_requires_running_animation() {
        let (state, id) = setup().await;
        assert!(matches!(
            frames(state.clone(), id).await,
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn frames_stop_with_the_animation() {
        let (state, id) = setup().await;
        start(&state, id, StartAnimationRequest::default())
            .await
            .unwrap();

        let frames = frame_events(state.clone(), id, 60);
        pin_mut!(frames);
        let first = frames.next().await.unwrap();
        let second = frames.next().await.unwrap();
        assert_eq!((first.index, second.index), (0, 1));
        assert_eq!(first.points.len(), 4);
        assert!(first.css.contains("radial-gradient("));

        stop(&state, id).await.unwrap();
        assert!(frames.next().await.is_none());
    }

    #[tokio::test]
    async fn frames_end_when_session_closes() {
        let (state, id) = setup().await;
        start(&state, id, StartAnimationRequest::default())
            .await
            .unwrap();
        let frames = frame_events(state.clone(), id, 60);
        pin_mut!(frames);
        assert!(frames.next().await.is_some());

        delete_session(&state, id).await.unwrap();
        assert!(frames.next().await.is_none());
    }
}
