use std::time::Instant;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    animation::{AnimationTask, Pointer},
    color::PaletteSet,
    mesh::{MeshPoint, MeshState, MirrorMode, TonalAdjustment, adjust_points},
    render::EffectParameters,
};

/// Authoring state of one studio session.
///
/// The session is the single owner of its mesh: every mutation goes through
/// the lock held by [`crate::state::AppState`], so edits, drags and animation
/// frames are serialized.
#[derive(Debug, Clone)]
pub struct StudioSession {
    /// Identifier handed out to the client.
    pub id: Uuid,
    /// Creation timestamp for auditing/debugging.
    pub created_at: OffsetDateTime,
    /// Palette family the mesh was seeded from, if restricted to one.
    pub palette_family: Option<String>,
    /// Palette supplied by the client in place of the configured one.
    pub custom_palette: Option<PaletteSet>,
    /// Stored point model.
    pub mesh: MeshState,
    pub params: EffectParameters,
    pub mirror: MirrorMode,
    /// Tonal overlay applied when rendering; stored colors stay untouched.
    pub adjustment: TonalAdjustment,
    /// Running animation, if any.
    pub animation: Option<AnimationTask>,
    /// True while the client is dragging a point.
    pub drag_active: bool,
    pub pointer: Option<Pointer>,
}

impl StudioSession {
    pub fn new(mesh: MeshState, params: EffectParameters, palette_family: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
            palette_family,
            custom_palette: None,
            mesh,
            params,
            mirror: MirrorMode::default(),
            adjustment: TonalAdjustment::default(),
            animation: None,
            drag_active: false,
            pointer: None,
        }
    }

    /// Stored points with the tonal adjustment applied, at rest.
    pub fn render_points(&self) -> Vec<MeshPoint> {
        adjust_points(self.mesh.points(), &self.adjustment)
    }

    /// Points for the frame shown at `now`: animated when an animation runs,
    /// otherwise the same as [`StudioSession::render_points`].
    pub fn frame_points(&self, now: Instant) -> Vec<MeshPoint> {
        let points = self.render_points();
        match &self.animation {
            Some(task) => task.frame(now, &points, self.pointer, self.drag_active),
            None => points,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{animation::MotionProfile, config::AppConfig};

    fn session() -> StudioSession {
        let config = AppConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mesh = MeshState::generate(config.palettes(), 3, &mut rng).unwrap();
        StudioSession::new(mesh, config.defaults(), None)
    }

    #[test]
    fn adjustment_only_affects_rendered_colors() {
        let mut session = session();
        let stored: Vec<_> = session.mesh.points().iter().map(|p| p.color).collect();
        session.adjustment = TonalAdjustment {
            hue: 90.0,
            ..TonalAdjustment::default()
        };
        let rendered: Vec<_> = session.render_points().iter().map(|p| p.color).collect();
        let after: Vec<_> = session.mesh.points().iter().map(|p| p.color).collect();
        assert_eq!(stored, after);
        assert_ne!(stored, rendered);
    }

    #[test]
    fn frame_points_follow_animation_and_drag() {
        let mut session = session();
        let start = Instant::now();
        let later = start + Duration::from_millis(900);
        assert_eq!(session.frame_points(later), session.render_points());

        session.animation = Some(AnimationTask::new(start, 1.0, MotionProfile::Smooth, false));
        assert_ne!(session.frame_points(later), session.render_points());

        session.drag_active = true;
        assert_eq!(session.frame_points(later), session.render_points());
    }
}
