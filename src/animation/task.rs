use std::time::Instant;

use crate::{
    animation::{MotionProfile, Pointer, animate_points},
    mesh::MeshPoint,
};

/// Plain scheduler state of a running animation.
///
/// The frame loop steps it once per tick; stopping the animation is simply
/// dropping the task, after which no further frame is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTask {
    started: Instant,
    speed: f32,
    motion: MotionProfile,
    magnetism: bool,
}

impl AnimationTask {
    pub fn new(started: Instant, speed: f32, motion: MotionProfile, magnetism: bool) -> Self {
        Self {
            started,
            speed,
            motion,
            magnetism,
        }
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn motion(&self) -> MotionProfile {
        self.motion
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn magnetism(&self) -> bool {
        self.magnetism
    }

    /// Points to render at `now`.
    ///
    /// While a drag gesture is active the live stored positions are returned
    /// as-is so the dragged point follows the pointer exactly.
    pub fn frame(
        &self,
        now: Instant,
        points: &[MeshPoint],
        pointer: Option<Pointer>,
        drag_active: bool,
    ) -> Vec<MeshPoint> {
        if drag_active {
            return points.to_vec();
        }
        animate_points(
            points,
            now.saturating_duration_since(self.started),
            self.speed,
            self.motion,
            pointer,
            self.magnetism,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::color::HexColor;

    #[test]
    fn drag_renders_live_positions() {
        let start = Instant::now();
        let task = AnimationTask::new(start, 1.0, MotionProfile::Smooth, false);
        let points = vec![MeshPoint::new(30.0, 30.0, HexColor::WHITE)];
        let later = start + Duration::from_millis(800);

        assert_eq!(task.frame(later, &points, None, true), points);
        assert_ne!(task.frame(later, &points, None, false), points);
    }

    #[test]
    fn frames_depend_only_on_elapsed_time() {
        let start = Instant::now();
        let task = AnimationTask::new(start, 2.0, MotionProfile::Bouncy, false);
        let points = vec![MeshPoint::new(40.0, 60.0, HexColor::BLACK)];
        let at = start + Duration::from_secs(2);
        assert_eq!(task.frame(at, &points, None, false), task.frame(at, &points, None, false));
        // a clock reading before the start counts as zero elapsed time
        let early = task.frame(start, &points, None, false);
        assert_eq!(
            early,
            animate_points(&points, Duration::ZERO, 2.0, MotionProfile::Bouncy, None, false)
        );
    }
}
