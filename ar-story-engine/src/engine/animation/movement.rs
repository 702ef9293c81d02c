use crate::story::actions::StoryAction;
use bevy::prelude::*;
use std::time::Duration;

/// Cubic ease-in-out over `[0, 1]`.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Where a movement stands after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementStep {
    Continue(Vec3),
    /// Exactly at the target; the movement is done.
    Finished(Vec3),
}

/// Eased straight-line move of one model at a fixed speed.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectedMovement {
    pub from: Vec3,
    pub to: Vec3,
    pub started: Duration,
    pub duration: Duration,
    pub on_complete: Option<StoryAction>,
}

impl DirectedMovement {
    /// A zero distance or non-positive speed gives a zero duration, which
    /// finishes on the first tick.
    pub fn new(
        from: Vec3,
        to: Vec3,
        speed: f32,
        started: Duration,
        on_complete: Option<StoryAction>,
    ) -> Self {
        let distance = from.distance(to);
        let duration = if speed > 0.0 && distance > 0.0 {
            Duration::from_secs_f32(distance / speed)
        } else {
            Duration::ZERO
        };
        Self {
            from,
            to,
            started,
            duration,
            on_complete,
        }
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: Duration) -> MovementStep {
        let progress = self.progress(now);
        if progress >= 1.0 {
            MovementStep::Finished(self.to)
        } else {
            MovementStep::Continue(self.from.lerp(self.to, ease_in_out_cubic(progress)))
        }
    }
}
