use bevy::prelude::*;
use constants::animation::{SWAY_AMPLITUDE, SWAY_SPEED, WALK_SPEED};
use constants::timing::{LONG_PAUSE_MS, NEXT_SETTLE_DELAY_MS, SHORT_PAUSE_MS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable story pacing. Defaults come from the `constants` crate; the manifest's
/// optional `settings` block overrides individual fields.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorySettings {
    pub settle_delay_ms: u64,
    pub short_pause_ms: u64,
    pub long_pause_ms: u64,
    pub walk_speed: f32,
    pub sway_amplitude: f32,
    pub sway_speed: f32,
}

impl Default for StorySettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: NEXT_SETTLE_DELAY_MS,
            short_pause_ms: SHORT_PAUSE_MS,
            long_pause_ms: LONG_PAUSE_MS,
            walk_speed: WALK_SPEED,
            sway_amplitude: SWAY_AMPLITUDE,
            sway_speed: SWAY_SPEED,
        }
    }
}

impl StorySettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn short_pause(&self) -> Duration {
        Duration::from_millis(self.short_pause_ms)
    }

    pub fn long_pause(&self) -> Duration {
        Duration::from_millis(self.long_pause_ms)
    }
}
