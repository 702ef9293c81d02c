use bevy::prelude::*;
use constants::loading::UNKNOWN_PROGRESS_PERCENT;

#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub manifest_loaded: bool,
    pub essential_loaded: bool,
    pub background_started: bool,
    pub loaded_bytes: u64,
    /// `None` while any tracked entry has no recorded size.
    pub total_bytes: Option<u64>,
    last_reported: Option<f32>,
}

impl LoadingProgress {
    pub fn percent(&self) -> f32 {
        progress_percent(self.loaded_bytes, self.total_bytes)
    }

    /// Current percentage if it changed since the last call.
    pub fn take_update(&mut self) -> Option<f32> {
        let percent = self.percent();
        if self.last_reported == Some(percent) {
            return None;
        }
        self.last_reported = Some(percent);
        Some(percent)
    }
}

/// Loaded bytes over total bytes as a percentage in `[0, 100]`.
/// An unknown total reports the midpoint sentinel.
pub fn progress_percent(loaded: u64, total: Option<u64>) -> f32 {
    match total {
        None => UNKNOWN_PROGRESS_PERCENT,
        Some(0) => 100.0,
        Some(total) => ((loaded as f64 / total as f64) * 100.0).clamp(0.0, 100.0) as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_of_known_total() {
        assert_eq!(progress_percent(0, Some(400)), 0.0);
        assert_eq!(progress_percent(100, Some(400)), 25.0);
        assert_eq!(progress_percent(400, Some(400)), 100.0);
        assert_eq!(progress_percent(0, Some(0)), 100.0);
    }

    #[test]
    fn unknown_total_reports_sentinel() {
        assert_eq!(progress_percent(123, None), UNKNOWN_PROGRESS_PERCENT);
    }

    #[test]
    fn updates_only_on_change() {
        let mut progress = LoadingProgress {
            total_bytes: Some(10),
            ..default()
        };
        assert_eq!(progress.take_update(), Some(0.0));
        assert_eq!(progress.take_update(), None);
        progress.loaded_bytes = 5;
        assert_eq!(progress.take_update(), Some(50.0));
    }
}
