use crate::rpc::web_rpc::WebRpcInterface;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use constants::timing::FPS_NOTIFY_INTERVAL_SECS;

#[derive(Component)]
pub struct FpsText;

/// Paces `fps_update` notifications.
#[derive(Resource)]
pub struct FpsReporter {
    timer: Timer,
}

impl Default for FpsReporter {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(FPS_NOTIFY_INTERVAL_SECS, TimerMode::Repeating),
        }
    }
}

pub fn smoothed_fps(diagnostics: &DiagnosticsStore) -> Option<f64> {
    diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
}

pub fn fps_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut reporter: ResMut<FpsReporter>,
    diagnostics: Res<DiagnosticsStore>,
    time: Res<Time>,
) {
    if !reporter.timer.tick(time.delta()).just_finished() {
        return;
    }
    if let Some(value) = smoothed_fps(&diagnostics) {
        rpc_interface.send_notification("fps_update", serde_json::json!({ "fps": value as f32 }));
    }
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    let Some(value) = smoothed_fps(&diagnostics) else {
        return;
    };
    for mut text in &mut query {
        text.0 = format!("FPS: {value:.1}");
    }
}
