use crate::engine::camera::viewport_camera::StoryCamera;
use crate::engine::core::app_state::AppState;
use crate::rpc::web_rpc::{HostCommand, WebRpcInterface};
use bevy::prelude::*;
use constants::xr::{OPTIONAL_FEATURES, REQUIRED_FEATURES, SESSION_MODE};

/// How the viewer interacts with the story.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Immersive AR session owned by the host; selects arrive over RPC.
    Immersive,
    /// Fallback: orbit camera and mouse picking.
    #[default]
    Pointer,
}

impl InteractionMode {
    pub fn from_session_result(granted: bool) -> Self {
        if granted { Self::Immersive } else { Self::Pointer }
    }
}

pub fn session_request_params() -> serde_json::Value {
    serde_json::json!({
        "mode": SESSION_MODE,
        "required_features": REQUIRED_FEATURES,
        "optional_features": OPTIONAL_FEATURES,
    })
}

/// Ask the host for an immersive session. Native builds have no host and fall
/// back to pointer mode straight away.
pub fn begin_session_negotiation(
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut mode: ResMut<InteractionMode>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if cfg!(target_arch = "wasm32") {
        info!("Requesting {} session", SESSION_MODE);
        rpc_interface.send_notification("request_session", session_request_params());
    } else {
        info!("No host session available, using pointer mode");
        *mode = InteractionMode::Pointer;
        println!("→ Transitioning to Running state");
        next_state.set(AppState::Running);
    }
}

/// Settle the session negotiation from the host's answer.
pub fn apply_session_result(
    mut host_commands: EventReader<HostCommand>,
    mut mode: ResMut<InteractionMode>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for command in host_commands.read() {
        let HostCommand::SessionResult { granted, reason } = command else {
            continue;
        };
        *mode = InteractionMode::from_session_result(*granted);
        match (granted, reason) {
            (true, _) => info!("✓ Immersive session granted"),
            (false, Some(reason)) => warn!("Immersive session refused ({}), using pointer mode", reason),
            (false, None) => warn!("Immersive session refused, using pointer mode"),
        }
        println!("→ Transitioning to Running state");
        next_state.set(AppState::Running);
    }
}

/// Follow the viewer pose the host reports while immersive.
pub fn apply_viewer_pose(
    mode: Res<InteractionMode>,
    mut host_commands: EventReader<HostCommand>,
    mut camera_query: Query<&mut Transform, With<StoryCamera>>,
) {
    let latest = host_commands
        .read()
        .filter_map(|command| match command {
            HostCommand::ViewerPose(pose) => Some(*pose),
            _ => None,
        })
        .last();
    if *mode != InteractionMode::Immersive {
        return;
    }
    let (Some(pose), Ok(mut transform)) = (latest, camera_query.single_mut()) else {
        return;
    };
    *transform = pose;
}

/// Immersive mode composites over the camera feed, so the clear colour goes
/// transparent.
pub fn configure_camera_for_mode(
    mode: Res<InteractionMode>,
    mut camera_query: Query<&mut Camera, With<StoryCamera>>,
) {
    let Ok(mut camera) = camera_query.single_mut() else {
        return;
    };
    camera.clear_color = match *mode {
        InteractionMode::Immersive => ClearColorConfig::Custom(Color::NONE),
        InteractionMode::Pointer => ClearColorConfig::Default,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusal_falls_back_to_pointer() {
        assert_eq!(InteractionMode::from_session_result(false), InteractionMode::Pointer);
        assert_eq!(InteractionMode::from_session_result(true), InteractionMode::Immersive);
    }

    #[test]
    fn request_lists_features() {
        let params = session_request_params();
        assert_eq!(params["mode"], "immersive-ar");
        assert_eq!(params["required_features"], serde_json::json!(["hit-test"]));
        assert_eq!(
            params["optional_features"],
            serde_json::json!(["dom-overlay", "local-floor"])
        );
    }
}
