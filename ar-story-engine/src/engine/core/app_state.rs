use crate::engine::loading::progress::LoadingProgress;
use crate::error::StoryError;
use crate::rpc::dom::Dom;
use crate::rpc::web_rpc::{HostCommand, WebRpcInterface};
use crate::story::actions::{StoryAction, StoryActionQueue};
use crate::story::scene_id::SceneId;
use bevy::prelude::*;
use constants::dom::{
    AR_VIEW, END_PAGE, LANDING_PAGE, LOADING_OVERLAY, LOADING_TEXT, RESTART_BUTTON,
    START_BUTTON, START_LABEL_LOADING, START_LABEL_READY,
};

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    /// An essential asset or the manifest failed; the experience cannot start.
    LoadFailed,
    /// Essential assets loaded, waiting for the start button.
    Ready,
    NegotiatingSession,
    Running,
    Ended,
}

/// Why startup failed, shown to the user on entering `LoadFailed`.
#[derive(Resource, Debug, Clone)]
pub struct StartupFailure(pub StoryError);

pub fn transition_to_ready(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.essential_loaded {
        println!("→ Transitioning to Ready state");
        next_state.set(AppState::Ready);
    }
}

pub fn update_loading_frontend(
    mut loading_progress: ResMut<LoadingProgress>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let Some(percent) = loading_progress.take_update() else {
        return;
    };
    rpc_interface.send_notification(
        "loading_progress",
        serde_json::json!({ "percent": percent }),
    );
    Dom::new(&mut rpc_interface).set_text(LOADING_TEXT, &format!("Loading… {percent:.0}%"));
}

pub fn on_enter_ready(mut rpc_interface: ResMut<WebRpcInterface>) {
    Dom::new(&mut rpc_interface)
        .hide(LOADING_OVERLAY)
        .set_text(START_BUTTON, START_LABEL_READY);
    info!("✓ Essential assets loaded, press start");
}

pub fn on_enter_load_failed(
    failure: Option<Res<StartupFailure>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let message = match failure {
        Some(failure) => failure.0.to_string(),
        None => "failed to load the experience".to_string(),
    };
    Dom::new(&mut rpc_interface)
        .set_text(START_BUTTON, START_LABEL_LOADING)
        .alert(&format!("Could not load the experience: {message}"));
}

pub fn on_enter_running(
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut queue: ResMut<StoryActionQueue>,
) {
    Dom::new(&mut rpc_interface).hide(LANDING_PAGE).show(AR_VIEW);
    queue.push(StoryAction::EnterScene(SceneId::Intro));
}

pub fn on_enter_ended(mut rpc_interface: ResMut<WebRpcInterface>) {
    Dom::new(&mut rpc_interface)
        .hide(AR_VIEW)
        .show(END_PAGE)
        .show(RESTART_BUTTON);
}

/// React to host commands that depend on the app state.
pub fn handle_host_commands(
    mut host_commands: EventReader<HostCommand>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut queue: ResMut<StoryActionQueue>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for command in host_commands.read() {
        match (command, state.get()) {
            (HostCommand::StartExperience, AppState::Ready) => {
                println!("→ Transitioning to NegotiatingSession state");
                next_state.set(AppState::NegotiatingSession);
            }
            (HostCommand::StartExperience, other) => {
                warn!("Start ignored while {:?}", other);
            }
            (HostCommand::JumpToScene(scene), AppState::Running) => {
                queue.push(StoryAction::GoTo(*scene));
            }
            (HostCommand::JumpToScene(scene), other) => {
                warn!("Jump to {} ignored while {:?}", scene, other);
            }
            (HostCommand::RestartExperience, _) => {
                info!("Requesting experience reload");
                rpc_interface.send_notification("reload_experience", serde_json::json!({}));
            }
            _ => {}
        }
    }
}

/// Enter starts the experience on native builds, where there is no start button.
#[cfg(not(target_arch = "wasm32"))]
pub fn native_start_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut host_commands: EventWriter<HostCommand>,
) {
    if keyboard.just_pressed(KeyCode::Enter) {
        host_commands.write(HostCommand::StartExperience);
    }
}
