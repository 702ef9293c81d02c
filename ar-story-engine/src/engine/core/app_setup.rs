use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
// Crate engine modules
use crate::engine::animation::clips::{ClipMixer, bind_clip_players, drive_clip_players};
use crate::engine::animation::driver::{AnimationDriver, animate_movements, animate_sway};
use crate::engine::assets::asset_registry::AssetRegistry;
use crate::engine::assets::story_manifest::StoryManifest;
use crate::engine::camera::viewport_camera::{camera_controller, spawn_story_camera};
use crate::engine::core::settings::StorySettings;
use crate::engine::core::window_config::create_window_config;
use crate::engine::interaction::pointer::dispatch_selections;
use crate::engine::interaction::registry::InteractionRegistry;
use crate::engine::loading::batch_loader::{StoryLoader, poll_batches};
use crate::engine::loading::manifest_loader::{
    ManifestLoader, load_manifest_system, start_background_loading, start_loading,
};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::buttons::spawn_reusable_buttons;
use crate::engine::scene::disposal::SceneResources;
use crate::engine::scene::text_plate::{Subtitle, SubtitleText, place_plate_labels, sync_subtitle};
use crate::engine::systems::fps_tracking::{
    FpsReporter, FpsText, fps_notification_system, fps_text_update_system,
};
use crate::engine::xr::session::{
    InteractionMode, apply_session_result, apply_viewer_pose, begin_session_negotiation,
    configure_camera_for_mode,
};
// Story
use crate::story::actions::StoryActionQueue;
use crate::story::controller::{StoryController, run_story_actions};
use crate::story::quiz::QuizState;
use crate::story::scheduler::StoryScheduler;
// Web RPC
use crate::rpc::web_rpc::WebRpcPlugin;
// Transitions
use crate::engine::core::app_state::{
    AppState, handle_host_commands, on_enter_ended, on_enter_load_failed, on_enter_ready,
    on_enter_running, transition_to_ready, update_loading_frontend,
};

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::core::app_state::native_start_shortcut;

/// Per-frame order while the story runs: input queues actions, animation
/// advances and reports completions, then the controller executes.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorySet {
    Input,
    Animate,
    Execute,
}

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers StoryManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<StoryManifest>::new(&["json"]))
        .add_plugins(WebRpcPlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ManifestLoader>()
        .init_resource::<StoryLoader>()
        .init_resource::<AssetRegistry>()
        .init_resource::<StorySettings>()
        .init_resource::<InteractionRegistry>()
        .init_resource::<InteractionMode>()
        .init_resource::<AnimationDriver>()
        .init_resource::<ClipMixer>()
        .init_resource::<StoryScheduler>()
        .init_resource::<StoryActionQueue>()
        .init_resource::<StoryController>()
        .init_resource::<QuizState>()
        .init_resource::<SceneResources>()
        .init_resource::<Subtitle>()
        .init_resource::<FpsReporter>();

    app.configure_sets(
        Update,
        (StorySet::Input, StorySet::Animate, StorySet::Execute)
            .chain()
            .run_if(in_state(AppState::Running)),
    );

    // State-based system scheduling
    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (
                // Loading phase systems
                load_manifest_system,
                transition_to_ready,
                update_loading_frontend,
            )
                .chain()
                .after(poll_batches)
                .run_if(in_state(AppState::Loading)),
        )
        // Background batches keep settling after the story has started.
        .add_systems(Update, poll_batches)
        .add_systems(
            OnEnter(AppState::Ready),
            (spawn_reusable_buttons, start_background_loading, on_enter_ready),
        )
        .add_systems(OnEnter(AppState::LoadFailed), on_enter_load_failed)
        .add_systems(OnEnter(AppState::NegotiatingSession), begin_session_negotiation)
        .add_systems(
            Update,
            apply_session_result.run_if(in_state(AppState::NegotiatingSession)),
        )
        .add_systems(OnEnter(AppState::Running), on_enter_running)
        .add_systems(OnEnter(AppState::Ended), on_enter_ended)
        .add_systems(Update, handle_host_commands);

    app.add_systems(Update, dispatch_selections.in_set(StorySet::Input))
        .add_systems(
            Update,
            (
                animate_movements,
                animate_sway,
                (bind_clip_players, drive_clip_players).chain(),
            )
                .in_set(StorySet::Animate),
        )
        .add_systems(Update, run_story_actions.in_set(StorySet::Execute));

    // Presentation systems that run alongside the story.
    let runtime_systems = (
        apply_viewer_pose,
        camera_controller,
        place_plate_labels,
        sync_subtitle,
        fps_notification_system,
    );

    app.add_systems(
        Update,
        runtime_systems
            .after(StorySet::Execute)
            .run_if(in_state(AppState::Running)),
    )
    .add_systems(
        Update,
        configure_camera_for_mode.run_if(resource_changed::<InteractionMode>),
    );

    // Add native-only systems.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system).add_systems(
            Update,
            native_start_shortcut.run_if(in_state(AppState::Ready)),
        );
    }

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
    commands.insert_resource(AmbientLight {
        brightness: 400.0,
        ..default()
    });
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    println!("=== STAY SAFE ONLINE: AR STORY ===");
    spawn_lighting(&mut commands);
    spawn_story_camera(&mut commands);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

/// Native stand-ins for the host page: FPS counter and caption bar.
#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                TextLayout::new_with_justify(JustifyText::Center),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(48.0),
                    left: Val::Percent(10.0),
                    width: Val::Percent(80.0),
                    ..default()
                },
                SubtitleText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
