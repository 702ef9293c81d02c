use crate::engine::assets::story_manifest::StoryManifest;
use crate::engine::core::app_state::{AppState, StartupFailure};
use crate::engine::loading::batch_loader::StoryLoader;
use crate::engine::loading::progress::LoadingProgress;
use crate::error::StoryError;
use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::loading::MANIFEST_PATH;

#[derive(Resource, Default)]
pub struct ManifestLoader {
    handle: Option<Handle<StoryManifest>>,
}

// Start the loading process
pub fn start_loading(mut manifest_loader: ResMut<ManifestLoader>, asset_server: Res<AssetServer>) {
    info!("Loading story manifest from: {}", MANIFEST_PATH);
    manifest_loader.handle = Some(asset_server.load(MANIFEST_PATH));
}

// Install the manifest and start the essential batches once it is parsed
pub fn load_manifest_system(
    mut loading_progress: ResMut<LoadingProgress>,
    manifest_loader: Res<ManifestLoader>,
    mut loader: ResMut<StoryLoader>,
    mut next_state: ResMut<NextState<AppState>>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<StoryManifest>>,
) {
    if loading_progress.manifest_loaded {
        return;
    }
    let Some(ref handle) = manifest_loader.handle else {
        return;
    };

    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle.id()) {
        error!("Story manifest failed to load: {}", err);
        commands.insert_resource(StartupFailure(StoryError::ManifestUnavailable(
            err.to_string(),
        )));
        next_state.set(AppState::LoadFailed);
        loading_progress.manifest_loaded = true;
        return;
    }

    let Some(manifest) = manifests.get(handle) else {
        return;
    };
    loading_progress.manifest_loaded = true;

    if let Err(err) = manifest.validate() {
        error!("Story manifest rejected: {}", err);
        commands.insert_resource(StartupFailure(err));
        next_state.set(AppState::LoadFailed);
        return;
    }

    println!("✓ Story manifest loaded ({} batches)", manifest.batches.len());
    commands.insert_resource(manifest.settings.clone());
    commands.insert_resource(manifest.clone());

    for batch in manifest.essential_batches() {
        loader.load_batch(batch, &asset_server);
    }
}

// Background batches start once the experience is interactive
pub fn start_background_loading(
    manifest: Option<Res<StoryManifest>>,
    mut loader: ResMut<StoryLoader>,
    mut loading_progress: ResMut<LoadingProgress>,
    asset_server: Res<AssetServer>,
) {
    if loading_progress.background_started {
        return;
    }
    let Some(manifest) = manifest else {
        return;
    };

    loader.begin_phase();
    for batch in manifest.background_batches() {
        loader.load_batch(batch, &asset_server);
    }
    loading_progress.background_started = true;
}
