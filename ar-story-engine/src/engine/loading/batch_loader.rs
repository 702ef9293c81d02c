use crate::engine::assets::asset_registry::{AssetRegistry, LoadedAsset, ModelAsset};
use crate::engine::assets::story_asset::{AssetKind, StoryAsset};
use crate::engine::assets::story_manifest::{AssetEntry, BatchManifest, BatchPriority};
use crate::engine::core::app_state::{AppState, StartupFailure};
use crate::engine::loading::progress::LoadingProgress;
use crate::error::StoryError;
use bevy::asset::{LoadState, RecursiveDependencyLoadState, UntypedAssetId};
use bevy::gltf::Gltf;
use bevy::prelude::*;
use std::collections::HashMap;

/// Load state of one manifest entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryStatus {
    Pending,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub asset: StoryAsset,
    pub path: String,
    pub reason: String,
}

impl From<LoadFailure> for StoryError {
    fn from(failure: LoadFailure) -> Self {
        StoryError::EssentialLoadFailed {
            asset: failure.asset,
            path: failure.path,
            reason: failure.reason,
        }
    }
}

/// Settled batch: what loaded and what did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub loaded: Vec<StoryAsset>,
    pub failed: Vec<LoadFailure>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Pending,
    Complete(BatchReport),
    /// Only produced for essential batches, on the first failed entry.
    Failed(LoadFailure),
}

#[derive(Debug, Clone)]
struct TrackedEntry {
    entry: AssetEntry,
    status: EntryStatus,
}

/// Tracks the entries of one batch until every entry has settled.
///
/// Essential batches fail fast on the first failed entry. Background batches wait
/// for every entry and report failures alongside the survivors.
#[derive(Debug, Clone)]
pub struct BatchTracker {
    name: String,
    priority: BatchPriority,
    entries: Vec<TrackedEntry>,
}

impl BatchTracker {
    pub fn new(batch: &BatchManifest) -> Self {
        Self {
            name: batch.name.clone(),
            priority: batch.priority,
            entries: batch
                .assets
                .iter()
                .map(|entry| TrackedEntry {
                    entry: entry.clone(),
                    status: EntryStatus::Pending,
                })
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> BatchPriority {
        self.priority
    }

    /// Refresh pending entries through `status_of` and report the batch outcome.
    pub fn poll(&mut self, mut status_of: impl FnMut(&AssetEntry) -> EntryStatus) -> BatchOutcome {
        for tracked in &mut self.entries {
            if tracked.status == EntryStatus::Pending {
                tracked.status = status_of(&tracked.entry);
            }
        }

        let failures: Vec<LoadFailure> = self
            .entries
            .iter()
            .filter_map(|tracked| match &tracked.status {
                EntryStatus::Failed(reason) => Some(LoadFailure {
                    asset: tracked.entry.name,
                    path: tracked.entry.path.clone(),
                    reason: reason.clone(),
                }),
                _ => None,
            })
            .collect();

        if self.priority == BatchPriority::Essential {
            if let Some(first) = failures.first() {
                return BatchOutcome::Failed(first.clone());
            }
        }

        if self
            .entries
            .iter()
            .any(|tracked| tracked.status == EntryStatus::Pending)
        {
            return BatchOutcome::Pending;
        }

        BatchOutcome::Complete(BatchReport {
            loaded: self
                .entries
                .iter()
                .filter(|tracked| tracked.status == EntryStatus::Loaded)
                .map(|tracked| tracked.entry.name)
                .collect(),
            failed: failures,
        })
    }

    pub fn loaded_bytes(&self) -> u64 {
        self.entries
            .iter()
            .filter(|tracked| tracked.status == EntryStatus::Loaded)
            .filter_map(|tracked| tracked.entry.bytes)
            .sum()
    }

    /// Sum of entry sizes, `None` if any entry has no recorded size.
    pub fn total_bytes(&self) -> Option<u64> {
        self.entries
            .iter()
            .map(|tracked| tracked.entry.bytes)
            .sum()
    }
}

/// Register every loaded asset of a settled batch and log the ones that failed.
/// Returns how many assets were registered.
pub fn register_batch(
    batch_name: &str,
    report: &BatchReport,
    registry: &mut AssetRegistry,
    mut resolve: impl FnMut(StoryAsset) -> Option<LoadedAsset>,
) -> usize {
    let mut registered = 0;
    for &asset in &report.loaded {
        match resolve(asset) {
            Some(loaded) => {
                registry.insert(asset, loaded);
                registered += 1;
            }
            None => warn!("Batch `{}`: `{}` loaded but could not be resolved", batch_name, asset),
        }
    }
    for failure in &report.failed {
        warn!(
            "Batch `{}`: skipping `{}` ({}): {}",
            batch_name, failure.asset, failure.path, failure.reason
        );
    }
    registered
}

#[derive(Debug, Clone)]
enum PendingHandle {
    Model(Handle<Gltf>),
    Audio(Handle<AudioSource>),
}

impl PendingHandle {
    fn id(&self) -> UntypedAssetId {
        match self {
            Self::Model(handle) => handle.id().untyped(),
            Self::Audio(handle) => handle.id().untyped(),
        }
    }

    fn resolve(&self, gltfs: &Assets<Gltf>) -> Option<LoadedAsset> {
        match self {
            Self::Model(handle) => gltfs
                .get(handle)
                .and_then(ModelAsset::from_gltf)
                .map(LoadedAsset::Model),
            Self::Audio(handle) => Some(LoadedAsset::Audio(handle.clone())),
        }
    }
}

struct InFlightBatch {
    tracker: BatchTracker,
    handles: HashMap<StoryAsset, PendingHandle>,
}

/// Batches currently loading through the asset server.
#[derive(Resource)]
pub struct StoryLoader {
    in_flight: Vec<InFlightBatch>,
    settled_loaded_bytes: u64,
    settled_total_bytes: Option<u64>,
}

impl Default for StoryLoader {
    fn default() -> Self {
        Self {
            in_flight: Vec::new(),
            settled_loaded_bytes: 0,
            settled_total_bytes: Some(0),
        }
    }
}

impl StoryLoader {
    /// Start loading every entry of `batch` in parallel.
    pub fn load_batch(&mut self, batch: &BatchManifest, asset_server: &AssetServer) {
        info!(
            "Loading {:?} batch `{}` ({} assets)",
            batch.priority,
            batch.name,
            batch.assets.len()
        );

        let handles = batch
            .assets
            .iter()
            .map(|entry| {
                let handle = match entry.kind {
                    AssetKind::Model => {
                        PendingHandle::Model(asset_server.load(entry.path.clone()))
                    }
                    AssetKind::Audio => {
                        PendingHandle::Audio(asset_server.load(entry.path.clone()))
                    }
                };
                (entry.name, handle)
            })
            .collect();

        self.in_flight.push(InFlightBatch {
            tracker: BatchTracker::new(batch),
            handles,
        });
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn has_pending_essential(&self) -> bool {
        self.in_flight
            .iter()
            .any(|batch| batch.tracker.priority() == BatchPriority::Essential)
    }

    /// Forget settled batches so progress only covers what loads next.
    pub fn begin_phase(&mut self) {
        self.settled_loaded_bytes = 0;
        self.settled_total_bytes = Some(0);
    }

    /// Loaded and total bytes across the current phase.
    pub fn progress(&self) -> (u64, Option<u64>) {
        let loaded = self.settled_loaded_bytes
            + self
                .in_flight
                .iter()
                .map(|batch| batch.tracker.loaded_bytes())
                .sum::<u64>();
        let total = self
            .in_flight
            .iter()
            .map(|batch| batch.tracker.total_bytes())
            .fold(self.settled_total_bytes, |acc, total| Some(acc? + total?));
        (loaded, total)
    }
}

fn entry_status(
    asset_server: &AssetServer,
    gltfs: &Assets<Gltf>,
    handle: Option<&PendingHandle>,
) -> EntryStatus {
    let Some(handle) = handle else {
        return EntryStatus::Failed("no load was started for this entry".to_string());
    };
    let id = handle.id();

    match asset_server.get_load_state(id) {
        Some(LoadState::Failed(err)) => return EntryStatus::Failed(err.to_string()),
        Some(LoadState::Loaded) => {}
        _ => return EntryStatus::Pending,
    }

    match asset_server.get_recursive_dependency_load_state(id) {
        Some(RecursiveDependencyLoadState::Failed(err)) => EntryStatus::Failed(err.to_string()),
        Some(RecursiveDependencyLoadState::Loaded) => match handle.resolve(gltfs) {
            Some(_) => EntryStatus::Loaded,
            None => EntryStatus::Failed("glTF contains no scene".to_string()),
        },
        _ => EntryStatus::Pending,
    }
}

/// Poll every in-flight batch, register settled ones and drive the loading states.
pub fn poll_batches(
    mut loader: ResMut<StoryLoader>,
    mut registry: ResMut<AssetRegistry>,
    mut progress: ResMut<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
) {
    if loader.is_idle() {
        return;
    }

    let mut settled = Vec::new();
    let mut essential_settled = false;
    for (index, batch) in loader.in_flight.iter_mut().enumerate() {
        let handles = &batch.handles;
        let outcome = batch.tracker.poll(|entry| {
            entry_status(&asset_server, &gltfs, handles.get(&entry.name))
        });

        match outcome {
            BatchOutcome::Pending => {}
            BatchOutcome::Failed(failure) => {
                error!(
                    "Essential batch `{}` failed on `{}`: {}",
                    batch.tracker.name(),
                    failure.asset,
                    failure.reason
                );
                commands.insert_resource(StartupFailure(failure.into()));
                next_state.set(AppState::LoadFailed);
                settled.push(index);
            }
            BatchOutcome::Complete(report) => {
                let registered = register_batch(
                    batch.tracker.name(),
                    &report,
                    &mut registry,
                    |asset| handles.get(&asset).and_then(|handle| handle.resolve(&gltfs)),
                );
                info!(
                    "✓ Batch `{}` settled: {} registered, {} failed",
                    batch.tracker.name(),
                    registered,
                    report.failed.len()
                );
                essential_settled |= batch.tracker.priority() == BatchPriority::Essential;
                settled.push(index);
            }
        }
    }

    for index in settled.into_iter().rev() {
        let batch = loader.in_flight.remove(index);
        loader.settled_loaded_bytes += batch.tracker.loaded_bytes();
        loader.settled_total_bytes = loader
            .settled_total_bytes
            .zip(batch.tracker.total_bytes())
            .map(|(acc, total)| acc + total);
    }

    if essential_settled && !loader.has_pending_essential() {
        progress.essential_loaded = true;
    }

    let (loaded, total) = loader.progress();
    progress.loaded_bytes = loaded;
    progress.total_bytes = total;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: StoryAsset, bytes: Option<u64>) -> AssetEntry {
        AssetEntry {
            name,
            path: format!("{}/{}", name.kind().as_str(), name),
            kind: name.kind(),
            bytes,
        }
    }

    fn batch(priority: BatchPriority, entries: Vec<AssetEntry>) -> BatchManifest {
        BatchManifest {
            name: "scene".to_string(),
            priority,
            assets: entries,
        }
    }

    #[test]
    fn essential_batch_fails_fast_with_the_failure_message() {
        let mut tracker = BatchTracker::new(&batch(
            BatchPriority::Essential,
            vec![
                entry(StoryAsset::Narrator, Some(100)),
                entry(StoryAsset::NextButton, Some(100)),
            ],
        ));

        let outcome = tracker.poll(|entry| match entry.name {
            StoryAsset::NextButton => EntryStatus::Failed("404 Not Found".to_string()),
            _ => EntryStatus::Pending,
        });

        let BatchOutcome::Failed(failure) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(failure.asset, StoryAsset::NextButton);
        let message = StoryError::from(failure).to_string();
        assert!(message.contains("404 Not Found"));
        assert!(message.contains("next_button"));
    }

    #[test]
    fn background_batch_keeps_survivors() {
        let mut tracker = BatchTracker::new(&batch(
            BatchPriority::Background,
            vec![
                entry(StoryAsset::Hacker, Some(10)),
                entry(StoryAsset::PhishingEmail, Some(10)),
                entry(StoryAsset::PhishingNarration, Some(10)),
            ],
        ));

        let outcome = tracker.poll(|entry| match entry.name {
            StoryAsset::PhishingEmail => EntryStatus::Failed("decode error".to_string()),
            _ => EntryStatus::Loaded,
        });
        let BatchOutcome::Complete(report) = outcome else {
            panic!("expected completion, got {outcome:?}");
        };
        assert_eq!(report.loaded, vec![StoryAsset::Hacker, StoryAsset::PhishingNarration]);
        assert_eq!(report.failed.len(), 1);

        let mut registry = AssetRegistry::default();
        let registered = register_batch("scene2", &report, &mut registry, |asset| {
            Some(match asset.kind() {
                AssetKind::Audio => LoadedAsset::Audio(Handle::default()),
                AssetKind::Model => LoadedAsset::Model(ModelAsset {
                    scene: Handle::default(),
                    clips: HashMap::new(),
                }),
            })
        });
        assert_eq!(registered, 2);
        assert!(registry.contains(StoryAsset::Hacker));
        assert!(registry.contains(StoryAsset::PhishingNarration));
        assert!(!registry.contains(StoryAsset::PhishingEmail));
    }

    #[test]
    fn background_batch_waits_for_every_entry() {
        let mut tracker = BatchTracker::new(&batch(
            BatchPriority::Background,
            vec![entry(StoryAsset::Laptop, None), entry(StoryAsset::Padlock, None)],
        ));
        let outcome = tracker.poll(|entry| match entry.name {
            StoryAsset::Laptop => EntryStatus::Failed("missing".to_string()),
            _ => EntryStatus::Pending,
        });
        assert_eq!(outcome, BatchOutcome::Pending);
    }

    #[test]
    fn settled_entries_are_not_polled_again() {
        let mut tracker = BatchTracker::new(&batch(
            BatchPriority::Essential,
            vec![entry(StoryAsset::Narrator, Some(5))],
        ));
        assert!(matches!(
            tracker.poll(|_| EntryStatus::Loaded),
            BatchOutcome::Complete(_)
        ));
        let mut calls = 0;
        tracker.poll(|_| {
            calls += 1;
            EntryStatus::Pending
        });
        assert_eq!(calls, 0);
    }

    #[test]
    fn byte_accounting() {
        let mut tracker = BatchTracker::new(&batch(
            BatchPriority::Essential,
            vec![
                entry(StoryAsset::Narrator, Some(300)),
                entry(StoryAsset::IntroNarration, Some(100)),
            ],
        ));
        assert_eq!(tracker.total_bytes(), Some(400));
        tracker.poll(|entry| match entry.name {
            StoryAsset::Narrator => EntryStatus::Loaded,
            _ => EntryStatus::Pending,
        });
        assert_eq!(tracker.loaded_bytes(), 300);

        let unknown = BatchTracker::new(&batch(
            BatchPriority::Essential,
            vec![entry(StoryAsset::Narrator, Some(300)), entry(StoryAsset::QuitButton, None)],
        ));
        assert_eq!(unknown.total_bytes(), None);
    }
}
