use crate::engine::assets::story_asset::{AssetKind, StoryAsset};
use crate::engine::core::settings::StorySettings;
use crate::error::StoryError;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Load priority of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchPriority {
    /// Awaited before the experience can start; any failure is fatal.
    Essential,
    /// Loaded after start-up; failures are logged and skipped.
    Background,
}

/// Single asset reference inside a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetEntry {
    pub name: StoryAsset,
    pub path: String,
    pub kind: AssetKind,
    /// File size in bytes, when the builder could record it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

/// Named group of assets loaded together, usually one per scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchManifest {
    pub name: String,
    pub priority: BatchPriority,
    pub assets: Vec<AssetEntry>,
}

/// Story manifest as a Bevy asset. Mirrors the JSON written by `story-manifest-builder`.
#[derive(Asset, Debug, Clone, Serialize, Deserialize, TypePath, Resource)]
pub struct StoryManifest {
    pub batches: Vec<BatchManifest>,
    #[serde(default)]
    pub settings: StorySettings,
}

impl StoryManifest {
    pub fn essential_batches(&self) -> impl Iterator<Item = &BatchManifest> {
        self.batches
            .iter()
            .filter(|batch| batch.priority == BatchPriority::Essential)
    }

    pub fn background_batches(&self) -> impl Iterator<Item = &BatchManifest> {
        self.batches
            .iter()
            .filter(|batch| batch.priority == BatchPriority::Background)
    }

    /// Find the entry declaring `asset`, if any batch lists it.
    pub fn entry(&self, asset: StoryAsset) -> Option<&AssetEntry> {
        self.batches
            .iter()
            .flat_map(|batch| batch.assets.iter())
            .find(|entry| entry.name == asset)
    }

    /// Check that every entry declares the kind the story expects for its name
    /// and that at least one essential batch exists.
    pub fn validate(&self) -> Result<(), StoryError> {
        if self.essential_batches().next().is_none() {
            return Err(StoryError::ManifestUnavailable(
                "manifest declares no essential batch".to_string(),
            ));
        }

        for entry in self.batches.iter().flat_map(|batch| batch.assets.iter()) {
            if entry.kind != entry.name.kind() {
                return Err(StoryError::AssetKindMismatch {
                    asset: entry.name,
                    expected: entry.name.kind().as_str(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "batches": [
            {
                "name": "scene1",
                "priority": "essential",
                "assets": [
                    { "name": "narrator", "path": "models/scene1/narrator.glb", "kind": "model", "bytes": 2048 },
                    { "name": "intro_narration", "path": "audio/scene1/intro_narration.mp3", "kind": "audio" }
                ]
            },
            {
                "name": "scene2",
                "priority": "background",
                "assets": [
                    { "name": "hacker", "path": "models/scene2/hacker.glb", "kind": "model", "bytes": 4096 }
                ]
            }
        ],
        "settings": { "settle_delay_ms": 450 }
    }"#;

    #[test]
    fn parses_batches_and_partial_settings() {
        let manifest: StoryManifest = serde_json::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.essential_batches().count(), 1);
        assert_eq!(manifest.background_batches().count(), 1);
        assert_eq!(manifest.entry(StoryAsset::Narrator).unwrap().bytes, Some(2048));
        assert_eq!(manifest.entry(StoryAsset::IntroNarration).unwrap().bytes, None);
        assert_eq!(manifest.settings.settle_delay_ms, 450);
        assert_eq!(
            manifest.settings.walk_speed,
            StorySettings::default().walk_speed
        );
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_asset_names() {
        let json = MANIFEST.replace("\"hacker\"", "\"dragon\"");
        assert!(serde_json::from_str::<StoryManifest>(&json).is_err());
    }

    #[test]
    fn rejects_kind_mismatch() {
        let json = MANIFEST.replace(
            r#""path": "models/scene2/hacker.glb", "kind": "model""#,
            r#""path": "models/scene2/hacker.glb", "kind": "audio""#,
        );
        let manifest: StoryManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(
            manifest.validate(),
            Err(StoryError::AssetKindMismatch {
                asset: StoryAsset::Hacker,
                expected: "model",
            })
        );
    }

    #[test]
    fn requires_an_essential_batch() {
        let json = MANIFEST.replace("\"essential\"", "\"background\"");
        let manifest: StoryManifest = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            manifest.validate(),
            Err(StoryError::ManifestUnavailable(_))
        ));
    }
}
