/// Story manifest generation: scene batches in the format the engine loads.
use crate::discovery::{AssetKind, DiscoveredAsset};
use constants::loading::SCENE_DIR_PREFIX;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchPriority {
    Essential,
    Background,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetEntry {
    pub name: String,
    pub path: String,
    pub kind: AssetKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchManifest {
    pub name: String,
    pub priority: BatchPriority,
    pub assets: Vec<AssetEntry>,
}

/// Story manifest. Pacing settings are left to the engine defaults; add a
/// `settings` block by hand to override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryManifest {
    pub batches: Vec<BatchManifest>,
}

impl StoryManifest {
    /// Group assets into one batch per scene. The lowest scene number is essential,
    /// every other scene loads in the background. Asset names must be unique; later
    /// duplicates are dropped with a warning.
    pub fn from_assets(assets: Vec<DiscoveredAsset>) -> Self {
        let mut by_scene: BTreeMap<u32, Vec<AssetEntry>> = BTreeMap::new();
        let mut seen = HashSet::new();

        for asset in assets {
            if !seen.insert(asset.name.clone()) {
                eprintln!(
                    "Duplicate asset name `{}` at {}, skipping",
                    asset.name, asset.path
                );
                continue;
            }
            by_scene.entry(asset.scene).or_default().push(AssetEntry {
                name: asset.name,
                path: asset.path,
                kind: asset.kind,
                bytes: asset.bytes,
            });
        }

        let batches = by_scene
            .into_iter()
            .enumerate()
            .map(|(index, (scene, mut assets))| {
                assets.sort_by(|a, b| a.name.cmp(&b.name));
                BatchManifest {
                    name: format!("{}{}", SCENE_DIR_PREFIX, scene),
                    priority: if index == 0 {
                        BatchPriority::Essential
                    } else {
                        BatchPriority::Background
                    },
                    assets,
                }
            })
            .collect();

        Self { batches }
    }

    pub fn asset_count(&self) -> usize {
        self.batches.iter().map(|batch| batch.assets.len()).sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.batches
            .iter()
            .flat_map(|batch| batch.assets.iter())
            .filter_map(|entry| entry.bytes)
            .sum()
    }

    /// Write the manifest as pretty JSON, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        println!("Manifest written: {}", path.display());
        Ok(())
    }
}
