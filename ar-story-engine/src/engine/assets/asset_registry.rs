use crate::engine::assets::story_asset::{AssetKind, StoryAsset};
use crate::error::StoryError;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use std::collections::HashMap;

/// Scene and named animation clips resolved from a loaded glTF.
#[derive(Debug, Clone)]
pub struct ModelAsset {
    pub scene: Handle<Scene>,
    pub clips: HashMap<String, Handle<AnimationClip>>,
}

impl ModelAsset {
    /// Resolve the default scene (or the first one) and the named clips.
    /// Returns `None` for a glTF without any scene.
    pub fn from_gltf(gltf: &Gltf) -> Option<Self> {
        let scene = gltf
            .default_scene
            .clone()
            .or_else(|| gltf.scenes.first().cloned())?;

        let clips = gltf
            .named_animations
            .iter()
            .map(|(name, clip)| (name.to_string(), clip.clone()))
            .collect();

        Some(Self { scene, clips })
    }
}

#[derive(Debug, Clone)]
pub enum LoadedAsset {
    Model(ModelAsset),
    Audio(Handle<AudioSource>),
}

impl LoadedAsset {
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Model(_) => AssetKind::Model,
            Self::Audio(_) => AssetKind::Audio,
        }
    }
}

/// Every asset loaded so far, keyed by its story name.
///
/// Populated by the batch loader; assets stay here for the whole session and are
/// re-instanced by each scene that needs them.
#[derive(Resource, Default, Debug)]
pub struct AssetRegistry {
    assets: HashMap<StoryAsset, LoadedAsset>,
}

impl AssetRegistry {
    pub fn insert(&mut self, asset: StoryAsset, loaded: LoadedAsset) {
        self.assets.insert(asset, loaded);
    }

    pub fn contains(&self, asset: StoryAsset) -> bool {
        self.assets.contains_key(&asset)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn get(&self, asset: StoryAsset) -> Result<&LoadedAsset, StoryError> {
        self.assets
            .get(&asset)
            .ok_or(StoryError::AssetNotLoaded(asset))
    }

    pub fn model(&self, asset: StoryAsset) -> Result<&ModelAsset, StoryError> {
        match self.get(asset)? {
            LoadedAsset::Model(model) => Ok(model),
            LoadedAsset::Audio(_) => Err(StoryError::AssetKindMismatch {
                asset,
                expected: AssetKind::Model.as_str(),
            }),
        }
    }

    pub fn audio(&self, asset: StoryAsset) -> Result<Handle<AudioSource>, StoryError> {
        match self.get(asset)? {
            LoadedAsset::Audio(handle) => Ok(handle.clone()),
            LoadedAsset::Model(_) => Err(StoryError::AssetKindMismatch {
                asset,
                expected: AssetKind::Audio.as_str(),
            }),
        }
    }

    pub fn clip(&self, asset: StoryAsset, name: &str) -> Result<Handle<AnimationClip>, StoryError> {
        self.model(asset)?
            .clips
            .get(name)
            .cloned()
            .ok_or_else(|| StoryError::UnknownClip {
                asset,
                clip: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_clip(clip: &str) -> LoadedAsset {
        let mut clips = HashMap::new();
        clips.insert(clip.to_string(), Handle::default());
        LoadedAsset::Model(ModelAsset {
            scene: Handle::default(),
            clips,
        })
    }

    #[test]
    fn typed_lookups() {
        let mut registry = AssetRegistry::default();
        registry.insert(StoryAsset::Narrator, model_with_clip("Wave"));
        registry.insert(StoryAsset::IntroNarration, LoadedAsset::Audio(Handle::default()));

        assert!(registry.model(StoryAsset::Narrator).is_ok());
        assert!(registry.audio(StoryAsset::IntroNarration).is_ok());
        assert!(registry.clip(StoryAsset::Narrator, "Wave").is_ok());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn lookup_failures_are_typed() {
        let mut registry = AssetRegistry::default();
        registry.insert(StoryAsset::Narrator, model_with_clip("Wave"));

        assert_eq!(
            registry.model(StoryAsset::Hacker).unwrap_err(),
            StoryError::AssetNotLoaded(StoryAsset::Hacker)
        );
        assert_eq!(
            registry.audio(StoryAsset::Narrator).unwrap_err(),
            StoryError::AssetKindMismatch {
                asset: StoryAsset::Narrator,
                expected: "audio",
            }
        );
        assert_eq!(
            registry.clip(StoryAsset::Narrator, "Dance").unwrap_err(),
            StoryError::UnknownClip {
                asset: StoryAsset::Narrator,
                clip: "Dance".to_string(),
            }
        );
    }
}
