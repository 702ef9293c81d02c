use crate::engine::assets::story_asset::StoryAsset;

/// Errors raised by story lookups and asset loading.
///
/// None of these are fatal on their own; the caller decides whether to surface,
/// log or skip.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoryError {
    #[error("asset `{0}` is not loaded")]
    AssetNotLoaded(StoryAsset),

    #[error("asset `{asset}` is not a {expected} asset")]
    AssetKindMismatch {
        asset: StoryAsset,
        expected: &'static str,
    },

    #[error("unknown asset name `{0}`")]
    UnknownAsset(String),

    #[error("model `{asset}` has no animation clip named `{clip}`")]
    UnknownClip { asset: StoryAsset, clip: String },

    #[error("unknown scene `{0}`")]
    UnknownScene(String),

    #[error("failed to load `{asset}` ({path}): {reason}")]
    EssentialLoadFailed {
        asset: StoryAsset,
        path: String,
        reason: String,
    },

    #[error("story manifest unavailable: {0}")]
    ManifestUnavailable(String),
}
