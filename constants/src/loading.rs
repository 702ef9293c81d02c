/// Story manifest path relative to the asset root.
pub const MANIFEST_PATH: &str = "story/manifest.json";

/// Manifest file name written by the builder.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Top-level asset directories, each holding one `scene<N>` folder per scene.
pub const MODEL_DIR: &str = "models";
pub const AUDIO_DIR: &str = "audio";

/// Prefix of the per-scene asset folders and batch names.
pub const SCENE_DIR_PREFIX: &str = "scene";

pub const MODEL_EXTENSIONS: &[&str] = &["glb", "gltf"];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "ogg", "wav"];

/// Reported while the total byte count of the tracked batches is unknown.
pub const UNKNOWN_PROGRESS_PERCENT: f32 = 50.0;
