/// Asset discovery over the `models/sceneN` and `audio/sceneN` layout.
use constants::loading::{AUDIO_DIR, AUDIO_EXTENSIONS, MODEL_DIR, MODEL_EXTENSIONS, SCENE_DIR_PREFIX};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Error types for asset discovery.
#[derive(Debug)]
pub enum DiscoveryError {
    IoError(std::io::Error),
    NotADirectory(PathBuf),
}

impl From<std::io::Error> for DiscoveryError {
    fn from(err: std::io::Error) -> Self {
        DiscoveryError::IoError(err)
    }
}

impl std::fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryError::IoError(e) => write!(f, "IO error: {}", e),
            DiscoveryError::NotADirectory(path) => {
                write!(f, "{} is not a directory", path.display())
            }
        }
    }
}

impl std::error::Error for DiscoveryError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Model,
    Audio,
}

/// A file found under a scene folder.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetCandidate {
    pub scene: u32,
    /// File stem, used as the asset name.
    pub name: String,
    /// Path relative to the asset root, with forward slashes.
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub kind: AssetKind,
}

/// A candidate with its size recorded, when the file could be read.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredAsset {
    pub scene: u32,
    pub name: String,
    pub path: String,
    pub kind: AssetKind,
    pub bytes: Option<u64>,
}

/// Asset kind for a file extension, case-insensitive.
pub fn kind_for_extension(extension: &str) -> Option<AssetKind> {
    let ext = extension.to_lowercase();
    if MODEL_EXTENSIONS.contains(&ext.as_str()) {
        Some(AssetKind::Model)
    } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        Some(AssetKind::Audio)
    } else {
        None
    }
}

/// Scene number from a folder name such as `scene3`.
pub fn scene_number(dir_name: &str) -> Option<u32> {
    dir_name.strip_prefix(SCENE_DIR_PREFIX)?.parse().ok()
}

/// Find every model and audio file under the asset root, sorted by scene then name.
pub fn discover_assets(asset_root: &Path) -> Result<Vec<AssetCandidate>, DiscoveryError> {
    if !asset_root.is_dir() {
        return Err(DiscoveryError::NotADirectory(asset_root.to_path_buf()));
    }

    let mut candidates = Vec::new();
    for top in [MODEL_DIR, AUDIO_DIR] {
        let top_dir = asset_root.join(top);
        if !top_dir.is_dir() {
            println!("No {} directory, skipping", top);
            continue;
        }

        for scene_entry in fs::read_dir(&top_dir)? {
            let scene_path = scene_entry?.path();
            let Some(scene) = scene_path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(scene_number)
            else {
                continue;
            };
            if !scene_path.is_dir() {
                continue;
            }

            for file_entry in fs::read_dir(&scene_path)? {
                let path = file_entry?.path();
                if !path.is_file() {
                    continue;
                }
                let Some(kind) = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(kind_for_extension)
                else {
                    continue;
                };
                let (Some(stem), Some(file_name)) = (
                    path.file_stem().and_then(|s| s.to_str()),
                    path.file_name().and_then(|s| s.to_str()),
                ) else {
                    eprintln!("Skipping non UTF-8 file name: {}", path.display());
                    continue;
                };

                candidates.push(AssetCandidate {
                    scene,
                    name: stem.to_string(),
                    relative_path: format!("{}/{}{}/{}", top, SCENE_DIR_PREFIX, scene, file_name),
                    absolute_path: path.clone(),
                    kind,
                });
            }
        }
    }

    candidates.sort_by(|a, b| (a.scene, &a.name).cmp(&(b.scene, &b.name)));

    println!("Asset discovery order:");
    for candidate in &candidates {
        println!("  scene {}: {}", candidate.scene, candidate.relative_path);
    }

    Ok(candidates)
}

/// Record file sizes in parallel. Unreadable files keep an unknown size.
pub fn measure_sizes(candidates: Vec<AssetCandidate>) -> Vec<DiscoveredAsset> {
    let pb = ProgressBar::new(candidates.len() as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{bar:40.green/blue}] {pos}/{len} files ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏"));
    }
    pb.set_message("Measuring assets");

    let measured = candidates
        .into_par_iter()
        .map(|candidate| {
            let bytes = match fs::metadata(&candidate.absolute_path) {
                Ok(metadata) => Some(metadata.len()),
                Err(err) => {
                    eprintln!("Cannot stat {}: {}", candidate.absolute_path.display(), err);
                    None
                }
            };
            pb.inc(1);
            DiscoveredAsset {
                scene: candidate.scene,
                name: candidate.name,
                path: candidate.relative_path,
                kind: candidate.kind,
                bytes,
            }
        })
        .collect();

    pb.finish_with_message("Assets measured");
    measured
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "story-manifest-builder-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn extensions_map_to_kinds() {
        assert_eq!(kind_for_extension("glb"), Some(AssetKind::Model));
        assert_eq!(kind_for_extension("GLTF"), Some(AssetKind::Model));
        assert_eq!(kind_for_extension("mp3"), Some(AssetKind::Audio));
        assert_eq!(kind_for_extension("txt"), None);
    }

    #[test]
    fn scene_folders_parse() {
        assert_eq!(scene_number("scene1"), Some(1));
        assert_eq!(scene_number("scene12"), Some(12));
        assert_eq!(scene_number("scene"), None);
        assert_eq!(scene_number("extras"), None);
    }

    #[test]
    fn discovers_and_measures_scene_files() {
        let root = scratch_dir("discover");
        fs::create_dir_all(root.join("models/scene2")).unwrap();
        fs::create_dir_all(root.join("models/scene1")).unwrap();
        fs::create_dir_all(root.join("audio/scene1")).unwrap();
        fs::create_dir_all(root.join("models/unused")).unwrap();
        fs::write(root.join("models/scene1/narrator.glb"), [0u8; 16]).unwrap();
        fs::write(root.join("models/scene2/hacker.glb"), [0u8; 8]).unwrap();
        fs::write(root.join("models/scene1/notes.txt"), "ignored").unwrap();
        fs::write(root.join("models/unused/stray.glb"), [0u8; 4]).unwrap();
        fs::write(root.join("audio/scene1/intro_narration.mp3"), [0u8; 32]).unwrap();

        let candidates = discover_assets(&root).unwrap();
        let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["intro_narration", "narrator", "hacker"]);
        assert_eq!(candidates[1].relative_path, "models/scene1/narrator.glb");

        let measured = measure_sizes(candidates);
        assert_eq!(measured[0].bytes, Some(32));
        assert_eq!(measured[0].kind, AssetKind::Audio);
        assert_eq!(measured[2].scene, 2);

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn missing_root_is_an_error() {
        let missing = std::env::temp_dir().join("story-manifest-builder-does-not-exist");
        assert!(matches!(
            discover_assets(&missing),
            Err(DiscoveryError::NotADirectory(_))
        ));
    }
}
