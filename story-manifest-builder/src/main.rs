/// Story manifest builder: scans the asset tree and writes the batch manifest.
mod discovery;
mod manifest;

use constants::loading::MANIFEST_PATH;
use discovery::{discover_assets, measure_sizes};
use manifest::StoryManifest;
use std::env;
use std::path::{Path, PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <assets_dir> [output.json]", args[0]);
        std::process::exit(1);
    }

    let asset_root = Path::new(&args[1]);
    let output = match args.get(2) {
        Some(path) => PathBuf::from(path),
        None => asset_root.join(MANIFEST_PATH),
    };

    println!("Scanning assets in {}", asset_root.display());
    let candidates = discover_assets(asset_root)?;
    if candidates.is_empty() {
        return Err("No model or audio files found under scene folders".into());
    }

    let manifest = StoryManifest::from_assets(measure_sizes(candidates));
    println!(
        "{} assets in {} batches, {} bytes recorded",
        manifest.asset_count(),
        manifest.batches.len(),
        manifest.total_bytes()
    );
    manifest.write(&output)?;

    Ok(())
}
