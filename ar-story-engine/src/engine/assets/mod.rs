//! Story asset naming, manifest schema and the loaded-asset registry.
//!
//! Assets are declared in a JSON manifest grouped into prioritised batches and
//! resolved into typed handles once loaded.

/// Typed registry of loaded models and audio, keyed by story asset name.
pub mod asset_registry;

/// Batch manifest describing which files make up each load batch.
pub mod story_manifest;

/// Closed set of asset names the story refers to.
pub mod story_asset;
