//! Prioritised asset loading for the story.
//!
//! The manifest is read first, then the essential batch is awaited before the
//! start button activates. Background batches follow in parallel and tolerate
//! partial failure.

/// Batch tracking, failure policy and registration of loaded assets.
pub mod batch_loader;

/// Story manifest loading and batch kick-off.
pub mod manifest_loader;

/// Byte-based progress reporting for the loading overlay.
pub mod progress;
