//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, state transitions,
//! and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with asset loading, story scheduling and the
/// host bridge, plus platform-specific overlays.
pub mod app_setup;

/// Application state machine: loading, start gate, session negotiation,
/// running story and end page.
pub mod app_state;

/// Story pacing and animation tunables, overridable from the manifest.
pub mod settings;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
