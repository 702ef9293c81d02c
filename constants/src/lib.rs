//! Shared configuration for the story engine and the manifest builder.

/// Animation defaults for procedural movement and idle sway.
pub mod animation;

/// Element ids of the host page the engine reads and writes.
pub mod dom;

/// Story manifest location, asset layout and progress reporting.
pub mod loading;

/// World-space placement of the reusable controls and text plates.
pub mod render_settings;

/// Fixed delays used for story pacing.
pub mod timing;

/// Immersive session feature negotiation.
pub mod xr;
