//! Clickable objects and ray dispatch.
//!
//! Scenes register entities together with the story action a click should run.
//! Mouse clicks (pointer mode) and controller selects from the host (immersive
//! mode) are turned into rays and resolved against the registry, firing at most
//! one action per ray.

/// Mouse and host select handling.
pub mod pointer;

/// Bevy scene graph implementation of ray casting against pick volumes.
pub mod picking;

/// Slab-method ray intersection helpers.
pub mod ray;

/// Registry of clickable targets and single-hit dispatch.
pub mod registry;
