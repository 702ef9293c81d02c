//! The cybersecurity story: scenes, their order and how they hand over.
//!
//! Scenes are plain setup procedures in a fixed table. Everything they do is
//! expressed as a [`actions::StoryAction`], executed by one exclusive system so
//! the scene graph, timers and registries change in a single place.

/// Story actions and the per-frame action queue.
pub mod actions;

/// Scene entry, teardown and action execution.
pub mod controller;

/// Quiz questions, answers and score.
pub mod quiz;

/// Scene identifiers.
pub mod scene_id;

/// Scene table and setup procedures.
pub mod scenes;

/// Frame-clock timers for delayed actions.
pub mod scheduler;
