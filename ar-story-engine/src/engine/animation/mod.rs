//! Time-based procedural animation shared by every scene.
//!
//! Directed movements and idle sway live in side tables keyed by entity and are
//! ticked once per frame from the frame clock. glTF clips are driven through a
//! paused `AnimationPlayer` whose time comes from the clip mixer.

/// glTF clip playback clocks and player binding.
pub mod clips;

/// Per-entity movement and sway tables and their frame systems.
pub mod driver;

/// Eased straight-line movement.
pub mod movement;

/// Idle sway along one axis.
pub mod sway;
