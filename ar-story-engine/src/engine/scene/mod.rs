//! Scene graph ownership: what a scene spawns and how it is torn down.
//!
//! Scene procedures build their content through [`stage::SceneStage`], which tags
//! every entity as a scene member. The two reusable control buttons persist across
//! scenes and are parked rather than destroyed.

/// Reusable Next and Quit buttons.
pub mod buttons;

/// Scene teardown and scene-owned GPU resources.
pub mod disposal;

/// Setup façade handed to scene procedures.
pub mod stage;

/// World-space text panels with projected screen labels, plus the caption line.
pub mod text_plate;
