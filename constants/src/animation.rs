/// Walking speed of characters entering a scene, in metres per second.
pub const WALK_SPEED: f32 = 0.8;

/// Speed used for props sliding into place, in metres per second.
pub const PROP_SPEED: f32 = 0.5;

/// Default idle sway offset in metres.
pub const SWAY_AMPLITUDE: f32 = 0.03;

/// Default idle sway angular speed in radians per second.
pub const SWAY_SPEED: f32 = 1.6;
