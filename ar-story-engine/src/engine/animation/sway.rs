use bevy::prelude::*;

/// Axis an idle sway oscillates along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwayAxis {
    X,
    Y,
    Z,
}

impl SwayAxis {
    pub fn get(self, v: Vec3) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }

    pub fn set(self, v: &mut Vec3, value: f32) {
        match self {
            Self::X => v.x = value,
            Self::Y => v.y = value,
            Self::Z => v.z = value,
        }
    }
}

pub fn sway_offset(elapsed_secs: f32, amplitude: f32, speed: f32) -> f32 {
    amplitude * (elapsed_secs * speed).sin()
}
