use crate::engine::xr::session::InteractionMode;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::EulerRot;
use bevy::prelude::*;

/// The single story camera. Permanent; never part of a scene.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct StoryCamera;

/// Orbit state for the pointer-mode fallback view.
#[derive(Resource, Debug, Clone)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ViewportCamera {
    fn default() -> Self {
        // Eye height, looking at the stage a couple of metres ahead.
        Self {
            focus_point: Vec3::new(0.0, 1.0, -2.5),
            distance: 3.0,
            pitch: -0.15,
            yaw: 0.0,
            min_distance: 1.0,
            max_distance: 8.0,
        }
    }
}

impl ViewportCamera {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Camera transform orbiting `focus_point` at `distance`.
    pub fn transform(&self) -> Transform {
        let rotation = self.rotation();
        Transform {
            translation: self.focus_point + rotation * Vec3::Z * self.distance,
            rotation,
            ..default()
        }
    }

    pub fn orbit(&mut self, delta: Vec2) {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        self.yaw += -delta.x * yaw_sens;
        self.pitch = (self.pitch - delta.y * pitch_sens).clamp(-1.2, 1.2);
    }

    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance * (1.0 - amount * 0.1)).clamp(self.min_distance, self.max_distance);
    }
}

pub fn spawn_story_camera(commands: &mut Commands) {
    let viewport = ViewportCamera::default();
    commands.spawn((Camera3d::default(), viewport.transform(), StoryCamera));
    commands.insert_resource(viewport);
}

/// Right-drag orbits, the wheel zooms. Pointer mode only.
pub fn camera_controller(
    mode: Res<InteractionMode>,
    mut camera_query: Query<&mut Transform, With<StoryCamera>>,
    mut viewport: ResMut<ViewportCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    let scroll_accum: f32 = scroll_events
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        })
        .sum();

    if *mode != InteractionMode::Pointer {
        return;
    }
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        viewport.orbit(mouse_delta);
    }
    if scroll_accum.abs() > f32::EPSILON {
        viewport.zoom(scroll_accum);
    }

    let target = viewport.transform();
    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform
        .translation
        .lerp(target.translation, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target.rotation, lerp_speed);
}
