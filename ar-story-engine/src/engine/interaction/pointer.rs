use crate::engine::camera::viewport_camera::StoryCamera;
use crate::engine::interaction::picking::ScenePicking;
use crate::engine::interaction::registry::InteractionRegistry;
use crate::engine::xr::session::InteractionMode;
use crate::rpc::web_rpc::HostCommand;
use crate::story::actions::StoryActionQueue;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Forward ray of the viewer, used when the host sends a select without a ray.
pub fn camera_forward_ray(camera_transform: &GlobalTransform) -> Ray3d {
    Ray3d::new(camera_transform.translation(), camera_transform.forward())
}

/// Turn mouse clicks and host select events into registry dispatches.
///
/// Mouse clicks only count in pointer mode; host selects are honoured in either
/// mode so a controller can drive the fallback view too.
pub fn dispatch_selections(
    mode: Res<InteractionMode>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut host_commands: EventReader<HostCommand>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<StoryCamera>>,
    picking: ScenePicking,
    mut registry: ResMut<InteractionRegistry>,
    mut queue: ResMut<StoryActionQueue>,
) {
    let camera = camera_query.single().ok();
    let mut rays = Vec::new();

    if *mode == InteractionMode::Pointer && mouse_button.just_pressed(MouseButton::Left) {
        let cursor = windows
            .single()
            .ok()
            .and_then(|window| window.cursor_position());
        if let (Some(cursor), Some((camera, camera_transform))) = (cursor, camera) {
            match camera.viewport_to_world(camera_transform, cursor) {
                Ok(ray) => rays.push(ray),
                Err(err) => debug!("Click outside viewport: {:?}", err),
            }
        }
    }

    for command in host_commands.read() {
        if let HostCommand::Select { ray } = command {
            match (ray, camera) {
                (Some(ray), _) => rays.push(*ray),
                (None, Some((_, camera_transform))) => {
                    rays.push(camera_forward_ray(camera_transform))
                }
                (None, None) => warn!("Select ignored: no ray and no camera"),
            }
        }
    }

    for ray in rays {
        if let Some(fired) = registry.dispatch(ray, &picking) {
            info!("Selected {:?}", fired.target);
            queue.push(fired.action);
        }
    }
}
