use crate::engine::camera::viewport_camera::StoryCamera;
use crate::engine::interaction::picking::PickBounds;
use crate::engine::scene::disposal::{SceneMember, SceneResources};
use crate::rpc::dom::Dom;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;
use constants::dom::SUBTITLE;
use constants::render_settings::{TEXT_PLATE_COLOUR, TEXT_PLATE_FONT_SIZE, TEXT_PLATE_SIZE};

const LABEL_WIDTH_PX: f32 = 260.0;

/// World-space panel whose text is drawn by a screen-space label.
#[derive(Component, Debug, Clone, Copy)]
pub struct TextPlate {
    pub label: Entity,
}

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlateLabel;

/// Caption shown under the AR view.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Subtitle(pub String);

#[derive(Component)]
pub struct SubtitleText;

/// Spawn a plate panel and its label, both owned by the current scene.
/// Returns the panel entity.
pub fn spawn_text_plate(world: &mut World, text: &str, transform: Transform) -> Option<Entity> {
    let size = Vec3::from(TEXT_PLATE_SIZE);
    let mesh = world
        .get_resource_mut::<Assets<Mesh>>()?
        .add(Cuboid::from_size(size));
    let [r, g, b, a] = TEXT_PLATE_COLOUR;
    let material = world
        .get_resource_mut::<Assets<StandardMaterial>>()?
        .add(StandardMaterial {
            base_color: Color::linear_rgba(r, g, b, a),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });

    if let Some(mut resources) = world.get_resource_mut::<SceneResources>() {
        resources.track_mesh(mesh.clone());
        resources.track_material(material.clone());
    }

    let label = world
        .spawn((
            Text::new(text),
            TextFont {
                font_size: TEXT_PLATE_FONT_SIZE,
                ..default()
            },
            TextColor(Color::WHITE),
            TextLayout::new_with_justify(JustifyText::Center),
            Node {
                position_type: PositionType::Absolute,
                width: Val::Px(LABEL_WIDTH_PX),
                ..default()
            },
            Visibility::Hidden,
            PlateLabel,
            SceneMember,
        ))
        .id();

    let plate = world
        .spawn((
            Name::new("text_plate"),
            Mesh3d(mesh),
            MeshMaterial3d(material),
            transform,
            PickBounds::new(size * 0.5),
            TextPlate { label },
            SceneMember,
        ))
        .id();
    Some(plate)
}

/// Top-left corner for a label centred on the plate's screen position, or `None`
/// when the label should be hidden.
pub fn label_origin(screen: Option<Vec2>, visible: bool) -> Option<Vec2> {
    if !visible {
        return None;
    }
    screen.map(|pos| pos - Vec2::new(LABEL_WIDTH_PX * 0.5, TEXT_PLATE_FONT_SIZE * 0.5))
}

/// Project every plate to the screen and move its label there.
pub fn place_plate_labels(
    camera_query: Query<(&Camera, &GlobalTransform), With<StoryCamera>>,
    plates: Query<(&GlobalTransform, &InheritedVisibility, &TextPlate)>,
    mut labels: Query<(&mut Node, &mut Visibility), With<PlateLabel>>,
) {
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    for (plate_transform, plate_visibility, plate) in &plates {
        let Ok((mut node, mut visibility)) = labels.get_mut(plate.label) else {
            continue;
        };
        let screen = camera
            .world_to_viewport(camera_transform, plate_transform.translation())
            .ok();
        match label_origin(screen, plate_visibility.get()) {
            Some(origin) => {
                node.left = Val::Px(origin.x);
                node.top = Val::Px(origin.y);
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

/// Push caption changes to the host page and the native overlay.
pub fn sync_subtitle(
    subtitle: Res<Subtitle>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut texts: Query<&mut Text, With<SubtitleText>>,
) {
    if !subtitle.is_changed() {
        return;
    }
    Dom::new(&mut rpc_interface).set_text(SUBTITLE, &subtitle.0);
    for mut text in &mut texts {
        text.0 = subtitle.0.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_hidden_when_plate_hidden_or_off_screen() {
        assert_eq!(label_origin(Some(Vec2::new(400.0, 300.0)), false), None);
        assert_eq!(label_origin(None, true), None);
    }

    #[test]
    fn label_centred_on_plate() {
        let origin = label_origin(Some(Vec2::new(400.0, 300.0)), true).unwrap();
        assert_eq!(origin.x, 400.0 - LABEL_WIDTH_PX * 0.5);
        assert_eq!(origin.y, 300.0 - TEXT_PLATE_FONT_SIZE * 0.5);
    }

    #[test]
    fn plate_assets_are_tracked_for_disposal() {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        world.init_resource::<Assets<StandardMaterial>>();
        world.init_resource::<SceneResources>();

        let plate = spawn_text_plate(&mut world, "Think before you click", Transform::default())
            .expect("plate spawned");
        let label = world.get::<TextPlate>(plate).unwrap().label;

        assert!(world.get::<SceneMember>(label).is_some());
        let resources = world.resource::<SceneResources>();
        assert_eq!(resources.mesh_count(), 1);
        assert_eq!(resources.material_count(), 1);
    }
}
