use crate::engine::animation::clips::ClipMixer;
use crate::engine::animation::driver::AnimationDriver;
use crate::engine::interaction::registry::InteractionRegistry;
use crate::engine::scene::buttons::park_buttons;
use crate::story::actions::StoryActionQueue;
use crate::story::scheduler::StoryScheduler;
use bevy::prelude::*;
use std::collections::HashSet;

/// Marks an entity spawned by a scene; removed with its descendants on teardown.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SceneMember;

/// GPU assets created by the current scene, released on teardown.
///
/// Loaded models and audio are not tracked here; they live in the asset registry.
#[derive(Resource, Default, Debug)]
pub struct SceneResources {
    meshes: Vec<Handle<Mesh>>,
    materials: Vec<Handle<StandardMaterial>>,
}

impl SceneResources {
    pub fn track_mesh(&mut self, mesh: Handle<Mesh>) {
        self.meshes.push(mesh);
    }

    pub fn track_material(&mut self, material: Handle<StandardMaterial>) {
        self.materials.push(material);
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }
}

/// What a teardown removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisposalReport {
    pub buttons_parked: usize,
    pub roots_despawned: usize,
    pub meshes_released: usize,
    pub materials_released: usize,
    pub interactions_cleared: usize,
    pub timers_cancelled: usize,
    pub actions_dropped: usize,
}

/// Remove everything the current scene created.
///
/// Buttons are detached first so despawning their parent cannot take them along.
/// Lights, the camera and anything else without `SceneMember` are untouched.
pub fn clear_scene(world: &mut World) -> DisposalReport {
    let mut report = DisposalReport {
        buttons_parked: park_buttons(world),
        ..default()
    };

    let mut members = world.query_filtered::<(Entity, Option<&ChildOf>), With<SceneMember>>();
    let listed: Vec<(Entity, Option<Entity>)> = members
        .iter(world)
        .map(|(entity, child_of)| (entity, child_of.map(|child_of| child_of.parent())))
        .collect();
    let member_set: HashSet<Entity> = listed.iter().map(|(entity, _)| *entity).collect();

    for (entity, parent) in listed {
        let is_root = parent.is_none_or(|parent| !member_set.contains(&parent));
        if is_root && world.despawn(entity) {
            report.roots_despawned += 1;
        }
    }

    let owned = world
        .get_resource_mut::<SceneResources>()
        .map(|mut resources| std::mem::take(&mut *resources));
    if let Some(owned) = owned {
        if let Some(mut meshes) = world.get_resource_mut::<Assets<Mesh>>() {
            report.meshes_released = owned
                .meshes
                .iter()
                .filter(|mesh| meshes.remove(*mesh).is_some())
                .count();
        }
        if let Some(mut materials) = world.get_resource_mut::<Assets<StandardMaterial>>() {
            report.materials_released = owned
                .materials
                .iter()
                .filter(|material| materials.remove(*material).is_some())
                .count();
        }
    }

    if let Some(mut registry) = world.get_resource_mut::<InteractionRegistry>() {
        report.interactions_cleared = registry.len();
        registry.clear();
    }

    if let Some(mut driver) = world.get_resource_mut::<AnimationDriver>() {
        driver.clear();
    }

    let bound_players = world
        .get_resource::<ClipMixer>()
        .map(ClipMixer::bound_players)
        .unwrap_or_default();
    for player in bound_players {
        if let Some(mut animation_player) = world.get_mut::<AnimationPlayer>(player) {
            animation_player.stop_all();
        }
        if let Ok(mut entity) = world.get_entity_mut(player) {
            entity.remove::<AnimationGraphHandle>();
        }
    }
    if let Some(mut mixer) = world.get_resource_mut::<ClipMixer>() {
        mixer.clear();
    }

    if let Some(mut scheduler) = world.get_resource_mut::<StoryScheduler>() {
        report.timers_cancelled = scheduler.cancel_all();
    }

    // Queued actions were produced for the scene that is going away.
    if let Some(mut queue) = world.get_resource_mut::<StoryActionQueue>() {
        report.actions_dropped = queue.len();
        queue.clear();
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::animation::clips::ClipMode;
    use crate::engine::animation::movement::DirectedMovement;
    use crate::engine::animation::sway::SwayAxis;
    use crate::engine::scene::buttons::ReusableButton;
    use crate::story::actions::StoryAction;
    use crate::story::scene_id::SceneId;
    use std::time::Duration;

    #[derive(Component)]
    struct Permanent;

    fn story_world() -> World {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        world.init_resource::<Assets<StandardMaterial>>();
        world.init_resource::<SceneResources>();
        world.init_resource::<InteractionRegistry>();
        world.init_resource::<AnimationDriver>();
        world.init_resource::<ClipMixer>();
        world.init_resource::<StoryScheduler>();
        world.init_resource::<StoryActionQueue>();
        world
    }

    #[test]
    fn teardown_leaves_only_permanent_entities_and_parked_buttons() {
        let mut world = story_world();
        let light = world.spawn((Permanent, Name::new("sun"))).id();
        let camera = world.spawn((Permanent, Name::new("camera"))).id();
        let buttons: Vec<Entity> = ReusableButton::ALL
            .into_iter()
            .map(|which| world.spawn((which, Transform::default(), Visibility::Hidden)).id())
            .collect();

        // A model with a child part, the Next button hung under it.
        let model = world.spawn((SceneMember, Transform::default())).id();
        let part = world.spawn((SceneMember, Transform::default(), ChildOf(model))).id();
        world
            .entity_mut(buttons[0])
            .insert((ChildOf(part), Visibility::Visible));
        let narration = world.spawn(SceneMember).id();

        let mesh = world
            .resource_mut::<Assets<Mesh>>()
            .add(Cuboid::default());
        let material = world
            .resource_mut::<Assets<StandardMaterial>>()
            .add(StandardMaterial::default());
        {
            let mut resources = world.resource_mut::<SceneResources>();
            resources.track_mesh(mesh.clone());
            resources.track_material(material.clone());
        }

        world
            .resource_mut::<InteractionRegistry>()
            .register(buttons[0], StoryAction::GoTo(SceneId::Passwords), true);
        world.resource_mut::<AnimationDriver>().start_movement(
            model,
            DirectedMovement::new(Vec3::ZERO, Vec3::X, 1.0, Duration::ZERO, None),
        );
        world
            .resource_mut::<AnimationDriver>()
            .start_sway(model, SwayAxis::Y);
        world
            .resource_mut::<ClipMixer>()
            .play(model, Handle::default(), ClipMode::Loop);
        world.resource_mut::<StoryScheduler>().schedule(
            Duration::ZERO,
            Duration::from_millis(2000),
            StoryAction::ShowNext {
                next: SceneId::Passwords,
            },
        );

        world.resource_mut::<StoryActionQueue>().push(StoryAction::Sway {
            target: part,
            axis: SwayAxis::X,
        });

        let report = clear_scene(&mut world);

        assert_eq!(
            report,
            DisposalReport {
                buttons_parked: 2,
                roots_despawned: 2,
                meshes_released: 1,
                materials_released: 1,
                interactions_cleared: 1,
                timers_cancelled: 1,
                actions_dropped: 1,
            }
        );

        let mut remaining: Vec<Entity> = world
            .query_filtered::<Entity, Or<(With<Permanent>, With<ReusableButton>, With<SceneMember>)>>()
            .iter(&world)
            .collect();
        remaining.sort();
        let mut expected = vec![light, camera, buttons[0], buttons[1]];
        expected.sort();
        assert_eq!(remaining, expected);

        for button in buttons {
            assert!(world.get::<ChildOf>(button).is_none());
            assert_eq!(*world.get::<Visibility>(button).unwrap(), Visibility::Hidden);
        }
        assert!(world.get_entity(narration).is_err());
        assert!(!world.resource::<Assets<Mesh>>().contains(&mesh));
        assert!(!world.resource::<Assets<StandardMaterial>>().contains(&material));
        assert!(world.resource::<InteractionRegistry>().is_empty());
        assert!(world.resource::<AnimationDriver>().is_empty());
        assert!(world.resource::<ClipMixer>().is_empty());
        assert!(world.resource::<StoryScheduler>().is_empty());
        assert!(world.resource::<StoryActionQueue>().is_empty());
    }

    #[test]
    fn clearing_an_empty_stage_is_harmless() {
        let mut world = story_world();
        assert_eq!(clear_scene(&mut world), DisposalReport::default());
        assert_eq!(clear_scene(&mut world), DisposalReport::default());
    }
}
