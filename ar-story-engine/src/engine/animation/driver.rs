use crate::engine::animation::movement::{DirectedMovement, MovementStep};
use crate::engine::animation::sway::{SwayAxis, sway_offset};
use crate::engine::core::settings::StorySettings;
use crate::story::actions::{StoryAction, StoryActionQueue};
use bevy::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

/// Positions to apply and completion actions produced by one movement tick.
#[derive(Debug, Default, PartialEq)]
pub struct MovementFrame {
    pub positions: Vec<(Entity, Vec3)>,
    pub completed: Vec<StoryAction>,
}

/// Procedural animation state for the current scene, keyed by model entity.
#[derive(Resource, Default, Debug)]
pub struct AnimationDriver {
    movements: HashMap<Entity, DirectedMovement>,
    swaying: HashMap<Entity, SwayAxis>,
    /// Rest value per (entity, axis), captured on the first sway update.
    sway_origins: HashMap<(Entity, SwayAxis), f32>,
}

impl AnimationDriver {
    /// Start moving `entity`; an existing movement on it is replaced.
    pub fn start_movement(&mut self, entity: Entity, movement: DirectedMovement) {
        self.movements.insert(entity, movement);
    }

    pub fn stop_movement(&mut self, entity: Entity) -> bool {
        self.movements.remove(&entity).is_some()
    }

    pub fn is_moving(&self, entity: Entity) -> bool {
        self.movements.contains_key(&entity)
    }

    pub fn movement_count(&self) -> usize {
        self.movements.len()
    }

    /// Tick every active movement. Finished movements are dropped and their
    /// completion actions returned exactly once.
    pub fn advance(&mut self, now: Duration) -> MovementFrame {
        let mut frame = MovementFrame::default();
        self.movements.retain(|&entity, movement| match movement.sample(now) {
            MovementStep::Continue(position) => {
                frame.positions.push((entity, position));
                true
            }
            MovementStep::Finished(position) => {
                frame.positions.push((entity, position));
                frame.completed.extend(movement.on_complete.take());
                false
            }
        });
        frame
    }

    pub fn start_sway(&mut self, entity: Entity, axis: SwayAxis) {
        if let Some(previous) = self.swaying.insert(entity, axis) {
            if previous != axis {
                self.sway_origins.remove(&(entity, previous));
            }
        }
    }

    pub fn stop_sway(&mut self, entity: Entity) {
        if let Some(axis) = self.swaying.remove(&entity) {
            self.sway_origins.remove(&(entity, axis));
        }
    }

    pub fn swaying(&self) -> Vec<(Entity, SwayAxis)> {
        self.swaying
            .iter()
            .map(|(&entity, &axis)| (entity, axis))
            .collect()
    }

    /// Rest value for a swaying axis, captured from `current` the first time.
    pub fn sway_origin(&mut self, entity: Entity, axis: SwayAxis, current: f32) -> f32 {
        *self.sway_origins.entry((entity, axis)).or_insert(current)
    }

    /// Forget every movement and sway, including captured origins.
    pub fn clear(&mut self) {
        self.movements.clear();
        self.swaying.clear();
        self.sway_origins.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty() && self.swaying.is_empty() && self.sway_origins.is_empty()
    }
}

pub fn animate_movements(
    time: Res<Time>,
    mut driver: ResMut<AnimationDriver>,
    mut transforms: Query<&mut Transform>,
    mut queue: ResMut<StoryActionQueue>,
) {
    let frame = driver.advance(time.elapsed());
    for (entity, position) in frame.positions {
        if let Ok(mut transform) = transforms.get_mut(entity) {
            transform.translation = position;
        }
    }
    queue.extend(frame.completed);
}

pub fn animate_sway(
    time: Res<Time>,
    settings: Res<StorySettings>,
    mut driver: ResMut<AnimationDriver>,
    mut models: Query<(&mut Transform, Option<&InheritedVisibility>)>,
) {
    let offset = sway_offset(
        time.elapsed_secs(),
        settings.sway_amplitude,
        settings.sway_speed,
    );

    for (entity, axis) in driver.swaying() {
        let Ok((mut transform, visibility)) = models.get_mut(entity) else {
            continue;
        };
        if visibility.is_some_and(|visibility| !visibility.get()) {
            continue;
        }
        let origin = driver.sway_origin(entity, axis, axis.get(transform.translation));
        axis.set(&mut transform.translation, origin + offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::scene_id::SceneId;
    use bevy::ecs::system::RunSystemOnce;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn completion_action_fires_exactly_once() {
        let model = Entity::from_raw(1);
        let mut driver = AnimationDriver::default();
        driver.start_movement(
            model,
            DirectedMovement::new(
                Vec3::ZERO,
                Vec3::new(10.0, 0.0, 0.0),
                5.0,
                ms(0),
                Some(StoryAction::ShowNext {
                    next: SceneId::Passwords,
                }),
            ),
        );

        let frame = driver.advance(ms(1000));
        assert!(frame.completed.is_empty());
        assert!(driver.is_moving(model));

        let frame = driver.advance(ms(2000));
        assert_eq!(frame.positions, vec![(model, Vec3::new(10.0, 0.0, 0.0))]);
        assert_eq!(frame.completed.len(), 1);
        assert!(!driver.is_moving(model));

        assert_eq!(driver.advance(ms(3000)), MovementFrame::default());
    }

    #[test]
    fn new_movement_replaces_old() {
        let model = Entity::from_raw(2);
        let mut driver = AnimationDriver::default();
        driver.start_movement(model, DirectedMovement::new(Vec3::ZERO, Vec3::X, 1.0, ms(0), None));
        driver.start_movement(model, DirectedMovement::new(Vec3::ZERO, Vec3::Y, 1.0, ms(0), None));
        assert_eq!(driver.movement_count(), 1);
        assert_eq!(
            driver.advance(ms(1000)).positions,
            vec![(model, Vec3::Y)]
        );
    }

    #[test]
    fn sway_origin_is_captured_once() {
        let model = Entity::from_raw(3);
        let mut driver = AnimationDriver::default();
        driver.start_sway(model, SwayAxis::Y);

        assert_eq!(driver.sway_origin(model, SwayAxis::Y, 1.0), 1.0);
        assert_eq!(driver.sway_origin(model, SwayAxis::Y, 1.02), 1.0);

        driver.clear();
        assert!(driver.is_empty());
        assert_eq!(driver.sway_origin(model, SwayAxis::Y, 1.02), 1.02);
    }

    #[test]
    fn sway_system_oscillates_around_rest_and_skips_hidden() {
        let mut world = World::new();
        world.init_resource::<Time>();
        world.insert_resource(StorySettings::default());
        world.init_resource::<AnimationDriver>();

        let shown = world
            .spawn((Transform::from_xyz(0.0, 1.0, 0.0), InheritedVisibility::VISIBLE))
            .id();
        let hidden = world
            .spawn((Transform::from_xyz(0.0, 1.0, 0.0), InheritedVisibility::HIDDEN))
            .id();
        {
            let mut driver = world.resource_mut::<AnimationDriver>();
            driver.start_sway(shown, SwayAxis::Y);
            driver.start_sway(hidden, SwayAxis::Y);
        }

        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(0.5));
        world.run_system_once(animate_sway).unwrap();

        let amplitude = StorySettings::default().sway_amplitude;
        let y = world.get::<Transform>(shown).unwrap().translation.y;
        assert!((y - 1.0).abs() <= amplitude + f32::EPSILON);
        assert_ne!(y, 1.0);
        assert_eq!(world.get::<Transform>(hidden).unwrap().translation.y, 1.0);
    }
}
