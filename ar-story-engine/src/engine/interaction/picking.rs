use crate::engine::interaction::ray::ray_hits_obb;
use crate::engine::interaction::registry::{RayHit, RaycastScene};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::render::primitives::Aabb;

/// Explicit pick volume for entities whose meshes may not be spawned yet.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PickBounds {
    pub half_extents: Vec3,
}

impl PickBounds {
    pub fn new(half_extents: impl Into<Vec3>) -> Self {
        Self {
            half_extents: half_extents.into(),
        }
    }
}

/// Scene graph access for resolving clicks against world geometry.
#[derive(SystemParam)]
pub struct ScenePicking<'w, 's> {
    nodes: Query<
        'w,
        's,
        (
            &'static GlobalTransform,
            Option<&'static Aabb>,
            Option<&'static PickBounds>,
            Option<&'static InheritedVisibility>,
        ),
    >,
    parents: Query<'w, 's, &'static ChildOf>,
    children: Query<'w, 's, &'static Children>,
}

impl ScenePicking<'_, '_> {
    fn hit_distance(&self, ray: Ray3d, entity: Entity) -> Option<f32> {
        let (xf, aabb, bounds, _) = self.nodes.get(entity).ok()?;
        let mesh_hit = aabb.and_then(|aabb| {
            ray_hits_obb(ray, xf, aabb.center.into(), aabb.half_extents.into())
        });
        let bounds_hit =
            bounds.and_then(|bounds| ray_hits_obb(ray, xf, Vec3::ZERO, bounds.half_extents));
        match (mesh_hit, bounds_hit) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

impl RaycastScene for ScenePicking<'_, '_> {
    fn is_visible(&self, entity: Entity) -> bool {
        match self.nodes.get(entity) {
            Ok((_, _, _, visibility)) => visibility.is_none_or(|visibility| visibility.get()),
            Err(_) => false,
        }
    }

    fn parent(&self, entity: Entity) -> Option<Entity> {
        self.parents.get(entity).ok().map(|child_of| child_of.parent())
    }

    fn cast(&self, ray: Ray3d, roots: &[Entity]) -> Vec<RayHit> {
        let mut hits = Vec::new();
        let mut stack = roots.to_vec();

        while let Some(entity) = stack.pop() {
            if !self.is_visible(entity) {
                continue;
            }
            if let Some(distance) = self.hit_distance(ray, entity) {
                hits.push(RayHit { entity, distance });
            }
            if let Ok(children) = self.children.get(entity) {
                stack.extend_from_slice(children);
            }
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::interaction::registry::InteractionRegistry;
    use crate::story::actions::StoryAction;
    use bevy::ecs::system::SystemState;

    fn node(world: &mut World, translation: Vec3, visible: bool) -> Entity {
        world
            .spawn((
                GlobalTransform::from_translation(translation),
                if visible {
                    InheritedVisibility::VISIBLE
                } else {
                    InheritedVisibility::HIDDEN
                },
            ))
            .id()
    }

    #[test]
    fn casts_through_descendants_and_skips_hidden_subtrees() {
        let mut world = World::new();
        let model = node(&mut world, Vec3::new(0.0, 0.0, -4.0), true);
        let part = node(&mut world, Vec3::new(0.0, 0.0, -2.0), true);
        world.entity_mut(part).insert((
            ChildOf(model),
            Aabb::from_min_max(Vec3::splat(-0.2), Vec3::splat(0.2)),
        ));
        let hidden = node(&mut world, Vec3::new(0.0, 0.0, -1.0), false);
        world
            .entity_mut(hidden)
            .insert((ChildOf(model), PickBounds::new([0.5, 0.5, 0.5])));

        let mut state: SystemState<ScenePicking> = SystemState::new(&mut world);
        let picking = state.get(&world);
        let ray = Ray3d::new(Vec3::ZERO, Dir3::NEG_Z);

        let hits = picking.cast(ray, &[model]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity, part);
        assert!((hits[0].distance - 1.8).abs() < 1e-5);
        assert_eq!(picking.parent(part), Some(model));
        assert!(!picking.is_visible(hidden));
    }

    #[test]
    fn registry_dispatch_against_world_geometry() {
        let mut world = World::new();
        let button = node(&mut world, Vec3::new(0.0, 1.0, -2.0), true);
        world.entity_mut(button).insert(PickBounds::new([0.15, 0.08, 0.05]));

        let mut registry = InteractionRegistry::default();
        registry.register(button, StoryAction::ShowQuit, true);

        let mut state: SystemState<ScenePicking> = SystemState::new(&mut world);
        let picking = state.get(&world);

        let miss = Ray3d::new(Vec3::new(1.0, 1.0, 0.0), Dir3::NEG_Z);
        assert!(registry.dispatch(miss, &picking).is_none());

        let aimed = Ray3d::new(Vec3::new(0.0, 1.0, 0.0), Dir3::NEG_Z);
        let fired = registry.dispatch(aimed, &picking).expect("button hit");
        assert_eq!(fired.target, button);
    }
}
