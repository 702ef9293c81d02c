use crate::story::actions::StoryAction;
use bevy::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InteractionHandle(u64);

/// A ray intersection reported by the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub distance: f32,
}

/// The parts of the scene graph the registry needs to resolve a click.
pub trait RaycastScene {
    fn is_visible(&self, entity: Entity) -> bool;

    fn parent(&self, entity: Entity) -> Option<Entity>;

    /// Every intersection of `ray` with `roots` and their descendants, in any order.
    fn cast(&self, ray: Ray3d, roots: &[Entity]) -> Vec<RayHit>;
}

#[derive(Debug, Clone)]
struct InteractionEntry {
    target: Entity,
    action: StoryAction,
    active: bool,
    once: bool,
    triggered: bool,
}

impl InteractionEntry {
    fn is_armed(&self) -> bool {
        self.active && !(self.once && self.triggered)
    }
}

/// Result of a successful dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionFired {
    pub handle: InteractionHandle,
    pub target: Entity,
    pub action: StoryAction,
}

/// Clickable objects of the current scene and what clicking them does.
///
/// One entry per target; registering a target again replaces its entry.
#[derive(Resource, Default, Debug)]
pub struct InteractionRegistry {
    entries: HashMap<InteractionHandle, InteractionEntry>,
    by_target: HashMap<Entity, InteractionHandle>,
    next_id: u64,
}

impl InteractionRegistry {
    pub fn register(&mut self, target: Entity, action: StoryAction, once: bool) -> InteractionHandle {
        if let Some(previous) = self.by_target.remove(&target) {
            self.entries.remove(&previous);
        }

        let handle = InteractionHandle(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            handle,
            InteractionEntry {
                target,
                action,
                active: true,
                once,
                triggered: false,
            },
        );
        self.by_target.insert(target, handle);
        handle
    }

    pub fn enable(&mut self, handle: InteractionHandle) -> bool {
        self.set_active(handle, true)
    }

    pub fn disable(&mut self, handle: InteractionHandle) -> bool {
        self.set_active(handle, false)
    }

    fn set_active(&mut self, handle: InteractionHandle, active: bool) -> bool {
        match self.entries.get_mut(&handle) {
            Some(entry) => {
                entry.active = active;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, handle: InteractionHandle) -> bool {
        match self.entries.remove(&handle) {
            Some(entry) => {
                self.by_target.remove(&entry.target);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_target.clear();
    }

    pub fn handle_for(&self, target: Entity) -> Option<InteractionHandle> {
        self.by_target.get(&target).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fire at most one entry for `ray`.
    ///
    /// Only armed entries with visible targets take part. The nearest hit wins and
    /// is resolved to its closest armed ancestor (itself included); hits further
    /// along the ray are ignored.
    pub fn dispatch(&mut self, ray: Ray3d, scene: &impl RaycastScene) -> Option<InteractionFired> {
        let candidates: Vec<Entity> = self
            .entries
            .values()
            .filter(|entry| entry.is_armed() && scene.is_visible(entry.target))
            .map(|entry| entry.target)
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let nearest = scene
            .cast(ray, &candidates)
            .into_iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))?;

        let mut node = Some(nearest.entity);
        while let Some(entity) = node {
            if candidates.contains(&entity) {
                let handle = self.by_target.get(&entity).copied()?;
                let entry = self.entries.get_mut(&handle)?;
                if entry.once {
                    entry.triggered = true;
                }
                return Some(InteractionFired {
                    handle,
                    target: entity,
                    action: entry.action.clone(),
                });
            }
            node = scene.parent(entity);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::scene_id::SceneId;
    use std::collections::HashSet;

    /// Scene graph stub: explicit parents, hidden set and a fixed hit list.
    #[derive(Default)]
    struct StubScene {
        parents: HashMap<Entity, Entity>,
        hidden: HashSet<Entity>,
        hits: Vec<RayHit>,
    }

    impl StubScene {
        fn under(&self, entity: Entity, root: Entity) -> bool {
            let mut node = Some(entity);
            while let Some(current) = node {
                if current == root {
                    return true;
                }
                node = self.parents.get(&current).copied();
            }
            false
        }
    }

    impl RaycastScene for StubScene {
        fn is_visible(&self, entity: Entity) -> bool {
            !self.hidden.contains(&entity)
        }

        fn parent(&self, entity: Entity) -> Option<Entity> {
            self.parents.get(&entity).copied()
        }

        fn cast(&self, _ray: Ray3d, roots: &[Entity]) -> Vec<RayHit> {
            self.hits
                .iter()
                .copied()
                .filter(|hit| roots.iter().any(|&root| self.under(hit.entity, root)))
                .collect()
        }
    }

    fn e(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    fn hit(entity: Entity, distance: f32) -> RayHit {
        RayHit { entity, distance }
    }

    fn forward_ray() -> Ray3d {
        Ray3d::new(Vec3::ZERO, Dir3::NEG_Z)
    }

    #[test]
    fn nearest_hit_resolves_to_registered_ancestor() {
        let (model, mesh, button) = (e(1), e(2), e(3));
        let mut scene = StubScene::default();
        scene.parents.insert(mesh, model);
        scene.hits = vec![hit(button, 3.0), hit(mesh, 1.5)];

        let mut registry = InteractionRegistry::default();
        registry.register(model, StoryAction::ShowQuit, false);
        registry.register(button, StoryAction::EndSession, false);

        let fired = registry.dispatch(forward_ray(), &scene).expect("a hit");
        assert_eq!(fired.target, model);
        assert_eq!(fired.action, StoryAction::ShowQuit);
    }

    #[test]
    fn once_entries_fire_a_single_time() {
        let button = e(7);
        let mut scene = StubScene::default();
        scene.hits = vec![hit(button, 2.0)];

        let mut registry = InteractionRegistry::default();
        registry.register(button, StoryAction::GoTo(SceneId::Passwords), true);

        assert!(registry.dispatch(forward_ray(), &scene).is_some());
        assert!(registry.dispatch(forward_ray(), &scene).is_none());
    }

    #[test]
    fn hidden_and_disabled_targets_are_ignored() {
        let (shown, hidden) = (e(1), e(2));
        let mut scene = StubScene::default();
        scene.hidden.insert(hidden);
        scene.hits = vec![hit(hidden, 1.0), hit(shown, 2.0)];

        let mut registry = InteractionRegistry::default();
        let shown_handle = registry.register(shown, StoryAction::ShowQuit, false);
        registry.register(hidden, StoryAction::EndSession, false);

        let fired = registry.dispatch(forward_ray(), &scene).expect("a hit");
        assert_eq!(fired.target, shown);

        registry.disable(shown_handle);
        assert!(registry.dispatch(forward_ray(), &scene).is_none());
        registry.enable(shown_handle);
        assert!(registry.dispatch(forward_ray(), &scene).is_some());
    }

    #[test]
    fn re_registering_replaces_the_entry() {
        let target = e(4);
        let mut registry = InteractionRegistry::default();
        let first = registry.register(target, StoryAction::ShowQuit, true);
        let second = registry.register(target, StoryAction::EndSession, false);

        assert_ne!(first, second);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.handle_for(target), Some(second));
        assert!(!registry.remove(first));
        assert!(registry.remove(second));
        assert!(registry.is_empty());
    }

    #[test]
    fn miss_fires_nothing() {
        let mut registry = InteractionRegistry::default();
        registry.register(e(1), StoryAction::ShowQuit, false);
        assert!(registry.dispatch(forward_ray(), &StubScene::default()).is_none());

        registry.clear();
        assert!(registry.is_empty());
    }
}
