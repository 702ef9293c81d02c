use crate::engine::assets::asset_registry::AssetRegistry;
use crate::engine::assets::story_asset::StoryAsset;
use crate::engine::interaction::picking::PickBounds;
use crate::engine::interaction::registry::{InteractionHandle, InteractionRegistry};
use crate::story::actions::StoryAction;
use bevy::prelude::*;
use constants::render_settings::{
    BUTTON_PARK_POSITION, BUTTON_PICK_HALF_EXTENTS, NEXT_BUTTON_POSITION, QUIT_BUTTON_POSITION,
};

/// The two control buttons that outlive every scene.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReusableButton {
    Next,
    Quit,
}

impl ReusableButton {
    pub const ALL: [ReusableButton; 2] = [ReusableButton::Next, ReusableButton::Quit];

    pub fn asset(self) -> StoryAsset {
        match self {
            Self::Next => StoryAsset::NextButton,
            Self::Quit => StoryAsset::QuitButton,
        }
    }

    pub fn position(self) -> Vec3 {
        match self {
            Self::Next => Vec3::from(NEXT_BUTTON_POSITION),
            Self::Quit => Vec3::from(QUIT_BUTTON_POSITION),
        }
    }
}

/// Spawn both buttons hidden at the park position.
pub fn spawn_reusable_buttons(
    mut commands: Commands,
    registry: Res<AssetRegistry>,
    existing: Query<&ReusableButton>,
) {
    for which in ReusableButton::ALL {
        if existing.iter().any(|button| *button == which) {
            continue;
        }
        let scene = match registry.model(which.asset()) {
            Ok(model) => model.scene.clone(),
            Err(err) => {
                error!("Cannot create {:?} button: {}", which, err);
                continue;
            }
        };
        commands.spawn((
            Name::new(which.asset().as_str()),
            which,
            SceneRoot(scene),
            Transform::from_translation(Vec3::from(BUTTON_PARK_POSITION)),
            Visibility::Hidden,
            PickBounds::new(BUTTON_PICK_HALF_EXTENTS),
        ));
    }
}

pub fn find_button(world: &mut World, which: ReusableButton) -> Option<Entity> {
    let mut buttons = world.query::<(Entity, &ReusableButton)>();
    buttons
        .iter(world)
        .find(|(_, button)| **button == which)
        .map(|(entity, _)| entity)
}

/// Make a button visible and wire it to `action` as a one-shot interaction.
///
/// A button a scene attached to one of its models keeps its local placement;
/// a free button moves to its default spot.
pub fn show_button(
    world: &mut World,
    which: ReusableButton,
    action: StoryAction,
) -> Option<InteractionHandle> {
    let Some(entity) = find_button(world, which) else {
        warn!("{:?} button is not available", which);
        return None;
    };

    let attached = world.get::<ChildOf>(entity).is_some();
    if let Some(mut transform) = world.get_mut::<Transform>(entity) {
        if !attached {
            transform.translation = which.position();
        }
    }
    if let Some(mut visibility) = world.get_mut::<Visibility>(entity) {
        *visibility = Visibility::Visible;
    }

    let mut registry = world.get_resource_mut::<InteractionRegistry>()?;
    Some(registry.register(entity, action, true))
}

/// Parent a button under a scene model at a local offset.
pub fn attach_button(world: &mut World, which: ReusableButton, parent: Entity, offset: Vec3) -> bool {
    let Some(entity) = find_button(world, which) else {
        return false;
    };
    if world.get_entity(parent).is_err() {
        return false;
    }
    world
        .entity_mut(entity)
        .insert((ChildOf(parent), Transform::from_translation(offset)));
    true
}

/// Detach both buttons from whatever they hang under, hide them and park them.
/// Returns how many buttons were parked.
pub fn park_buttons(world: &mut World) -> usize {
    let mut buttons = world.query_filtered::<Entity, With<ReusableButton>>();
    let entities: Vec<Entity> = buttons.iter(world).collect();

    for &entity in &entities {
        let mut button = world.entity_mut(entity);
        button.remove::<ChildOf>();
        button.insert((
            Transform::from_translation(Vec3::from(BUTTON_PARK_POSITION)),
            Visibility::Hidden,
        ));
    }
    entities.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::scene_id::SceneId;

    fn world_with_button() -> (World, Entity) {
        let mut world = World::new();
        world.init_resource::<InteractionRegistry>();
        let button = world
            .spawn((
                ReusableButton::Next,
                Transform::from_translation(Vec3::from(BUTTON_PARK_POSITION)),
                Visibility::Hidden,
            ))
            .id();
        (world, button)
    }

    #[test]
    fn show_places_reveals_and_registers_once() {
        let (mut world, button) = world_with_button();

        let handle = show_button(
            &mut world,
            ReusableButton::Next,
            StoryAction::GoTo(SceneId::Phishing),
        );
        assert!(handle.is_some());
        assert_eq!(
            world.get::<Transform>(button).unwrap().translation,
            ReusableButton::Next.position()
        );
        assert_eq!(*world.get::<Visibility>(button).unwrap(), Visibility::Visible);
        assert_eq!(
            world.resource::<InteractionRegistry>().handle_for(button),
            handle
        );
    }

    #[test]
    fn attached_button_keeps_local_offset_and_parks_free() {
        let (mut world, button) = world_with_button();
        let laptop = world.spawn(Transform::default()).id();

        assert!(attach_button(
            &mut world,
            ReusableButton::Next,
            laptop,
            Vec3::new(0.0, 0.4, 0.0)
        ));
        show_button(&mut world, ReusableButton::Next, StoryAction::ShowQuit);
        assert_eq!(
            world.get::<Transform>(button).unwrap().translation,
            Vec3::new(0.0, 0.4, 0.0)
        );

        assert_eq!(park_buttons(&mut world), 1);
        assert!(world.get::<ChildOf>(button).is_none());
        assert_eq!(*world.get::<Visibility>(button).unwrap(), Visibility::Hidden);
    }

    #[test]
    fn missing_button_is_reported_not_fatal() {
        let mut world = World::new();
        world.init_resource::<InteractionRegistry>();
        assert!(show_button(&mut world, ReusableButton::Quit, StoryAction::EndSession).is_none());
        assert!(!attach_button(
            &mut world,
            ReusableButton::Quit,
            Entity::from_raw(42),
            Vec3::ZERO
        ));
    }
}
