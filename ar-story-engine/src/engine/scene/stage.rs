use crate::engine::assets::asset_registry::AssetRegistry;
use crate::engine::assets::story_asset::StoryAsset;
use crate::engine::core::settings::StorySettings;
use crate::engine::interaction::registry::{InteractionHandle, InteractionRegistry};
use crate::engine::scene::buttons::{ReusableButton, attach_button};
use crate::engine::scene::disposal::SceneMember;
use crate::engine::scene::text_plate::spawn_text_plate;
use crate::story::actions::{StoryAction, StoryActionQueue};
use crate::story::quiz::{QuizQuestion, QuizState};
use crate::story::scene_id::SceneId;
use crate::story::scheduler::{StoryScheduler, TimerHandle};
use bevy::prelude::*;
use std::time::Duration;

/// What a scene's setup procedure can touch.
///
/// Everything spawned through the stage is a scene member, so teardown finds it
/// without the scene keeping track.
pub struct SceneStage<'w> {
    world: &'w mut World,
    scene: SceneId,
}

impl<'w> SceneStage<'w> {
    pub fn new(world: &'w mut World, scene: SceneId) -> Self {
        Self { world, scene }
    }

    pub fn settings(&self) -> StorySettings {
        self.world
            .get_resource::<StorySettings>()
            .cloned()
            .unwrap_or_default()
    }

    pub fn now(&self) -> Duration {
        self.world
            .get_resource::<Time>()
            .map(Time::elapsed)
            .unwrap_or_default()
    }

    /// Instance a loaded model. A model that is not loaded is logged and skipped.
    pub fn spawn_model(&mut self, asset: StoryAsset, transform: Transform) -> Option<Entity> {
        let scene = match self.world.get_resource::<AssetRegistry>() {
            Some(registry) => registry.model(asset).map(|model| model.scene.clone()),
            None => return None,
        };
        match scene {
            Ok(scene) => Some(
                self.world
                    .spawn((
                        Name::new(asset.as_str()),
                        SceneRoot(scene),
                        transform,
                        SceneMember,
                    ))
                    .id(),
            ),
            Err(err) => {
                warn!("Scene `{}`: skipping model: {}", self.scene, err);
                None
            }
        }
    }

    pub fn text_plate(&mut self, text: &str, transform: Transform) -> Option<Entity> {
        spawn_text_plate(self.world, text, transform)
    }

    pub fn on_click(
        &mut self,
        target: Entity,
        action: StoryAction,
        once: bool,
    ) -> Option<InteractionHandle> {
        let mut registry = self.world.get_resource_mut::<InteractionRegistry>()?;
        Some(registry.register(target, action, once))
    }

    /// Queue an action to run right after setup.
    pub fn run(&mut self, action: StoryAction) {
        if let Some(mut queue) = self.world.get_resource_mut::<StoryActionQueue>() {
            queue.push(action);
        }
    }

    pub fn after(&mut self, delay: Duration, action: StoryAction) -> Option<TimerHandle> {
        let now = self.now();
        let mut scheduler = self.world.get_resource_mut::<StoryScheduler>()?;
        Some(scheduler.schedule(now, delay, action))
    }

    pub fn attach_button(&mut self, which: ReusableButton, parent: Entity, offset: Vec3) -> bool {
        attach_button(self.world, which, parent, offset)
    }

    /// A quiz scene starts with its question open, also when replayed.
    pub fn reopen_question(&mut self, question: QuizQuestion) {
        let reopened = self
            .world
            .get_resource_mut::<QuizState>()
            .is_some_and(|mut quiz| quiz.reopen(question));
        if reopened {
            info!("Scene `{}`: {:?} reopened, previous answer dropped", self.scene, question);
        }
    }

    /// Correct answers and question count so far.
    pub fn quiz_score(&self) -> (usize, usize) {
        self.world
            .get_resource::<QuizState>()
            .map(|quiz| (quiz.score(), quiz.total()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_is_skipped() {
        let mut world = World::new();
        world.init_resource::<AssetRegistry>();
        let mut stage = SceneStage::new(&mut world, SceneId::Intro);
        assert_eq!(stage.spawn_model(StoryAsset::Narrator, Transform::default()), None);
    }

    #[test]
    fn timers_are_scheduled_from_the_frame_clock() {
        let mut world = World::new();
        world.init_resource::<Time>();
        world.init_resource::<StoryScheduler>();
        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(1500));

        let mut stage = SceneStage::new(&mut world, SceneId::Phishing);
        assert!(stage.after(Duration::from_millis(500), StoryAction::ShowQuit).is_some());
        assert_eq!(
            world.resource::<StoryScheduler>().next_deadline(),
            Some(Duration::from_millis(2000))
        );
    }
}
