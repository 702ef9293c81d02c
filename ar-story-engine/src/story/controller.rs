use crate::engine::animation::clips::ClipMixer;
use crate::engine::animation::driver::AnimationDriver;
use crate::engine::animation::movement::DirectedMovement;
use crate::engine::assets::asset_registry::AssetRegistry;
use crate::engine::core::app_state::AppState;
use crate::engine::core::settings::StorySettings;
use crate::engine::scene::buttons::{ReusableButton, show_button};
use crate::engine::scene::disposal::{SceneMember, clear_scene};
use crate::engine::scene::stage::SceneStage;
use crate::engine::scene::text_plate::Subtitle;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::story::actions::{StoryAction, StoryActionQueue};
use crate::story::quiz::QuizState;
use crate::story::scene_id::SceneId;
use crate::story::scenes::{SceneExit, descriptor};
use crate::story::scheduler::StoryScheduler;
use bevy::prelude::*;
use std::time::Duration;

/// Upper bound on actions executed in one frame, guards against action cycles.
const MAX_ACTIONS_PER_FRAME: usize = 256;

/// Which scene is on stage.
#[derive(Resource, Default, Debug)]
pub struct StoryController {
    current: Option<SceneId>,
    /// True from a scene's setup until its teardown.
    populated: bool,
}

impl StoryController {
    pub fn current(&self) -> Option<SceneId> {
        self.current
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }
}

fn now(world: &World) -> Duration {
    world
        .get_resource::<Time>()
        .map(Time::elapsed)
        .unwrap_or_default()
}

fn settings(world: &World) -> StorySettings {
    world
        .get_resource::<StorySettings>()
        .cloned()
        .unwrap_or_default()
}

fn schedule(world: &mut World, delay: Duration, action: StoryAction) {
    let now = now(world);
    if let Some(mut scheduler) = world.get_resource_mut::<StoryScheduler>() {
        scheduler.schedule(now, delay, action);
    }
}

fn notify(world: &mut World, method: &str, params: serde_json::Value) {
    if let Some(mut rpc_interface) = world.get_resource_mut::<WebRpcInterface>() {
        rpc_interface.send_notification(method, params);
    }
}

/// Run due timers and queued actions. The only system that mutates the story.
pub fn run_story_actions(world: &mut World) {
    let now = now(world);
    let due = world
        .get_resource_mut::<StoryScheduler>()
        .map(|mut scheduler| scheduler.due(now))
        .unwrap_or_default();
    if let Some(mut queue) = world.get_resource_mut::<StoryActionQueue>() {
        queue.extend(due);
    }

    for _ in 0..MAX_ACTIONS_PER_FRAME {
        let next = world
            .get_resource_mut::<StoryActionQueue>()
            .and_then(|mut queue| queue.pop());
        let Some(action) = next else {
            return;
        };
        execute(world, action);
    }
    warn!("Story action budget exhausted; remaining actions run next frame");
}

/// Carry out one action.
pub fn execute(world: &mut World, action: StoryAction) {
    match action {
        StoryAction::EnterScene(scene) => enter_scene(world, scene),
        StoryAction::GoTo(scene) => {
            leave_scene(world);
            let delay = settings(world).settle_delay();
            schedule(world, delay, StoryAction::EnterScene(scene));
        }
        StoryAction::ShowNext { next } => {
            show_button(world, ReusableButton::Next, StoryAction::GoTo(next));
        }
        StoryAction::ShowQuit => {
            show_button(world, ReusableButton::Quit, StoryAction::EndSession);
        }
        StoryAction::Narrate(asset) => {
            let audio = world
                .get_resource::<AssetRegistry>()
                .map(|registry| registry.audio(asset));
            match audio {
                Some(Ok(handle)) => {
                    world.spawn((
                        Name::new(asset.as_str()),
                        AudioPlayer::new(handle),
                        PlaybackSettings::DESPAWN,
                        SceneMember,
                    ));
                }
                Some(Err(err)) => warn!("Skipping narration: {}", err),
                None => {}
            }
        }
        StoryAction::Caption(text) => {
            if let Some(mut subtitle) = world.get_resource_mut::<Subtitle>() {
                subtitle.0 = text;
            }
        }
        StoryAction::Move {
            target,
            to,
            speed,
            then,
        } => {
            let Some(from) = world.get::<Transform>(target).map(|t| t.translation) else {
                warn!("Cannot move {:?}: entity has no transform", target);
                return;
            };
            let movement = DirectedMovement::new(from, to, speed, now(world), then.map(|then| *then));
            if let Some(mut driver) = world.get_resource_mut::<AnimationDriver>() {
                // Sway writes the same transform; the walk takes over.
                driver.stop_sway(target);
                driver.start_movement(target, movement);
            }
        }
        StoryAction::PlayClip {
            target,
            asset,
            clip,
            mode,
        } => {
            let handle = world
                .get_resource::<AssetRegistry>()
                .map(|registry| registry.clip(asset, &clip));
            match handle {
                Some(Ok(handle)) => {
                    if let Some(mut mixer) = world.get_resource_mut::<ClipMixer>() {
                        mixer.play(target, handle, mode);
                    }
                }
                Some(Err(err)) => warn!("Skipping clip: {}", err),
                None => {}
            }
        }
        StoryAction::Sway { target, axis } => {
            if let Some(mut driver) = world.get_resource_mut::<AnimationDriver>() {
                if driver.stop_movement(target) {
                    debug!("{:?} stopped moving to sway", target);
                }
                driver.start_sway(target, axis);
            }
        }
        StoryAction::QuizAnswer { question, choice } => {
            let feedback = world
                .get_resource_mut::<QuizState>()
                .and_then(|mut quiz| quiz.answer(question, choice));
            let Some(feedback) = feedback else {
                debug!("{:?} already answered", question);
                return;
            };
            info!("Quiz {:?}: choice {} correct={}", question, choice, feedback.correct);
            execute(world, StoryAction::Narrate(feedback.cue()));
            execute(world, StoryAction::Caption(feedback.caption().to_string()));
            let delay = settings(world).short_pause();
            schedule(world, delay, StoryAction::GoTo(question.next_scene()));
        }
        StoryAction::EndSession => {
            leave_scene(world);
            info!("→ Transitioning to Ended state");
            if let Some(mut next_state) = world.get_resource_mut::<NextState<AppState>>() {
                next_state.set(AppState::Ended);
            }
            notify(world, "end_session", serde_json::json!({}));
        }
        StoryAction::Restart => {
            info!("Requesting experience reload");
            notify(world, "reload_experience", serde_json::json!({}));
        }
        StoryAction::Sequence(actions) => {
            for action in actions {
                execute(world, action);
            }
        }
        StoryAction::After { delay, action } => schedule(world, delay, *action),
    }
}

/// Tear down the scene on stage, if any.
fn leave_scene(world: &mut World) {
    let report = clear_scene(world);
    if let Some(mut controller) = world.get_resource_mut::<StoryController>() {
        controller.populated = false;
    }
    debug!("Scene cleared: {:?}", report);
}

/// Set up `scene`, clearing whatever is still on stage first.
pub fn enter_scene(world: &mut World, scene: SceneId) {
    let populated = world
        .get_resource::<StoryController>()
        .is_some_and(StoryController::is_populated);
    if populated {
        leave_scene(world);
    }

    let descriptor = descriptor(scene);
    info!("→ Entering scene {} ({})", scene.number(), descriptor.name);

    if let Some(mut controller) = world.get_resource_mut::<StoryController>() {
        controller.current = Some(scene);
        controller.populated = true;
    }
    notify(
        world,
        "scene_changed",
        serde_json::json!({ "scene": scene.as_str(), "name": descriptor.name }),
    );

    (descriptor.setup)(&mut SceneStage::new(world, scene));

    let settings = settings(world);
    match descriptor.exit {
        SceneExit::AutoAdvance { after, next } => {
            schedule(world, after.duration(&settings), StoryAction::GoTo(next))
        }
        SceneExit::NextButton { after, next } => {
            schedule(world, after.duration(&settings), StoryAction::ShowNext { next })
        }
        SceneExit::Scripted | SceneExit::Terminal => {}
    }
}
