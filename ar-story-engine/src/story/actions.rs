use crate::engine::animation::clips::ClipMode;
use crate::engine::animation::sway::SwayAxis;
use crate::engine::assets::story_asset::StoryAsset;
use crate::story::quiz::QuizQuestion;
use crate::story::scene_id::SceneId;
use bevy::prelude::*;
use std::collections::VecDeque;
use std::time::Duration;

/// Everything a scene can ask the story to do.
///
/// Scenes, clickables, timers and finished movements all hand one of these to the
/// action queue; `run_story_actions` is the only place they are carried out.
#[derive(Debug, Clone, PartialEq)]
pub enum StoryAction {
    /// Set up a scene, tearing down whatever is still on stage.
    EnterScene(SceneId),
    /// Tear down now, enter `SceneId` after the settle delay.
    GoTo(SceneId),
    /// Reveal the shared Next button, wired to go to the given scene once.
    ShowNext { next: SceneId },
    /// Reveal the Quit button, wired to end the session once.
    ShowQuit,
    Narrate(StoryAsset),
    Caption(String),
    Move {
        target: Entity,
        to: Vec3,
        speed: f32,
        then: Option<Box<StoryAction>>,
    },
    PlayClip {
        target: Entity,
        asset: StoryAsset,
        clip: String,
        mode: ClipMode,
    },
    Sway {
        target: Entity,
        axis: SwayAxis,
    },
    QuizAnswer {
        question: QuizQuestion,
        choice: usize,
    },
    EndSession,
    /// Ask the host to reload the whole experience.
    Restart,
    Sequence(Vec<StoryAction>),
    After {
        delay: Duration,
        action: Box<StoryAction>,
    },
}

impl StoryAction {
    pub fn after(delay: Duration, action: StoryAction) -> Self {
        Self::After {
            delay,
            action: Box::new(action),
        }
    }

    pub fn move_to(target: Entity, to: Vec3, speed: f32) -> Self {
        Self::Move {
            target,
            to,
            speed,
            then: None,
        }
    }

    pub fn then(self, next: StoryAction) -> Self {
        match self {
            Self::Move {
                target, to, speed, ..
            } => Self::Move {
                target,
                to,
                speed,
                then: Some(Box::new(next)),
            },
            other => Self::Sequence(vec![other, next]),
        }
    }
}

/// Actions waiting to be executed this frame, in arrival order.
#[derive(Resource, Default, Debug)]
pub struct StoryActionQueue {
    pending: VecDeque<StoryAction>,
}

impl StoryActionQueue {
    pub fn push(&mut self, action: StoryAction) {
        self.pending.push_back(action);
    }

    pub fn pop(&mut self) -> Option<StoryAction> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl Extend<StoryAction> for StoryActionQueue {
    fn extend<T: IntoIterator<Item = StoryAction>>(&mut self, iter: T) {
        self.pending.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn then_chains_onto_movement() {
        let target = Entity::from_raw(3);
        let action = StoryAction::move_to(target, Vec3::X, 1.0).then(StoryAction::ShowQuit);
        let StoryAction::Move { then, .. } = action else {
            panic!("expected a movement");
        };
        assert_eq!(then.as_deref(), Some(&StoryAction::ShowQuit));
    }

    #[test]
    fn then_on_other_actions_builds_a_sequence() {
        let action = StoryAction::Caption("hi".to_string()).then(StoryAction::ShowQuit);
        assert_eq!(
            action,
            StoryAction::Sequence(vec![
                StoryAction::Caption("hi".to_string()),
                StoryAction::ShowQuit
            ])
        );
    }

    #[test]
    fn queue_is_fifo() {
        let mut queue = StoryActionQueue::default();
        queue.push(StoryAction::ShowQuit);
        queue.extend([StoryAction::EndSession, StoryAction::Restart]);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(StoryAction::ShowQuit));
        assert_eq!(queue.pop(), Some(StoryAction::EndSession));
        assert_eq!(queue.pop(), Some(StoryAction::Restart));
        assert!(queue.is_empty());
    }
}
