use crate::engine::animation::clips::ClipMode;
use crate::engine::animation::sway::SwayAxis;
use crate::engine::assets::story_asset::StoryAsset;
use crate::engine::core::settings::StorySettings;
use crate::engine::scene::buttons::ReusableButton;
use crate::engine::scene::stage::SceneStage;
use crate::error::StoryError;
use crate::story::actions::StoryAction;
use crate::story::quiz::QuizQuestion;
use crate::story::scene_id::SceneId;
use bevy::prelude::*;
use constants::animation::PROP_SPEED;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    Short,
    Long,
}

impl Pause {
    pub fn duration(self, settings: &StorySettings) -> Duration {
        match self {
            Self::Short => settings.short_pause(),
            Self::Long => settings.long_pause(),
        }
    }
}

/// How a scene hands over to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneExit {
    /// Go to `next` on its own after the pause.
    AutoAdvance { after: Pause, next: SceneId },
    /// Reveal the Next button after the pause; clicking it goes to `next`.
    NextButton { after: Pause, next: SceneId },
    /// The scene wires its own exit.
    Scripted,
    /// Last scene; the session ends from here.
    Terminal,
}

pub struct SceneDescriptor {
    pub id: SceneId,
    pub name: &'static str,
    pub setup: fn(&mut SceneStage),
    pub exit: SceneExit,
}

/// Indexed by `SceneId` declaration order.
static SCENES: [SceneDescriptor; 7] = [
    SceneDescriptor {
        id: SceneId::Intro,
        name: "Meet your guide",
        setup: intro,
        exit: SceneExit::NextButton {
            after: Pause::Short,
            next: SceneId::Phishing,
        },
    },
    SceneDescriptor {
        id: SceneId::Phishing,
        name: "Spot the phish",
        setup: phishing,
        exit: SceneExit::NextButton {
            after: Pause::Long,
            next: SceneId::Passwords,
        },
    },
    SceneDescriptor {
        id: SceneId::Passwords,
        name: "Strong passwords",
        setup: passwords,
        exit: SceneExit::NextButton {
            after: Pause::Long,
            next: SceneId::QuizPhishing,
        },
    },
    SceneDescriptor {
        id: SceneId::QuizPhishing,
        name: "Quiz: phishing",
        setup: quiz_phishing,
        exit: SceneExit::Scripted,
    },
    SceneDescriptor {
        id: SceneId::QuizPasswords,
        name: "Quiz: passwords",
        setup: quiz_passwords,
        exit: SceneExit::Scripted,
    },
    SceneDescriptor {
        id: SceneId::Results,
        name: "Your results",
        setup: results,
        exit: SceneExit::AutoAdvance {
            after: Pause::Long,
            next: SceneId::Quit,
        },
    },
    SceneDescriptor {
        id: SceneId::Quit,
        name: "See you soon",
        setup: quit,
        exit: SceneExit::Terminal,
    },
];

pub fn descriptor(id: SceneId) -> &'static SceneDescriptor {
    &SCENES[id as usize]
}

/// Resolve a scene from its host-facing name.
pub fn lookup_scene(name: &str) -> Result<&'static SceneDescriptor, StoryError> {
    SCENES
        .iter()
        .find(|scene| scene.id.as_str() == name)
        .ok_or_else(|| StoryError::UnknownScene(name.to_string()))
}

fn intro(stage: &mut SceneStage) {
    if let Some(narrator) = stage.spawn_model(StoryAsset::Narrator, Transform::from_xyz(-0.6, 0.0, -2.5)) {
        stage.run(StoryAction::Sway {
            target: narrator,
            axis: SwayAxis::Y,
        });
        stage.run(StoryAction::PlayClip {
            target: narrator,
            asset: StoryAsset::Narrator,
            clip: "Wave".to_string(),
            mode: ClipMode::Once,
        });
    }
    stage.text_plate("Stay Safe Online", Transform::from_xyz(0.4, 1.6, -2.5));
    stage.run(StoryAction::Caption(
        "Hi! I'm here to help you stay safe online.".to_string(),
    ));
    stage.run(StoryAction::Narrate(StoryAsset::IntroNarration));
}

fn phishing(stage: &mut SceneStage) {
    let walk_speed = stage.settings().walk_speed;

    if let Some(hacker) = stage.spawn_model(StoryAsset::Hacker, Transform::from_xyz(-2.0, 0.0, -3.0)) {
        stage.run(
            StoryAction::move_to(hacker, Vec3::new(-0.6, 0.0, -3.0), walk_speed).then(
                StoryAction::PlayClip {
                    target: hacker,
                    asset: StoryAsset::Hacker,
                    clip: "Typing".to_string(),
                    mode: ClipMode::Loop,
                },
            ),
        );
    }

    if let Some(email) =
        stage.spawn_model(StoryAsset::PhishingEmail, Transform::from_xyz(0.7, 1.2, -2.5))
    {
        stage.run(StoryAction::Sway {
            target: email,
            axis: SwayAxis::Y,
        });
        stage.on_click(
            email,
            StoryAction::Caption("Look closely: the sender's address is fake!".to_string()),
            false,
        );
    }

    stage.run(StoryAction::Caption(
        "Scammers send emails that look real. Tap the email to inspect it.".to_string(),
    ));
    stage.run(StoryAction::Narrate(StoryAsset::PhishingNarration));
}

fn passwords(stage: &mut SceneStage) {
    if let Some(laptop) = stage.spawn_model(StoryAsset::Laptop, Transform::from_xyz(0.0, 0.8, -2.2)) {
        stage.attach_button(ReusableButton::Next, laptop, Vec3::new(0.0, 0.45, 0.0));
    }

    if let Some(padlock) = stage.spawn_model(StoryAsset::Padlock, Transform::from_xyz(0.6, 0.2, -2.2)) {
        stage.run(
            StoryAction::move_to(padlock, Vec3::new(0.6, 1.3, -2.2), PROP_SPEED).then(
                StoryAction::Sway {
                    target: padlock,
                    axis: SwayAxis::Y,
                },
            ),
        );
    }

    stage.text_plate("Use long, unique passphrases", Transform::from_xyz(-0.6, 1.6, -2.5));
    stage.run(StoryAction::Caption(
        "A long passphrase beats a short, clever password.".to_string(),
    ));
    stage.run(StoryAction::Narrate(StoryAsset::PasswordNarration));
}

fn quiz(stage: &mut SceneStage, question: QuizQuestion) {
    stage.reopen_question(question);
    stage.text_plate(question.prompt(), Transform::from_xyz(0.0, 1.6, -2.5));

    for (choice, label) in question.choices().iter().enumerate() {
        let x = -0.7 + 1.4 * choice as f32;
        if let Some(plate) = stage.text_plate(label, Transform::from_xyz(x, 1.1, -2.5)) {
            stage.on_click(plate, StoryAction::QuizAnswer { question, choice }, true);
        }
    }
    stage.run(StoryAction::Caption(
        "Tap the answer you think is right.".to_string(),
    ));
}

fn quiz_phishing(stage: &mut SceneStage) {
    quiz(stage, QuizQuestion::Phishing);
}

fn quiz_passwords(stage: &mut SceneStage) {
    quiz(stage, QuizQuestion::Passwords);
}

fn results(stage: &mut SceneStage) {
    let (score, total) = stage.quiz_score();
    stage.text_plate(
        &format!("You scored {score} / {total}"),
        Transform::from_xyz(0.0, 1.5, -2.5),
    );
    if let Some(narrator) = stage.spawn_model(StoryAsset::Narrator, Transform::from_xyz(-0.9, 0.0, -2.5)) {
        stage.run(StoryAction::Sway {
            target: narrator,
            axis: SwayAxis::Y,
        });
    }
    stage.run(StoryAction::Caption(
        "Great work! Remember: stop, think, then click.".to_string(),
    ));
    stage.run(StoryAction::Narrate(StoryAsset::OutroNarration));
}

fn quit(stage: &mut SceneStage) {
    stage.text_plate(
        "Thanks for playing! Stay safe online.",
        Transform::from_xyz(0.0, 1.5, -2.5),
    );
    stage.run(StoryAction::Caption("Tap Quit when you are done.".to_string()));
    stage.run(StoryAction::ShowQuit);
}
