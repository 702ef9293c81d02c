use std::fmt;

/// One narrative scene of the story, in play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneId {
    Intro,
    Phishing,
    Passwords,
    QuizPhishing,
    QuizPasswords,
    Results,
    Quit,
}

impl SceneId {
    pub const ALL: [SceneId; 7] = [
        SceneId::Intro,
        SceneId::Phishing,
        SceneId::Passwords,
        SceneId::QuizPhishing,
        SceneId::QuizPasswords,
        SceneId::Results,
        SceneId::Quit,
    ];

    /// Name used by the host when jumping to a scene.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Phishing => "phishing",
            Self::Passwords => "passwords",
            Self::QuizPhishing => "quiz_phishing",
            Self::QuizPasswords => "quiz_passwords",
            Self::Results => "results",
            Self::Quit => "quit",
        }
    }

    /// One-based position in the story.
    pub fn number(&self) -> usize {
        Self::ALL
            .iter()
            .position(|scene| scene == self)
            .map_or(0, |index| index + 1)
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
