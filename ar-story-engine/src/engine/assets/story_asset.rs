use crate::error::StoryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of resource behind a story asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Model,
    Audio,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Audio => "audio",
        }
    }
}

/// Every asset the story references, by semantic name.
///
/// Manifest entries must use one of these names (snake_case); anything else is
/// rejected when the manifest is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryAsset {
    NextButton,
    QuitButton,
    Narrator,
    IntroNarration,
    Hacker,
    PhishingEmail,
    PhishingNarration,
    Laptop,
    Padlock,
    PasswordNarration,
    CorrectChime,
    WrongBuzz,
    OutroNarration,
}

impl StoryAsset {
    pub const ALL: [StoryAsset; 13] = [
        Self::NextButton,
        Self::QuitButton,
        Self::Narrator,
        Self::IntroNarration,
        Self::Hacker,
        Self::PhishingEmail,
        Self::PhishingNarration,
        Self::Laptop,
        Self::Padlock,
        Self::PasswordNarration,
        Self::CorrectChime,
        Self::WrongBuzz,
        Self::OutroNarration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NextButton => "next_button",
            Self::QuitButton => "quit_button",
            Self::Narrator => "narrator",
            Self::IntroNarration => "intro_narration",
            Self::Hacker => "hacker",
            Self::PhishingEmail => "phishing_email",
            Self::PhishingNarration => "phishing_narration",
            Self::Laptop => "laptop",
            Self::Padlock => "padlock",
            Self::PasswordNarration => "password_narration",
            Self::CorrectChime => "correct_chime",
            Self::WrongBuzz => "wrong_buzz",
            Self::OutroNarration => "outro_narration",
        }
    }

    /// Resource kind the story code expects for this asset.
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::IntroNarration
            | Self::PhishingNarration
            | Self::PasswordNarration
            | Self::CorrectChime
            | Self::WrongBuzz
            | Self::OutroNarration => AssetKind::Audio,
            _ => AssetKind::Model,
        }
    }

    pub fn from_name(name: &str) -> Result<Self, StoryError> {
        Self::ALL
            .iter()
            .copied()
            .find(|asset| asset.as_str() == name)
            .ok_or_else(|| StoryError::UnknownAsset(name.to_string()))
    }
}

impl fmt::Display for StoryAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
