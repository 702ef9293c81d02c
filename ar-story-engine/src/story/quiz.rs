use crate::engine::assets::story_asset::StoryAsset;
use crate::story::scene_id::SceneId;
use bevy::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizQuestion {
    Phishing,
    Passwords,
}

impl QuizQuestion {
    pub const ALL: [QuizQuestion; 2] = [QuizQuestion::Phishing, QuizQuestion::Passwords];

    pub fn prompt(self) -> &'static str {
        match self {
            Self::Phishing => "An email asks you to confirm your password. What do you do?",
            Self::Passwords => "Which password is the strongest?",
        }
    }

    pub fn choices(self) -> &'static [&'static str] {
        match self {
            Self::Phishing => &["Reply with my password", "Report it and delete it"],
            Self::Passwords => &["purple-otter-rides-bikes", "Password123"],
        }
    }

    pub fn correct_choice(self) -> usize {
        match self {
            Self::Phishing => 1,
            Self::Passwords => 0,
        }
    }

    /// Scene that follows once the question is answered.
    pub fn next_scene(self) -> SceneId {
        match self {
            Self::Phishing => SceneId::QuizPasswords,
            Self::Passwords => SceneId::Results,
        }
    }
}

/// Outcome of answering a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizFeedback {
    pub correct: bool,
}

impl QuizFeedback {
    pub fn caption(self) -> &'static str {
        if self.correct {
            "Correct! Well spotted."
        } else {
            "Not quite. Take another look next time."
        }
    }

    pub fn cue(self) -> StoryAsset {
        if self.correct {
            StoryAsset::CorrectChime
        } else {
            StoryAsset::WrongBuzz
        }
    }
}

/// Answers given so far. Each question takes one answer; later clicks are ignored.
#[derive(Resource, Default, Debug)]
pub struct QuizState {
    answers: HashMap<QuizQuestion, bool>,
}

impl QuizState {
    /// Record an answer. `None` if the question was already answered.
    pub fn answer(&mut self, question: QuizQuestion, choice: usize) -> Option<QuizFeedback> {
        if self.answers.contains_key(&question) {
            return None;
        }
        let correct = choice == question.correct_choice();
        self.answers.insert(question, correct);
        Some(QuizFeedback { correct })
    }

    /// Reopen a question, dropping its recorded answer.
    pub fn reopen(&mut self, question: QuizQuestion) -> bool {
        self.answers.remove(&question).is_some()
    }

    pub fn is_answered(&self, question: QuizQuestion) -> bool {
        self.answers.contains_key(&question)
    }

    pub fn score(&self) -> usize {
        self.answers.values().filter(|correct| **correct).count()
    }

    pub fn total(&self) -> usize {
        QuizQuestion::ALL.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_answer_counts() {
        let mut quiz = QuizState::default();
        let feedback = quiz.answer(QuizQuestion::Phishing, 1).unwrap();
        assert!(feedback.correct);
        assert_eq!(feedback.cue(), StoryAsset::CorrectChime);
        assert_eq!(quiz.answer(QuizQuestion::Phishing, 0), None);
        assert_eq!(quiz.score(), 1);
    }

    #[test]
    fn score_over_both_questions() {
        let mut quiz = QuizState::default();
        quiz.answer(QuizQuestion::Phishing, 0);
        quiz.answer(QuizQuestion::Passwords, 0);
        assert_eq!((quiz.score(), quiz.total()), (1, 2));
        assert!(quiz.is_answered(QuizQuestion::Passwords));
    }

    #[test]
    fn reopened_question_takes_a_new_answer() {
        let mut quiz = QuizState::default();
        quiz.answer(QuizQuestion::Passwords, 0);
        assert!(quiz.reopen(QuizQuestion::Passwords));
        assert!(!quiz.reopen(QuizQuestion::Passwords));
        assert_eq!(quiz.score(), 0);
        let feedback = quiz.answer(QuizQuestion::Passwords, 1).unwrap();
        assert!(!feedback.correct);
    }

    #[test]
    fn every_question_has_its_correct_choice() {
        for question in QuizQuestion::ALL {
            assert!(question.correct_choice() < question.choices().len());
        }
    }
}
