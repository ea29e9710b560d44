//! Quiz questions answered with one-handed gestures
//!
//! Question rounds pause driving: the player swipes the highlight between
//! options and closes the index finger to lock the answer in. Pools are
//! built from config entries; malformed entries are skipped with a warning
//! and an empty pool falls back to one built-in question so a round can
//! always start.

use rand::Rng;

use crate::config::{MultipleChoiceEntry, TrueFalseEntry};
use crate::control::SwipeDirection;

/// A validated question ready for presentation
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl Question {
    /// Validate a prompt/options/answer triple
    ///
    /// Requires a non-empty prompt, at least two options, and an in-bounds
    /// answer index.
    pub fn new(prompt: String, options: Vec<String>, correct_index: usize) -> Option<Self> {
        if prompt.trim().is_empty() || options.len() < 2 || correct_index >= options.len() {
            return None;
        }
        Some(Self {
            prompt,
            options,
            correct_index,
        })
    }

    fn from_true_false(entry: &TrueFalseEntry) -> Option<Self> {
        let correct = if entry.answer { 0 } else { 1 };
        Self::new(
            entry.prompt.clone(),
            vec!["True".to_string(), "False".to_string()],
            correct,
        )
    }

    fn from_multiple_choice(entry: &MultipleChoiceEntry) -> Option<Self> {
        Self::new(entry.prompt.clone(), entry.options.clone(), entry.correct_index)
    }
}

/// Pool of validated questions
#[derive(Debug, Clone)]
pub struct QuestionPool {
    questions: Vec<Question>,
}

impl QuestionPool {
    /// Build a pool from config entries, skipping invalid ones
    pub fn from_config(
        true_false: &[TrueFalseEntry],
        multiple_choice: &[MultipleChoiceEntry],
    ) -> Self {
        let mut questions = Vec::with_capacity(true_false.len() + multiple_choice.len());
        let mut skipped = 0usize;
        for entry in true_false {
            match Question::from_true_false(entry) {
                Some(q) => questions.push(q),
                None => skipped += 1,
            }
        }
        for entry in multiple_choice {
            match Question::from_multiple_choice(entry) {
                Some(q) => questions.push(q),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            log::warn!("question pool: skipped {skipped} invalid entries");
        }
        if questions.is_empty() {
            log::warn!("question pool empty, using built-in fallback");
            questions.push(Self::fallback_question());
        }
        Self { questions }
    }

    fn fallback_question() -> Question {
        Question {
            prompt: "Braking is signalled with an open palm".to_string(),
            options: vec!["True".to_string(), "False".to_string()],
            correct_index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Uniformly random question
    pub fn pick<R: Rng>(&self, rng: &mut R) -> &Question {
        &self.questions[rng.random_range(0..self.questions.len())]
    }
}

/// Outcome of an answered question round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Correct,
    Incorrect,
}

/// One in-progress question round
///
/// Swipes move the highlight with wrap-around; select locks the highlighted
/// option in and ends the round.
#[derive(Debug, Clone)]
pub struct QuestionSession {
    question: Question,
    highlighted: usize,
    answer: Option<Answer>,
}

impl QuestionSession {
    pub fn new(question: Question) -> Self {
        Self {
            question,
            highlighted: 0,
            answer: None,
        }
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn answered(&self) -> Option<Answer> {
        self.answer
    }

    /// Move the highlight; ignored once answered
    pub fn swipe(&mut self, direction: SwipeDirection) {
        if self.answer.is_some() {
            return;
        }
        let count = self.question.options.len();
        self.highlighted = match direction {
            SwipeDirection::Up => (self.highlighted + count - 1) % count,
            SwipeDirection::Down => (self.highlighted + 1) % count,
        };
    }

    /// Lock the highlighted option in and report the outcome
    ///
    /// Repeated selects return the original outcome without re-scoring.
    pub fn select(&mut self) -> Answer {
        if let Some(answer) = self.answer {
            return answer;
        }
        let answer = if self.highlighted == self.question.correct_index {
            Answer::Correct
        } else {
            Answer::Incorrect
        };
        self.answer = Some(answer);
        answer
    }
}
