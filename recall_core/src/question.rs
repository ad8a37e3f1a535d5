//! Quiz questions and their per-question answer counters

use serde::{Deserialize, Serialize};

use crate::fuzzy::{AnswerMatcher, MatchResult};

/// A single prompt/answer pair with its running tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub correct_answer: String,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub incorrect_count: u32,
}

impl Question {
    pub fn new(prompt: impl Into<String>, correct_answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            correct_answer: correct_answer.into(),
            correct_count: 0,
            incorrect_count: 0,
        }
    }

    /// Check `submitted` against this question's answer, bumping exactly one counter.
    pub fn check_answer(&mut self, submitted: &str, matcher: &AnswerMatcher) -> bool {
        self.answer(submitted, matcher).is_correct
    }

    /// Like [`Question::check_answer`], but keeps the matcher's feedback.
    pub fn answer(&mut self, submitted: &str, matcher: &AnswerMatcher) -> MatchResult {
        let result = matcher.check(submitted, &self.correct_answer);
        if result.is_correct {
            self.correct_count = self.correct_count.saturating_add(1);
        } else {
            self.incorrect_count = self.incorrect_count.saturating_add(1);
        }
        result
    }

    pub fn is_mastered(&self, threshold: u32) -> bool {
        self.correct_count >= threshold
    }

    /// Correct answers still needed before the question counts as learned.
    pub fn remaining(&self, threshold: u32) -> u32 {
        threshold.saturating_sub(self.correct_count)
    }

    pub fn attempts(&self) -> u32 {
        self.correct_count + self.incorrect_count
    }
}
