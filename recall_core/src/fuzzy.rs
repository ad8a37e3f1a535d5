//! Answer matching for typed quiz answers

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

/// How strictly a submitted answer is compared against the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-insensitive equality.
    #[default]
    Exact,
    /// Case-insensitive, tolerating a small edit distance.
    Fuzzy,
}

/// Result of comparing a submitted answer with the expected answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub is_correct: bool,
    pub distance: usize,
    pub feedback: String,
}

/// Decides whether a submitted answer counts as correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerMatcher {
    mode: MatchMode,
    max_distance: usize,
}

impl Default for AnswerMatcher {
    fn default() -> Self {
        Self::exact()
    }
}

impl AnswerMatcher {
    pub fn new(mode: MatchMode, max_distance: usize) -> Self {
        Self { mode, max_distance }
    }

    pub fn exact() -> Self {
        Self::new(MatchMode::Exact, 0)
    }

    /// Fuzzy matcher accepting answers within one edit of the expected answer.
    pub fn fuzzy() -> Self {
        Self::new(MatchMode::Fuzzy, 1)
    }

    /// Check if `submitted` counts as a correct answer for `expected`.
    pub fn matches(&self, submitted: &str, expected: &str) -> bool {
        self.check(submitted, expected).is_correct
    }

    /// Compare the two answers and produce feedback for the player.
    pub fn check(&self, submitted: &str, expected: &str) -> MatchResult {
        let submitted_normalized = normalize(submitted);
        let expected_normalized = normalize(expected);

        if submitted_normalized == expected_normalized {
            return MatchResult {
                is_correct: true,
                distance: 0,
                feedback: "Correct!".to_string(),
            };
        }

        let distance = levenshtein(&submitted_normalized, &expected_normalized);
        let tolerated = match self.mode {
            MatchMode::Exact => false,
            MatchMode::Fuzzy => distance <= self.max_distance,
        };

        let feedback = if tolerated {
            format!("Close enough! Expected: '{}'", expected.trim())
        } else {
            format!("Incorrect, the answer was: {}.", expected.trim())
        };

        MatchResult {
            is_correct: tolerated,
            distance,
            feedback,
        }
    }
}

fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}
