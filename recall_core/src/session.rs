//! The mastery loop - asks unlearned questions round after round until all are learned

use std::path::PathBuf;

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::console::Console;
use crate::error::Result;
use crate::fuzzy::AnswerMatcher;
use crate::progress::{Attempt, AttemptLog};
use crate::question::Question;
use crate::results::write_results;
use crate::save::SaveStore;

/// Where the loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Some questions are still below the threshold.
    Active,
    /// Every question reached the threshold.
    Complete,
}

/// Summary of a finished (or interrupted) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    /// False when input ended before every question was learned.
    pub completed: bool,
    /// Evaluations of the pending set, the final empty one included.
    pub rounds: usize,
    /// Questions answered during this run.
    pub asked: usize,
    pub score: u64,
    pub max_score: u64,
}

struct History {
    log: AttemptLog,
    user: String,
    quiz: String,
}

pub struct MasteryLoop {
    questions: Vec<Question>,
    matcher: AnswerMatcher,
    threshold: u32,
    store: Option<SaveStore>,
    results_path: Option<PathBuf>,
    history: Option<History>,
}

impl MasteryLoop {
    /// `threshold` below 1 is treated as 1.
    pub fn new(questions: Vec<Question>, matcher: AnswerMatcher, threshold: u32) -> Self {
        Self {
            questions,
            matcher,
            threshold: threshold.max(1),
            store: None,
            results_path: None,
            history: None,
        }
    }

    /// Resume from and persist to `store`.
    pub fn with_save_store(mut self, store: SaveStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Rewrite the results report at `path` after every answer.
    pub fn with_results_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.results_path = Some(path.into());
        self
    }

    /// Record every answer in the attempt history.
    pub fn with_history(mut self, log: AttemptLog, user: &str, quiz: &str) -> Self {
        self.history = Some(History {
            log,
            user: user.to_string(),
            quiz: quiz.to_string(),
        });
        self
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn history(&self) -> Option<&AttemptLog> {
        self.history.as_ref().map(|h| &h.log)
    }

    pub fn state(&self) -> LoopState {
        if self.questions.iter().all(|q| q.is_mastered(self.threshold)) {
            LoopState::Complete
        } else {
            LoopState::Active
        }
    }

    /// Indices of questions still below the threshold, in set order.
    pub fn pending(&self) -> Vec<usize> {
        self.questions
            .iter()
            .enumerate()
            .filter(|(_, q)| !q.is_mastered(self.threshold))
            .map(|(i, _)| i)
            .collect()
    }

    /// Correct answers, counting at most `threshold` per question.
    pub fn score(&self) -> u64 {
        self.questions
            .iter()
            .map(|q| u64::from(q.correct_count.min(self.threshold)))
            .sum()
    }

    pub fn max_score(&self) -> u64 {
        (self.questions.len() as u64).saturating_mul(u64::from(self.threshold))
    }

    pub fn mastered_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| q.is_mastered(self.threshold))
            .count()
    }

    /// Replace the question set with the saved one, if a save exists.
    pub fn resume(&mut self) -> Result<bool> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        if !store.exists() {
            return Ok(false);
        }

        self.questions = store.load()?;
        info!(
            path = %store.path().display(),
            mastered = self.mastered_count(),
            total = self.questions.len(),
            "resumed saved progress"
        );
        Ok(true)
    }

    /// Run with a thread-local random source.
    pub fn run<C: Console + ?Sized>(&mut self, console: &mut C) -> Result<SessionOutcome> {
        self.run_with_rng(console, &mut rand::thread_rng())
    }

    /// Ask rounds of questions until everything is learned or input ends.
    pub fn run_with_rng<C, R>(&mut self, console: &mut C, rng: &mut R) -> Result<SessionOutcome>
    where
        C: Console + ?Sized,
        R: Rng + ?Sized,
    {
        if self.resume()? {
            console.say(&format!(
                "Resuming saved progress: {} of {} questions learned.",
                self.mastered_count(),
                self.questions.len()
            ));
        }
        info!(
            questions = self.questions.len(),
            threshold = self.threshold,
            "starting quiz"
        );

        let mut rounds = 0;
        let mut asked = 0;

        loop {
            rounds += 1;
            let mut pending = self.pending();
            if pending.is_empty() {
                break;
            }
            pending.shuffle(rng);
            debug!(round = rounds, pending = pending.len(), "starting round");

            for index in pending {
                self.persist(console);

                console.say(&self.questions[index].prompt);
                let Some(answer) = console.read_line("Enter your answer: ")? else {
                    info!(asked, "input ended before the quiz was finished");
                    self.persist(console);
                    self.publish_results(console);
                    return Ok(self.outcome(false, rounds, asked));
                };
                asked += 1;

                self.ask(index, &answer, console);
                console.say(&self.score_line());

                self.persist(console);
                self.publish_results(console);
            }
        }

        self.persist(console);
        self.publish_results(console);
        console.say("-- finished. --");
        console.say(&self.score_line());
        info!(rounds, asked, score = self.score(), "quiz complete");

        Ok(self.outcome(true, rounds, asked))
    }

    fn ask<C: Console + ?Sized>(&mut self, index: usize, answer: &str, console: &mut C) {
        let threshold = self.threshold;
        let question = &mut self.questions[index];
        let result = question.answer(answer, &self.matcher);
        debug!(
            prompt = %question.prompt,
            correct = result.is_correct,
            distance = result.distance,
            "answered"
        );

        console.say(&result.feedback);
        if result.is_correct {
            match question.remaining(threshold) {
                0 => console.say("Learned! This question will not be asked again."),
                1 => console.say("1 more correct answer to learn this one."),
                n => console.say(&format!("{} more correct answers to learn this one.", n)),
            }
        }

        if let Some(history) = &self.history {
            let attempt = Attempt {
                user: history.user.clone(),
                quiz: history.quiz.clone(),
                prompt: question.prompt.clone(),
                is_correct: result.is_correct,
                user_answer: answer.to_string(),
                expected_answer: question.correct_answer.clone(),
                attempted_at: Utc::now(),
            };
            if let Err(e) = history.log.record(&attempt) {
                warn!(error = %e, "failed to record attempt");
            }
        }
    }

    fn score_line(&self) -> String {
        format!(
            "Score: {}/{} ({} of {} questions learned)",
            self.score(),
            self.max_score(),
            self.mastered_count(),
            self.questions.len()
        )
    }

    fn persist<C: Console + ?Sized>(&self, console: &mut C) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save(&self.questions) {
            warn!(error = %e, "failed to save progress");
            console.say(&format!("Warning: could not save progress: {}", e));
        }
    }

    fn publish_results<C: Console + ?Sized>(&self, console: &mut C) {
        let Some(path) = &self.results_path else {
            return;
        };
        if let Err(e) = write_results(path, &self.questions) {
            warn!(error = %e, "failed to write results");
            console.say(&format!("Warning: could not write results: {}", e));
        }
    }

    fn outcome(&self, completed: bool, rounds: usize, asked: usize) -> SessionOutcome {
        SessionOutcome {
            completed,
            rounds,
            asked,
            score: self.score(),
            max_score: self.max_score(),
        }
    }
}
