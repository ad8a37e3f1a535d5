//! Recall Core - flashcard quiz runner
//!
//! Loads question/answer pairs from CSV or Excel files, asks unlearned questions
//! in shuffled rounds until each has been answered correctly often enough, and
//! keeps resumable saves, a results report and an attempt history on disk.

pub mod catalog;
pub mod config;
pub mod console;
pub mod error;
pub mod fuzzy;
pub mod progress;
pub mod question;
pub mod results;
pub mod save;
pub mod session;
pub mod source;

pub use catalog::{find_quiz, list_quizzes, menu_lines, select_quiz, QuizEntry};
pub use config::{load_config_from, RecallConfig};
pub use console::{Console, ScriptedConsole, StdConsole};
pub use error::{QuizError, Result};
pub use fuzzy::{AnswerMatcher, MatchMode, MatchResult};
pub use progress::{Attempt, AttemptLog, AttemptStats};
pub use question::Question;
pub use results::{render_results, results_path, write_results};
pub use save::{session_key, SaveStore};
pub use session::{LoopState, MasteryLoop, SessionOutcome};
pub use source::load_questions;
