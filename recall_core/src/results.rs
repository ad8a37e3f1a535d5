//! Human-readable per-question results report

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{QuizError, Result};
use crate::question::Question;
use crate::save::session_key;

/// Results file at `{results_dir}/{user}_{quiz}_results.txt`.
pub fn results_path(results_dir: &Path, user: &str, quiz: &str) -> PathBuf {
    results_dir.join(format!("{}_results.txt", session_key(user, quiz)))
}

/// Render one line per question: `prompt: N correct, M incorrect`.
pub fn render_results(questions: &[Question]) -> String {
    let mut out = String::new();
    for q in questions {
        let _ = writeln!(
            out,
            "{}: {} correct, {} incorrect",
            q.prompt, q.correct_count, q.incorrect_count
        );
    }
    out
}

/// Overwrite `path` with the current results.
pub fn write_results(path: &Path, questions: &[Question]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| QuizError::io(parent, e))?;
    }
    fs::write(path, render_results(questions)).map_err(|e| QuizError::io(path, e))
}
