//! Quiz catalog - lists question files and handles menu selection

use std::fs;
use std::path::{Path, PathBuf};

use crate::console::Console;
use crate::error::{QuizError, Result};
use crate::source::{extension_of, QUIZ_EXTENSIONS};

/// A selectable quiz file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizEntry {
    /// File stem, used in menus and session keys.
    pub name: String,
    pub path: PathBuf,
}

/// Quiz files in `dir`, sorted by name. A directory without any is [`QuizError::NoQuizzes`].
pub fn list_quizzes(dir: &Path) -> Result<Vec<QuizEntry>> {
    let entries = fs::read_dir(dir).map_err(|e| QuizError::io(dir, e))?;

    let mut quizzes = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| QuizError::io(dir, e))?.path();
        if !path.is_file() || !QUIZ_EXTENSIONS.contains(&extension_of(&path).as_str()) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        quizzes.push(QuizEntry {
            name: name.to_string(),
            path,
        });
    }

    if quizzes.is_empty() {
        return Err(QuizError::NoQuizzes(dir.to_path_buf()));
    }

    quizzes.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    Ok(quizzes)
}

/// Find a quiz by name (file stem), case-insensitively.
pub fn find_quiz<'a>(entries: &'a [QuizEntry], name: &str) -> Option<&'a QuizEntry> {
    entries
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(name.trim()))
}

/// Numbered menu lines, starting at 1.
pub fn menu_lines(entries: &[QuizEntry]) -> Vec<String> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}: {}", i + 1, e.name))
        .collect()
}

/// Show the menu and keep asking until a valid number is entered.
///
/// Returns `Ok(None)` if there is nothing to choose from or input ends before a
/// choice is made.
pub fn select_quiz<C: Console + ?Sized>(
    entries: &[QuizEntry],
    console: &mut C,
) -> Result<Option<QuizEntry>> {
    if entries.is_empty() {
        return Ok(None);
    }

    console.say("Available quizzes:");
    for line in menu_lines(entries) {
        console.say(&line);
    }

    loop {
        let Some(input) = console.read_line("Enter the number of the quiz you want to take: ")? else {
            return Ok(None);
        };

        match input.trim().parse::<usize>() {
            Ok(choice) if (1..=entries.len()).contains(&choice) => {
                return Ok(Some(entries[choice - 1].clone()));
            }
            _ => console.say(&format!(
                "Invalid choice. Please enter a number between 1 and {}",
                entries.len()
            )),
        }
    }
}
