//! Save state - resumable snapshots of a question set

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QuizError, Result};
use crate::question::Question;

/// Current on-disk save schema version.
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    version: u32,
    saved_at: DateTime<Utc>,
    questions: Vec<Question>,
}

/// Identifier for one user's progress on one quiz, safe to use in file names.
///
/// `_` only ever appears as the separator: ASCII letters and digits are kept,
/// `-` is doubled and every other byte becomes `-xx` (lowercase hex), so distinct
/// `(user, quiz)` pairs never share a key.
pub fn session_key(user: &str, quiz: &str) -> String {
    format!("{}_{}", escape_component(user), escape_component(quiz))
}

fn escape_component(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.trim().bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' => out.push(byte as char),
            b'-' => out.push_str("--"),
            _ => out.push_str(&format!("-{:02x}", byte)),
        }
    }
    out
}

/// Persists and restores the full question set, counters included.
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `{saves_dir}/{user}_{quiz}_save.json`.
    pub fn for_session(saves_dir: &Path, user: &str, quiz: &str) -> Self {
        Self::new(saves_dir.join(format!("{}_save.json", session_key(user, quiz))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Restore the saved question set. Errors with [`QuizError::NoSave`] if nothing was saved.
    pub fn load(&self) -> Result<Vec<Question>> {
        if !self.exists() {
            return Err(QuizError::NoSave(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path).map_err(|e| QuizError::io(&self.path, e))?;
        let save: SaveFile =
            serde_json::from_str(&content).map_err(|e| QuizError::CorruptSave {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        if save.version != SAVE_VERSION {
            return Err(QuizError::CorruptSave {
                path: self.path.clone(),
                message: format!("unsupported save version {}", save.version),
            });
        }

        debug!(path = %self.path.display(), saved_at = %save.saved_at, "loaded save");
        Ok(save.questions)
    }

    /// Overwrite the snapshot with `questions`.
    pub fn save(&self, questions: &[Question]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| QuizError::io(parent, e))?;
        }

        let save = SaveFile {
            version: SAVE_VERSION,
            saved_at: Utc::now(),
            questions: questions.to_vec(),
        };
        let json = serde_json::to_string_pretty(&save).map_err(|e| QuizError::CorruptSave {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| QuizError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| QuizError::io(&self.path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<Question> {
        let mut paris = Question::new("Capital of France?", "Paris");
        paris.correct_count = 2;
        paris.incorrect_count = 1;
        let mut rome = Question::new("Capital of Italy?", "Rome");
        rome.incorrect_count = 4;
        vec![paris, rome, Question::new("Capital of Spain, \"España\"?", "Madrid")]
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path().join("ana_capitals_save.json"));
        let questions = sample();

        assert!(!store.exists());
        store.save(&questions).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), questions);
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path().join("s.json"));
        let mut questions = sample();

        store.save(&questions).unwrap();
        questions[1].correct_count = 7;
        store.save(&questions).unwrap();

        assert_eq!(store.load().unwrap()[1].correct_count, 7);
    }

    #[test]
    fn load_without_save_is_no_save() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path().join("missing.json"));
        assert!(matches!(store.load(), Err(QuizError::NoSave(_))));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("future.json");
        fs::write(
            &path,
            r#"{"version": 99, "saved_at": "2024-01-01T00:00:00Z", "questions": []}"#,
        )
        .unwrap();

        let err = SaveStore::new(&path).load().unwrap_err();
        assert!(matches!(err, QuizError::CorruptSave { .. }));
        assert!(err.to_string().contains("99"));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::for_session(&dir.path().join("data/saves"), "ana", "capitals");
        store.save(&sample()).unwrap();
        assert!(dir.path().join("data/saves/ana_capitals_save.json").is_file());
    }

    #[test]
    fn session_key_is_path_safe() {
        assert_eq!(session_key("ana", "capitals"), "ana_capitals");
        assert_eq!(session_key(" Ana B ", "eu/capitals"), "Ana-20B_eu-2fcapitals");
        assert_eq!(session_key("../x", "q"), "-2e-2e-2fx_q");
        assert_eq!(session_key("jean-luc", "fr"), "jean--luc_fr");
    }

    #[test]
    fn session_keys_do_not_collide() {
        let pairs = [
            ("ana_x", "y"),
            ("ana", "x_y"),
            ("a b", "c"),
            ("a_b", "c"),
            ("a-", "b"),
            ("a", "-b"),
            ("a-5f", "b"),
            ("a_", "b"),
        ];
        let keys: std::collections::HashSet<_> =
            pairs.iter().map(|(u, q)| session_key(u, q)).collect();
        assert_eq!(keys.len(), pairs.len());

        let dir = TempDir::new().unwrap();
        let first = SaveStore::for_session(dir.path(), "ana_x", "y");
        let second = SaveStore::for_session(dir.path(), "ana", "x_y");
        first.save(&sample()).unwrap();
        assert!(!second.exists());
    }
}
