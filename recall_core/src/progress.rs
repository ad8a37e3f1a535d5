//! Progress tracking - attempt history and statistics

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::{QuizError, Result};

/// One answered question.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub user: String,
    pub quiz: String,
    pub prompt: String,
    pub is_correct: bool,
    pub user_answer: String,
    pub expected_answer: String,
    pub attempted_at: DateTime<Utc>,
}

/// Attempt statistics for a user on a quiz
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptStats {
    pub total_attempts: i64,
    pub correct_count: i64,
    pub incorrect_count: i64,
    pub accuracy_percent: f64,
}

/// Append-only SQLite log of every answer given.
pub struct AttemptLog {
    conn: Connection,
}

impl AttemptLog {
    /// Open (or create) the history database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| QuizError::io(parent, e))?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS attempts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user TEXT NOT NULL,
                quiz TEXT NOT NULL,
                prompt TEXT NOT NULL,
                is_correct INTEGER NOT NULL,
                user_answer TEXT,
                expected_answer TEXT,
                attempted_at TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_attempts_session ON attempts (user, quiz)",
            [],
        )?;
        Ok(Self { conn })
    }

    pub fn record(&self, attempt: &Attempt) -> Result<()> {
        self.conn.execute(
            "INSERT INTO attempts (user, quiz, prompt, is_correct, user_answer, expected_answer, attempted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                attempt.user,
                attempt.quiz,
                attempt.prompt,
                attempt.is_correct as i32,
                attempt.user_answer,
                attempt.expected_answer,
                attempt.attempted_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Overall statistics for one user on one quiz
    pub fn stats(&self, user: &str, quiz: &str) -> Result<AttemptStats> {
        let stats = self.conn.query_row(
            "SELECT COUNT(*), SUM(is_correct) FROM attempts WHERE user = ?1 AND quiz = ?2",
            params![user, quiz],
            |row| {
                let total: i64 = row.get(0)?;
                let correct: i64 = row.get::<_, Option<i64>>(1)?.unwrap_or(0);
                let accuracy = if total > 0 {
                    (correct as f64 / total as f64) * 100.0
                } else {
                    0.0
                };

                Ok(AttemptStats {
                    total_attempts: total,
                    correct_count: correct,
                    incorrect_count: total - correct,
                    accuracy_percent: accuracy,
                })
            },
        )?;

        Ok(stats)
    }

    /// Prompts answered incorrectly most often, with their miss counts.
    pub fn most_missed(&self, user: &str, quiz: &str, limit: usize) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT prompt, COUNT(*) AS misses
             FROM attempts
             WHERE user = ?1 AND quiz = ?2 AND is_correct = 0
             GROUP BY prompt
             ORDER BY misses DESC, prompt ASC
             LIMIT ?3",
        )?;

        let rows = stmt.query_map(params![user, quiz, limit as i64], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let missed = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(missed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(prompt: &str, is_correct: bool) -> Attempt {
        Attempt {
            user: "ana".to_string(),
            quiz: "capitals".to_string(),
            prompt: prompt.to_string(),
            is_correct,
            user_answer: "x".to_string(),
            expected_answer: "y".to_string(),
            attempted_at: Utc::now(),
        }
    }

    #[test]
    fn empty_history_has_zero_stats() {
        let log = AttemptLog::open_in_memory().unwrap();
        let stats = log.stats("ana", "capitals").unwrap();
        assert_eq!(stats.total_attempts, 0);
        assert_eq!(stats.accuracy_percent, 0.0);
        assert!(log.most_missed("ana", "capitals", 5).unwrap().is_empty());
    }

    #[test]
    fn stats_add_up() {
        let log = AttemptLog::open_in_memory().unwrap();
        log.record(&attempt("France", true)).unwrap();
        log.record(&attempt("France", false)).unwrap();
        log.record(&attempt("Italy", true)).unwrap();
        log.record(&attempt("Italy", true)).unwrap();

        let stats = log.stats("ana", "capitals").unwrap();
        assert_eq!(stats.total_attempts, 4);
        assert_eq!(stats.correct_count, 3);
        assert_eq!(stats.incorrect_count, 1);
        assert!((stats.accuracy_percent - 75.0).abs() < f64::EPSILON);

        // other sessions are not counted
        assert_eq!(log.stats("bob", "capitals").unwrap().total_attempts, 0);
    }

    #[test]
    fn most_missed_is_sorted_and_limited() {
        let log = AttemptLog::open_in_memory().unwrap();
        for _ in 0..3 {
            log.record(&attempt("Spain", false)).unwrap();
        }
        log.record(&attempt("France", false)).unwrap();
        log.record(&attempt("Italy", false)).unwrap();
        log.record(&attempt("Italy", false)).unwrap();
        log.record(&attempt("Portugal", true)).unwrap();

        let missed = log.most_missed("ana", "capitals", 2).unwrap();
        assert_eq!(
            missed,
            vec![("Spain".to_string(), 3), ("Italy".to_string(), 2)]
        );
    }

    #[test]
    fn history_persists_on_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("data/history.db");
        {
            let log = AttemptLog::open(&path).unwrap();
            log.record(&attempt("France", true)).unwrap();
        }
        let log = AttemptLog::open(&path).unwrap();
        assert_eq!(log.stats("ana", "capitals").unwrap().total_attempts, 1);
    }
}
