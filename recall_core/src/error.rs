//! Error types for quiz loading, persistence and history.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while running a quiz.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the console failed.
    #[error("console error: {0}")]
    Console(#[from] std::io::Error),

    /// The question file has an extension we cannot read.
    #[error("unsupported quiz file format: {0}")]
    UnsupportedFormat(PathBuf),

    /// A source row is missing its prompt or answer column.
    #[error("{path}: row {row} needs a question and an answer")]
    MalformedRow { path: PathBuf, row: usize },

    #[error("failed to read CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read spreadsheet {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },

    /// `load` was called with no save on disk.
    #[error("no save found at {0}")]
    NoSave(PathBuf),

    /// The save file exists but cannot be decoded.
    #[error("corrupt save file {path}: {message}")]
    CorruptSave { path: PathBuf, message: String },

    /// The quiz directory holds no question files.
    #[error("no quizzes found in {0}")]
    NoQuizzes(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// The attempt history database failed.
    #[error("history database error: {0}")]
    History(#[from] rusqlite::Error),
}

impl QuizError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        QuizError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;
