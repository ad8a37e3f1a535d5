//! Quiz configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QuizError, Result};
use crate::fuzzy::{AnswerMatcher, MatchMode};

/// Top-level recall configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallConfig {
    /// Root directory for quizzes, saves, results and history.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Overrides `{data_dir}/questions`.
    #[serde(default)]
    pub questions_dir: Option<PathBuf>,
    /// Overrides `{data_dir}/saves`.
    #[serde(default)]
    pub saves_dir: Option<PathBuf>,
    /// Overrides `{data_dir}/results`.
    #[serde(default)]
    pub results_dir: Option<PathBuf>,
    /// Overrides `{data_dir}/history.db`.
    #[serde(default)]
    pub history_db: Option<PathBuf>,
    /// Correct answers needed before a question stops being asked.
    #[serde(default = "default_threshold")]
    pub mastery_threshold: u32,
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Largest edit distance accepted in fuzzy mode.
    #[serde(default = "default_max_distance")]
    pub max_distance: usize,
    #[serde(default = "default_record_history")]
    pub record_history: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_threshold() -> u32 {
    2
}
fn default_max_distance() -> usize {
    1
}
fn default_record_history() -> bool {
    true
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            questions_dir: None,
            saves_dir: None,
            results_dir: None,
            history_db: None,
            mastery_threshold: default_threshold(),
            match_mode: MatchMode::default(),
            max_distance: default_max_distance(),
            record_history: default_record_history(),
        }
    }
}

impl RecallConfig {
    pub fn questions_dir(&self) -> PathBuf {
        self.questions_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("questions"))
    }

    pub fn saves_dir(&self) -> PathBuf {
        self.saves_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("saves"))
    }

    pub fn results_dir(&self) -> PathBuf {
        self.results_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("results"))
    }

    pub fn history_db(&self) -> PathBuf {
        self.history_db
            .clone()
            .unwrap_or_else(|| self.data_dir.join("history.db"))
    }

    pub fn matcher(&self) -> AnswerMatcher {
        AnswerMatcher::new(self.match_mode, self.max_distance)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mastery_threshold == 0 {
            return Err(QuizError::Config(
                "mastery_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `recall.toml` in the current directory
/// 2. `~/.config/recall/config.toml`
///
/// Falls back to defaults when neither exists.
pub fn load_config_from(path: Option<&Path>) -> Result<RecallConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => {
            return Err(QuizError::Config(format!(
                "config file not found: {}",
                p.display()
            )))
        }
        None => {
            let local = PathBuf::from("recall.toml");
            if local.exists() {
                Some(local)
            } else {
                home_config_path().filter(|p| p.exists())
            }
        }
    };

    let config = match config_path {
        Some(path) => {
            debug!(path = %path.display(), "reading config");
            let content = std::fs::read_to_string(&path).map_err(|e| QuizError::io(&path, e))?;
            parse_config(&content)
                .map_err(|e| QuizError::Config(format!("{}: {}", path.display(), e)))?
        }
        None => RecallConfig::default(),
    };

    config.validate()?;
    Ok(config)
}

fn parse_config(content: &str) -> std::result::Result<RecallConfig, toml::de::Error> {
    toml::from_str(content)
}

fn home_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|h| {
        PathBuf::from(h)
            .join(".config")
            .join("recall")
            .join("config.toml")
    })
}
