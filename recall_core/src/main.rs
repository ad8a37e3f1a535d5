//! recall CLI - pick a quiz, answer until every question is learned.

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use recall_core::{
    find_quiz, list_quizzes, load_config_from, load_questions, menu_lines, results_path,
    select_quiz, AttemptLog, Console, MasteryLoop, MatchMode, QuizError, RecallConfig, SaveStore,
    StdConsole,
};

#[derive(Parser)]
#[command(name = "recall", version, about = "Flashcard quiz runner with resumable progress")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone)]
struct CommonArgs {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory holding questions/, saves/ and results/
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz (the default)
    Play {
        /// Player name
        #[arg(long)]
        user: Option<String>,

        /// Quiz name (file name without extension); prompts with a menu if omitted
        #[arg(long)]
        quiz: Option<String>,

        /// Correct answers needed before a question is considered learned
        #[arg(long)]
        threshold: Option<u32>,

        /// Accept answers within one typo of the expected answer
        #[arg(long)]
        fuzzy: bool,
    },

    /// List available quizzes
    List,

    /// Show answer history for a player and quiz
    Stats {
        #[arg(long)]
        user: String,

        #[arg(long)]
        quiz: String,

        /// Number of most-missed questions to show
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = load_config(&cli.common).and_then(|config| {
        match cli.command.unwrap_or(Commands::Play {
            user: None,
            quiz: None,
            threshold: None,
            fuzzy: false,
        }) {
            Commands::Play {
                user,
                quiz,
                threshold,
                fuzzy,
            } => play(config, user, quiz, threshold, fuzzy),
            Commands::List => list(&config),
            Commands::Stats { user, quiz, limit } => stats(&config, &user, &quiz, limit),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn load_config(common: &CommonArgs) -> Result<RecallConfig> {
    let mut config = load_config_from(common.config.as_deref()).context("failed to load config")?;
    if let Some(dir) = &common.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn play(
    mut config: RecallConfig,
    user: Option<String>,
    quiz: Option<String>,
    threshold: Option<u32>,
    fuzzy: bool,
) -> Result<()> {
    if let Some(threshold) = threshold {
        config.mastery_threshold = threshold;
    }
    if fuzzy {
        config.match_mode = MatchMode::Fuzzy;
    }
    config.validate()?;

    let mut console = StdConsole;

    let user = match user {
        Some(user) if !user.trim().is_empty() => user.trim().to_string(),
        Some(_) => bail!("player name must not be empty"),
        None => match ask_player_name(&mut console)? {
            Some(user) => user,
            None => return Ok(()),
        },
    };

    let questions_dir = config.questions_dir();
    let quizzes = list_quizzes(&questions_dir)
        .with_context(|| format!("failed to list quizzes in {}", questions_dir.display()))?;

    let entry = match quiz {
        Some(name) => match find_quiz(&quizzes, &name) {
            Some(entry) => entry.clone(),
            None => bail!("no quiz named '{}' in {}", name, questions_dir.display()),
        },
        None => match select_quiz(&quizzes, &mut console)? {
            Some(entry) => entry,
            None => return Ok(()),
        },
    };

    let questions = load_questions(&entry.path)
        .with_context(|| format!("failed to load quiz '{}'", entry.name))?;

    let store = SaveStore::for_session(&config.saves_dir(), &user, &entry.name);
    let results = results_path(&config.results_dir(), &user, &entry.name);

    let mut quiz = MasteryLoop::new(questions, config.matcher(), config.mastery_threshold)
        .with_save_store(store)
        .with_results_file(&results);

    if config.record_history {
        match AttemptLog::open(&config.history_db()) {
            Ok(log) => quiz = quiz.with_history(log, &user, &entry.name),
            Err(e) => warn!(error = %e, "attempt history disabled"),
        }
    }

    let outcome = quiz.run(&mut console)?;
    if !outcome.completed {
        console.say("Progress saved. Run again to pick up where you left off.");
    }
    console.say(&format!("Results written to {}", results.display()));
    Ok(())
}

fn ask_player_name<C: Console>(console: &mut C) -> Result<Option<String>> {
    loop {
        let Some(name) = console.read_line("Player name: ")? else {
            return Ok(None);
        };
        let name = name.trim();
        if !name.is_empty() {
            return Ok(Some(name.to_string()));
        }
        console.say("Please enter a name.");
    }
}

fn list(config: &RecallConfig) -> Result<()> {
    let questions_dir = config.questions_dir();
    let quizzes = match list_quizzes(&questions_dir) {
        Ok(quizzes) => quizzes,
        Err(QuizError::NoQuizzes(dir)) => {
            println!("No quizzes found in {}", dir.display());
            return Ok(());
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!("failed to list quizzes in {}", questions_dir.display())
            })
        }
    };

    println!("Available quizzes:");
    for line in menu_lines(&quizzes) {
        println!("{}", line);
    }
    Ok(())
}

fn stats(config: &RecallConfig, user: &str, quiz: &str, limit: usize) -> Result<()> {
    let db = config.history_db();
    if !db.exists() {
        println!("No history recorded yet.");
        return Ok(());
    }

    let log = AttemptLog::open(&db)
        .with_context(|| format!("failed to open history {}", db.display()))?;
    let stats = log.stats(user, quiz)?;

    println!("{} on {}:", user, quiz);
    println!("  attempts:  {}", stats.total_attempts);
    println!("  correct:   {}", stats.correct_count);
    println!("  incorrect: {}", stats.incorrect_count);
    println!("  accuracy:  {:.1}%", stats.accuracy_percent);

    let missed = log.most_missed(user, quiz, limit)?;
    if !missed.is_empty() {
        println!("Most missed:");
        for (prompt, misses) in missed {
            println!("  {} ({} misses)", prompt, misses);
        }
    }
    Ok(())
}
