//! Command line and environment configuration.

use std::path::{Path, PathBuf};

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use thiserror::Error;

use quiz_core::model::{FileId, IdError};

pub const DEFAULT_DB_URL: &str = "sqlite://learnlab.sqlite3";
pub const DEFAULT_FILE_ID: &str = "demo";

#[derive(Debug, Parser)]
#[command(
    name = "learnlab",
    version,
    about = "Learn Lab - take quizzes generated from your study files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// SQLite database URL or path.
    #[arg(long = "db", env = "LEARNLAB_DB_URL", default_value = DEFAULT_DB_URL, global = true)]
    pub db_url: String,

    /// Study file whose quizzes are shown on launch.
    #[arg(long = "file-id", env = "LEARNLAB_FILE_ID", default_value = DEFAULT_FILE_ID, global = true)]
    pub file_id: String,

    /// Present questions in random order.
    #[arg(
        long = "shuffle-questions",
        env = "LEARNLAB_SHUFFLE_QUESTIONS",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub shuffle_questions: bool,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Subcommand)]
pub enum Command {
    /// Launch the desktop app (default).
    #[default]
    Ui,
    /// Insert a demo quiz for the configured study file.
    Seed,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid --db value: {raw}")]
    InvalidDbUrl { raw: String },
    #[error("invalid --file-id value: {0}")]
    InvalidFileId(#[from] IdError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub command: Command,
    pub db_url: String,
    pub file_id: FileId,
    pub shuffle_questions: bool,
}

impl Cli {
    /// # Errors
    ///
    /// Returns `ConfigError` when the database URL is blank or the file id is
    /// not a valid route segment.
    pub fn into_config(self) -> Result<AppConfig, ConfigError> {
        if self.db_url.trim().is_empty() {
            return Err(ConfigError::InvalidDbUrl { raw: self.db_url });
        }
        Ok(AppConfig {
            command: self.command.unwrap_or_default(),
            db_url: normalize_sqlite_url(&self.db_url),
            file_id: FileId::new(&self.file_id)?,
            shuffle_questions: self.shuffle_questions,
        })
    }
}

fn is_in_memory(db_url: &str) -> bool {
    db_url == "sqlite::memory:" || db_url.contains("mode=memory")
}

/// Turn a bare path or relative `sqlite:` URL into an absolute `sqlite://` URL.
#[must_use]
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_in_memory(trimmed) || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directories if missing.
///
/// # Errors
///
/// Returns `ConfigError` for a URL without a path or when the filesystem
/// refuses the file.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), ConfigError> {
    if is_in_memory(db_url) {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        });
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_launch_ui_for_demo_file() {
        let cli = Cli::try_parse_from(["learnlab", "--db", "sqlite::memory:"]).unwrap();
        let config = cli.into_config().unwrap();
        assert_eq!(config.command, Command::Ui);
        assert_eq!(config.db_url, "sqlite::memory:");
        assert_eq!(config.file_id.as_str(), DEFAULT_FILE_ID);
        assert!(!config.shuffle_questions);
    }

    #[test]
    fn seed_subcommand_takes_global_flags() {
        let cli = Cli::try_parse_from([
            "learnlab",
            "seed",
            "--file-id",
            "biology",
            "--shuffle-questions",
            "-vv",
            "--db",
            "sqlite::memory:",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let config = cli.into_config().unwrap();
        assert_eq!(config.command, Command::Seed);
        assert_eq!(config.file_id.as_str(), "biology");
        assert!(config.shuffle_questions);
    }

    #[test]
    fn file_id_with_slash_is_rejected() {
        let cli =
            Cli::try_parse_from(["learnlab", "--file-id", "a/b", "--db", "sqlite::memory:"]).unwrap();
        assert!(matches!(
            cli.into_config(),
            Err(ConfigError::InvalidFileId(_))
        ));
    }

    #[test]
    fn relative_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("sqlite:data/learnlab.sqlite3");
        assert!(url.starts_with("sqlite:///"), "{url}");
        assert!(url.ends_with("data/learnlab.sqlite3"), "{url}");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/x.sqlite3"),
            "sqlite:///tmp/x.sqlite3"
        );
    }

    #[test]
    fn prepare_rejects_urls_without_path() {
        assert!(matches!(
            prepare_sqlite_file("postgres://db"),
            Err(ConfigError::InvalidDbUrl { .. })
        ));
        assert!(prepare_sqlite_file("sqlite::memory:").is_ok());
    }
}
