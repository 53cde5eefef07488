//! Configuration management for the moodyday application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults. It covers the database location, the chat
//! completion endpoint used for support messages, the daily reminder time and the
//! undo window after a delete.
//!
//! # Environment Variables
//!
//! - `MOODYDAY_DB`: Path to the SQLite database (defaults to ~/.local/share/moodyday/moods.db)
//! - `OPENAI_API_KEY`: Bearer credential for support messages (optional)
//! - `MOODYDAY_API_BASE`: Chat completion base URL (defaults to https://api.openai.com)
//! - `MOODYDAY_MODEL`: Chat model (defaults to gpt-3.5-turbo)
//! - `MOODYDAY_REMINDER_TIME`: Local reminder time as HH:MM (defaults to 20:00)
//! - `MOODYDAY_UNDO_SECONDS`: Undo window after a delete (defaults to 8)

use crate::constants::{
    DEFAULT_API_BASE, DEFAULT_CHAT_MODEL, DEFAULT_DB_PATH, DEFAULT_REMINDER_HOUR,
    DEFAULT_REMINDER_MINUTE, DEFAULT_UNDO_SECONDS, ENV_VAR_API_BASE, ENV_VAR_API_KEY,
    ENV_VAR_DB_PATH, ENV_VAR_MODEL, ENV_VAR_REMINDER_TIME, ENV_VAR_UNDO_SECONDS,
    REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use chrono::NaiveTime;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the moodyday application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use moodyday::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("/tmp/moods.db"),
///     ..Config::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct Config {
    /// SQLite database file.
    pub db_path: PathBuf,

    /// Bearer credential for the chat completion endpoint.
    ///
    /// `None` means support messages always use the fallback.
    pub api_key: Option<String>,

    /// Chat completion base URL, without the `/v1/...` path.
    pub api_base: String,

    /// Chat model name.
    pub model: String,

    /// Local time of the daily reminder.
    pub reminder_time: NaiveTime,

    /// How long a deleted entry can be restored.
    pub undo_window: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_path", &self.db_path)
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| REDACTED_PLACEHOLDER),
            )
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("reminder_time", &self.reminder_time)
            .field("undo_window", &self.undo_window)
            .finish()
    }
}

impl Default for Config {
    /// Creates a Config with default values and an empty database path.
    fn default() -> Self {
        Config {
            db_path: PathBuf::new(),
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            reminder_time: default_reminder_time(),
            undo_window: Duration::from_secs(DEFAULT_UNDO_SECONDS),
        }
    }
}

fn default_reminder_time() -> NaiveTime {
    NaiveTime::from_hms_opt(DEFAULT_REMINDER_HOUR, DEFAULT_REMINDER_MINUTE, 0)
        .unwrap_or(NaiveTime::MIN)
}

/// Reads a variable, treating unset and blank values alike.
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parses a `HH:MM` reminder time.
///
/// # Examples
///
/// ```
/// use moodyday::config::parse_reminder_time;
///
/// let time = parse_reminder_time("07:30").unwrap();
/// assert_eq!(time.to_string(), "07:30:00");
/// assert!(parse_reminder_time("25:00").is_err());
/// ```
pub fn parse_reminder_time(raw: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|e| {
        AppError::Config(format!(
            "Invalid {} '{}' (expected HH:MM): {}",
            ENV_VAR_REMINDER_TIME, raw, e
        ))
    })
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The database path is expanded with `shellexpand` to handle `~` and
    /// environment variable references.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The database path expansion fails
    /// - The reminder time is not `HH:MM`
    /// - The undo window is not a whole number of seconds
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use moodyday::Config;
    ///
    /// match Config::load() {
    ///     Ok(config) => println!("Using database at {:?}", config.db_path),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load() -> AppResult<Self> {
        let db_path_raw =
            non_empty_var(ENV_VAR_DB_PATH).unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let expanded_path = shellexpand::full(&db_path_raw)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let db_path = PathBuf::from(expanded_path.into_owned());

        let reminder_time = match non_empty_var(ENV_VAR_REMINDER_TIME) {
            Some(raw) => parse_reminder_time(&raw)?,
            None => default_reminder_time(),
        };

        let undo_window = match non_empty_var(ENV_VAR_UNDO_SECONDS) {
            Some(raw) => {
                let seconds: u64 = raw.parse().map_err(|_| {
                    AppError::Config(format!(
                        "Invalid {} '{}' (expected whole seconds)",
                        ENV_VAR_UNDO_SECONDS, raw
                    ))
                })?;
                Duration::from_secs(seconds)
            }
            None => Duration::from_secs(DEFAULT_UNDO_SECONDS),
        };

        Ok(Config {
            db_path,
            api_key: non_empty_var(ENV_VAR_API_KEY),
            api_base: non_empty_var(ENV_VAR_API_BASE)
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: non_empty_var(ENV_VAR_MODEL).unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            reminder_time,
            undo_window,
        })
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with one of the following messages:
    /// - "Database path is empty"
    /// - "Database path must be absolute"
    /// - "API base URL must start with http:// or https://"
    /// - "Model name is empty"
    pub fn validate(&self) -> AppResult<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(AppError::Config("Database path is empty".to_string()));
        }

        if !self.db_path.is_absolute() {
            return Err(AppError::Config(
                "Database path must be absolute".to_string(),
            ));
        }

        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(AppError::Config(
                "API base URL must start with http:// or https://".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model name is empty".to_string()));
        }

        Ok(())
    }
}
