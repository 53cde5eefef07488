use crate::constants::{APP_DESCRIPTION, APP_NAME, DEFAULT_TREND_WINDOW, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use crate::errors::{AppError, AppResult};
use crate::mood_core::Mood;
use clap::{Parser, Subcommand};

/// Log one mood a day and watch how it moves
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Log output format
    #[clap(long, global = true, default_value = LOG_FORMAT_TEXT, value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON])]
    pub log_format: String,

    /// Print verbose output
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Log today's mood (replaces today's entry if there is one)
    Log {
        /// Mood emoji or name: happy, sad, angry, tired, neutral, confident
        mood: String,

        /// Optional note
        #[clap(short = 'n', long)]
        note: Option<String>,

        /// Skip the support message
        #[clap(long)]
        no_support: bool,
    },

    /// Show today's entry
    Today,

    /// List entries by month, newest first
    History,

    /// Show the mood chart, trend and most frequent mood
    Stats {
        /// Number of recent entries used for trend and frequency
        #[clap(short = 'w', long, default_value_t = DEFAULT_TREND_WINDOW)]
        window: usize,
    },

    /// Show the support message for an entry
    Support {
        /// Entry id
        id: i64,
    },

    /// Delete an entry, with a short window to undo
    Delete {
        /// Entry id
        id: i64,

        /// Delete without offering undo
        #[clap(long)]
        no_undo: bool,
    },

    /// Remind to log a mood if today has no entry
    Remind {
        /// Check once now instead of waiting for the daily reminder time
        #[clap(long)]
        once: bool,
    },
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        CliArgs::parse_from(std::env::args())
    }

    pub fn json_logs(&self) -> bool {
        self.log_format == LOG_FORMAT_JSON
    }
}

/// Parses a mood typed on the command line. Only the six known moods are accepted.
pub fn parse_mood(raw: &str) -> AppResult<Mood> {
    match Mood::from_raw(raw) {
        Mood::Unknown(_) => {
            let choices: Vec<String> = Mood::KNOWN
                .iter()
                .map(|m| format!("{} {}", m.symbol(), m.name()))
                .collect();
            Err(AppError::InvalidInput(format!(
                "Unknown mood '{}'. Choose one of: {}",
                raw.trim(),
                choices.join(", ")
            )))
        }
        mood => Ok(mood),
    }
}
