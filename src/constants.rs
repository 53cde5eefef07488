//! Constants used throughout the application.
//!
//! This module contains all constants used in the moodyday application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "moodyday";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "Log one mood a day and watch how it moves";

// Logging
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";

// Configuration Keys & Environment Variables
/// Environment variable for the database file location.
pub const ENV_VAR_DB_PATH: &str = "MOODYDAY_DB";
/// Environment variable holding the chat completion bearer credential.
pub const ENV_VAR_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable overriding the chat completion base URL.
pub const ENV_VAR_API_BASE: &str = "MOODYDAY_API_BASE";
/// Environment variable overriding the chat model.
pub const ENV_VAR_MODEL: &str = "MOODYDAY_MODEL";
/// Environment variable for the daily reminder time (HH:MM).
pub const ENV_VAR_REMINDER_TIME: &str = "MOODYDAY_REMINDER_TIME";
/// Environment variable for the undo window after a delete, in seconds.
pub const ENV_VAR_UNDO_SECONDS: &str = "MOODYDAY_UNDO_SECONDS";
/// Default database location, expanded with `shellexpand`.
pub const DEFAULT_DB_PATH: &str = "~/.local/share/moodyday/moods.db";
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Database
/// Maximum pooled SQLite connections.
pub const DB_POOL_SIZE: u32 = 5;
/// How long a writer waits for the SQLite write lock, in milliseconds.
pub const DB_BUSY_TIMEOUT_MS: u64 = 5_000;

// Support messages
/// Default chat completion base URL.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com";
/// Default chat model.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
/// Sampling temperature sent with every request.
pub const CHAT_TEMPERATURE: f64 = 0.7;
/// Token cap for a support reply.
pub const CHAT_MAX_TOKENS: u32 = 150;
/// Connect/read timeout for the chat completion request, in seconds.
pub const CHAT_TIMEOUT_SECS: u64 = 30;
/// Title used whenever a support message cannot be generated.
pub const FALLBACK_SUPPORT_TITLE: &str = "Reflection time";
/// Message used whenever a support message cannot be generated.
pub const FALLBACK_SUPPORT_MESSAGE: &str =
    "Every emotion teaches us something about ourselves. Take a moment to reflect on what you need right now.";

// Analytics
/// Number of most recent entries used for trend and frequency.
pub const DEFAULT_TREND_WINDOW: usize = 7;
/// Chart x-axis label format ("Oct 3").
pub const CHART_DATE_FORMAT: &str = "%b %-d";
/// History month header format ("October 2026").
pub const MONTH_HEADER_FORMAT: &str = "%B %Y";

// Reminders
/// Default local reminder hour.
pub const DEFAULT_REMINDER_HOUR: u32 = 20;
/// Default local reminder minute.
pub const DEFAULT_REMINDER_MINUTE: u32 = 0;
/// Reminder notification title.
pub const REMINDER_TITLE: &str = "How are you feeling today?";
/// Reminder notification body.
pub const REMINDER_BODY: &str = "Take a moment to reflect and log your mood";

// Undo
/// Default undo window after a delete, in seconds.
pub const DEFAULT_UNDO_SECONDS: u64 = 8;
