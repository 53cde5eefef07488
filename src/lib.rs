/*!
# moodyday

moodyday keeps a journal of one mood per calendar day. Each entry can carry a
short supportive message generated once by a chat completion API and cached
on the entry.

## Core Features

- Log today's mood, replacing today's entry if it already exists
- Browse entries grouped by month, newest first
- Trend and most frequent mood over the most recent entries
- Delete with a short undo window
- Daily reminder that stays quiet once today is logged

## Architecture

- `cli`: Command-line interface handling using clap
- `config`: Configuration loading and validation
- `errors`: Error handling infrastructure
- `mood_core`: Daily rules, month buckets, scores and trends
- `db`: SQLite entry store
- `ai`: Chat completion client for support messages
- `ops`: High-level operations (record, support, delete/undo, reminder, analytics)

## Usage Example

```rust,no_run
use moodyday::db::Database;
use moodyday::mood_core::{DailyRules, Mood, MoodDraft, SystemClock};

fn main() -> moodyday::AppResult<()> {
    let db = Database::open(std::path::Path::new("/tmp/moods.db"))?;
    db.initialize_schema()?;

    let rules = DailyRules::new(SystemClock);
    let entry = rules.save(&db, MoodDraft::new(Mood::Happy, "sunny walk"))?;
    println!("Saved entry {}", entry.id);
    Ok(())
}
```
*/

/// AI support-message generation
pub mod ai;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application constants
pub mod constants;
/// SQLite entry store
pub mod db;
/// Error types and utilities for error handling
pub mod errors;
/// Daily rule engine
pub mod mood_core;
/// High-level operations
pub mod ops;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use mood_core::{DailyRules, Mood, MoodDraft, MoodEntry, SupportMessage};
