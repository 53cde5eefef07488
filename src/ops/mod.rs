//! High-level operations over the daily rules, the entry store and the
//! support generator.
//!
//! This module provides the user-facing flows: logging a mood with its
//! support message, delete with undo, the daily reminder, and the chart and
//! summary views.

pub mod analytics;
pub mod delete;
pub mod record;
pub mod reminder;
pub mod support;

// Re-export commonly used items
pub use analytics::{axis_label, month_label, mood_series, summarize, ChartPoint, MoodSummary};
pub use delete::{delete_entry, undo_delete, Restored, UndoSlot};
pub use record::record_mood;
pub use reminder::{
    fire_reminder, initial_delay, run_daily, should_remind, ConsoleNotifier, Notifier,
};
pub use support::SupportService;
