//! Mood symbols, entries, and support messages.

use crate::constants::{FALLBACK_SUPPORT_MESSAGE, FALLBACK_SUPPORT_TITLE};
use chrono::{DateTime, TimeZone};
use std::fmt;

/// One of the six moods a user can log, or whatever else came through the store.
///
/// Raw text is converted at the boundary with [`Mood::from_raw`]. Anything that
/// is not a known emoji or English name becomes `Unknown`, which keeps the raw
/// text so it can be written back unchanged.
///
/// # Examples
///
/// ```
/// use moodyday::mood_core::Mood;
///
/// assert_eq!(Mood::from_raw("😊"), Mood::Happy);
/// assert_eq!(Mood::from_raw(" Tired "), Mood::Tired);
/// assert_eq!(Mood::from_raw("🤷"), Mood::Unknown("🤷".to_string()));
/// assert_eq!(Mood::Unknown("🤷".to_string()).symbol(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Tired,
    Neutral,
    Confident,
    /// Unrecognized raw value.
    Unknown(String),
}

impl Mood {
    /// The known moods in picker order.
    pub const KNOWN: [Mood; 6] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Angry,
        Mood::Tired,
        Mood::Neutral,
        Mood::Confident,
    ];

    /// Converts raw text (emoji or English name) into a mood.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        Self::KNOWN
            .iter()
            .find(|mood| mood.symbol() == trimmed || mood.name().eq_ignore_ascii_case(trimmed))
            .cloned()
            .unwrap_or_else(|| Mood::Unknown(raw.to_string()))
    }

    /// Emoji shown for this mood; empty for unknown moods.
    pub fn symbol(&self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Sad => "😔",
            Mood::Angry => "😡",
            Mood::Tired => "😴",
            Mood::Neutral => "😐",
            Mood::Confident => "😎",
            Mood::Unknown(_) => "",
        }
    }

    /// Lowercase English name.
    pub fn name(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::Tired => "tired",
            Mood::Neutral => "neutral",
            Mood::Confident => "confident",
            Mood::Unknown(_) => "unknown",
        }
    }

    /// Text written to the `mood` column.
    pub fn as_stored(&self) -> &str {
        match self {
            Mood::Unknown(raw) => raw,
            known => known.symbol(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Mood::Unknown(_))
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A supportive (title, message) pair attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportMessage {
    pub title: String,
    pub message: String,
}

impl SupportMessage {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// The fixed pair used whenever generation fails.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_SUPPORT_TITLE, FALLBACK_SUPPORT_MESSAGE)
    }
}

/// A persisted (or about to be persisted) mood record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodEntry {
    /// Store-assigned identifier; `0` until the entry is persisted.
    pub id: i64,
    pub mood: Mood,
    /// Free text; empty means no note.
    pub note: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub support_title: Option<String>,
    pub support_message: Option<String>,
}

impl MoodEntry {
    /// Creates an unpersisted entry without a support message.
    pub fn new(mood: Mood, note: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: 0,
            mood,
            note: note.into(),
            timestamp,
            support_title: None,
            support_message: None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    pub fn has_note(&self) -> bool {
        !self.note.is_empty()
    }

    /// Cached support message, only when both halves are non-empty.
    pub fn cached_support(&self) -> Option<SupportMessage> {
        match (&self.support_title, &self.support_message) {
            (Some(title), Some(message)) if !title.is_empty() && !message.is_empty() => {
                Some(SupportMessage::new(title.clone(), message.clone()))
            }
            _ => None,
        }
    }

    /// Replaces both support fields.
    pub fn with_support(mut self, support: Option<SupportMessage>) -> Self {
        let (title, message) = match support {
            Some(s) => (Some(s.title), Some(s.message)),
            None => (None, None),
        };
        self.support_title = title;
        self.support_message = message;
        self
    }

    /// The entry's instant in `tz`, if the timestamp is representable.
    pub fn local_datetime<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.timestamp_millis_opt(self.timestamp).single()
    }
}

/// Input to a save: what the user picked and typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodDraft {
    pub mood: Mood,
    pub note: String,
    pub support: Option<SupportMessage>,
}

impl MoodDraft {
    pub fn new(mood: Mood, note: impl Into<String>) -> Self {
        Self {
            mood,
            note: note.into(),
            support: None,
        }
    }

    pub fn with_support(mut self, support: SupportMessage) -> Self {
        self.support = Some(support);
        self
    }
}
