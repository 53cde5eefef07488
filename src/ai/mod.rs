//! Support-message generation.
//!
//! This module talks to an OpenAI-style chat completion endpoint to turn a
//! mood (and optional note) into a short supportive title and message.
//!
//! # Module Structure
//!
//! - `openai`: HTTP client for the chat completion endpoint
//! - `prompts`: Prompt builders and reply parsing
//!
//! # Example
//!
//! ```no_run
//! use moodyday::ai::{OpenAiClient, SupportGenerator};
//! use moodyday::mood_core::Mood;
//!
//! let client = OpenAiClient::new("https://api.openai.com", Some("sk-...".to_string()), "gpt-3.5-turbo")?;
//! let support = client.generate(&Mood::Tired, Some("long week"))?;
//! println!("{}: {}", support.title, support.message);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod openai;
pub mod prompts;

use crate::errors::AppResult;
use crate::mood_core::{Mood, SupportMessage};

pub use openai::{Message, OpenAiClient};
pub use prompts::{parse_support_reply, support_prompt, SYSTEM_PROMPT};

/// Produces a support message for a mood.
///
/// Errors are returned as-is; the caching layer in `ops::support` decides how
/// to recover from them.
pub trait SupportGenerator {
    /// `note` is `None` when the user left it empty.
    fn generate(&self, mood: &Mood, note: Option<&str>) -> AppResult<SupportMessage>;
}

impl<G: SupportGenerator + ?Sized> SupportGenerator for &G {
    fn generate(&self, mood: &Mood, note: Option<&str>) -> AppResult<SupportMessage> {
        (**self).generate(mood, note)
    }
}
