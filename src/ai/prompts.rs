//! System prompt, message builder and reply parsing for support messages.

use super::openai::Message;
use crate::constants::{FALLBACK_SUPPORT_MESSAGE, FALLBACK_SUPPORT_TITLE};
use crate::mood_core::{Mood, SupportMessage};

/// System prompt establishing the assistant's tone.
pub const SYSTEM_PROMPT: &str = "You are an empathetic AI assistant providing supportive responses to people's moods and situations. Focus on being genuine, specific, and encouraging.";

const TITLE_PREFIX: &str = "Title:";
const MESSAGE_PREFIX: &str = "Message:";

/// Builds the chat messages asking for a titled support message.
///
/// The note is quoted back to the model only when present, and the format
/// instructions ask for one `Title:` line and one `Message:` line.
pub fn support_prompt(mood: &Mood, note: Option<&str>) -> Vec<Message> {
    let feeling = match mood {
        Mood::Unknown(raw) => raw.trim().to_string(),
        known => format!("{} ({})", known.name(), known.symbol()),
    };
    let context = note
        .map(|n| format!("They mentioned: \"{}\"\n", n))
        .unwrap_or_default();
    let situation = if note.is_some() { " and situation" } else { "" };
    let addresses = if note.is_some() {
        " and specifically addresses their situation"
    } else {
        ""
    };

    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            r#"As an empathetic AI assistant, provide a supportive response for someone who is feeling {feeling}.
{context}
Return the response in this exact format:
Title: [A short, encouraging title that relates to their mood{situation}]
Message: [A supportive, empathetic message of 2-3 sentences that acknowledges their feelings{addresses}]

Keep the message personal, warm, and actionable if appropriate."#
        )),
    ]
}

/// Extracts the first `Title:` and `Message:` lines from a reply.
///
/// A missing or empty line falls back to that half of the fixed fallback pair.
///
/// # Examples
///
/// ```
/// use moodyday::ai::parse_support_reply;
///
/// let reply = "Title: Small Wins\nMessage: You showed up today.";
/// let support = parse_support_reply(reply);
/// assert_eq!(support.title, "Small Wins");
/// assert_eq!(support.message, "You showed up today.");
/// ```
pub fn parse_support_reply(content: &str) -> SupportMessage {
    let field = |prefix: &str| {
        content
            .lines()
            .find_map(|line| line.strip_prefix(prefix))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    SupportMessage::new(
        field(TITLE_PREFIX).unwrap_or_else(|| FALLBACK_SUPPORT_TITLE.to_string()),
        field(MESSAGE_PREFIX).unwrap_or_else(|| FALLBACK_SUPPORT_MESSAGE.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_prompt_structure() {
        let messages = support_prompt(&Mood::Happy, None);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("feeling happy (😊)"));
        assert!(!messages[1].content.contains("They mentioned"));
        assert!(!messages[1].content.contains("situation"));
    }

    #[test]
    fn test_support_prompt_includes_note() {
        let messages = support_prompt(&Mood::Tired, Some("Working overtime this week"));
        let user = &messages[1].content;
        assert!(user.contains("They mentioned: \"Working overtime this week\""));
        assert!(user.contains("relates to their mood and situation"));
        assert!(user.contains("specifically addresses their situation"));
    }

    #[test]
    fn test_support_prompt_unknown_mood_uses_raw_text() {
        let messages = support_prompt(&Mood::Unknown(" 🥲 ".to_string()), None);
        assert!(messages[1].content.contains("feeling 🥲."));
    }

    #[test]
    fn test_parse_support_reply_ignores_surrounding_text() {
        let reply = "Sure!\nTitle:  Seasonal Joy \nsome filler\nMessage: Nature lifts us.\nTitle: Second";
        let support = parse_support_reply(reply);
        assert_eq!(support.title, "Seasonal Joy");
        assert_eq!(support.message, "Nature lifts us.");
    }

    #[test]
    fn test_parse_support_reply_partial_fallback() {
        let support = parse_support_reply("Title: Only a title");
        assert_eq!(support.title, "Only a title");
        assert_eq!(support.message, FALLBACK_SUPPORT_MESSAGE);

        let support = parse_support_reply("Message: Only a message");
        assert_eq!(support.title, FALLBACK_SUPPORT_TITLE);
        assert_eq!(support.message, "Only a message");
    }

    #[test]
    fn test_parse_support_reply_garbage_is_fallback() {
        assert_eq!(
            parse_support_reply("I can't help with that."),
            SupportMessage::fallback()
        );
        assert_eq!(parse_support_reply("Title:\nMessage:   "), SupportMessage::fallback());
    }

    #[test]
    fn test_prefix_must_start_the_line() {
        let support = parse_support_reply("  Title: indented\nMessage: ok");
        assert_eq!(support.title, FALLBACK_SUPPORT_TITLE);
        assert_eq!(support.message, "ok");
    }
}
