//! Log today's mood and attach its support message.

use crate::ai::SupportGenerator;
use crate::db::EntryStore;
use crate::errors::AppResult;
use crate::mood_core::{Clock, DailyRules, MoodDraft, MoodEntry, SupportMessage};
use crate::ops::support::SupportService;
use tracing::info;

/// Saves today's mood, then fetches (or generates) its support message.
///
/// The entry is written first, so a slow or failing generator never loses the
/// mood. The support message is stored on the saved entry. When the day's
/// entry is updated, the previous support cache is cleared by the save and a
/// fresh message is generated for the new mood.
///
/// Pass `support: None` to skip the support step entirely.
///
/// # Errors
///
/// Returns store errors; generator errors fall back inside the service.
pub fn record_mood<C, S, G>(
    rules: &DailyRules<C>,
    store: &S,
    support: Option<&SupportService<G>>,
    draft: MoodDraft,
) -> AppResult<(MoodEntry, Option<SupportMessage>)>
where
    C: Clock,
    S: EntryStore + ?Sized,
    G: SupportGenerator,
{
    let saved = rules.save(store, draft)?;
    info!("Recorded mood {} as entry {}", saved.mood.name(), saved.id);

    let message = match support {
        Some(service) => Some(service.message_for(store, Some(saved.id), &saved.mood, &saved.note)?),
        None => None,
    };

    Ok((saved, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::OpenAiClient;
    use crate::db::Database;
    use crate::mood_core::{FixedClock, Mood};
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn test_record_without_api_key_stores_fallback() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let clock = FixedClock::new(tz.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
        let rules = DailyRules::new(&clock);
        let db = Database::open_in_memory().unwrap();
        db.initialize_schema().unwrap();
        let service =
            SupportService::new(OpenAiClient::new("http://127.0.0.1:9", None, "gpt-3.5-turbo").unwrap());

        let (entry, support) =
            record_mood(&rules, &db, Some(&service), MoodDraft::new(Mood::Sad, "")).unwrap();

        assert_eq!(support, Some(SupportMessage::fallback()));
        assert_eq!(
            db.get_by_id(entry.id).unwrap().unwrap().cached_support(),
            Some(SupportMessage::fallback())
        );
    }

    #[test]
    fn test_record_without_support() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let clock = FixedClock::new(tz.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
        let rules = DailyRules::new(&clock);
        let db = Database::open_in_memory().unwrap();
        db.initialize_schema().unwrap();

        let (entry, support) = record_mood::<_, _, OpenAiClient>(
            &rules,
            &db,
            None,
            MoodDraft::new(Mood::Happy, "sunny"),
        )
        .unwrap();

        assert!(support.is_none());
        assert!(db.get_by_id(entry.id).unwrap().unwrap().cached_support().is_none());
    }
}
