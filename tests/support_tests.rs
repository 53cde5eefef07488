//! Integration tests for support messages against a mocked chat completion endpoint.

use chrono::{FixedOffset, TimeZone};
use moodyday::ai::{OpenAiClient, SupportGenerator};
use moodyday::constants::{FALLBACK_SUPPORT_MESSAGE, FALLBACK_SUPPORT_TITLE};
use moodyday::db::{Database, EntryStore};
use moodyday::errors::{AIError, AppError};
use moodyday::mood_core::{DailyRules, FixedClock, Mood, MoodDraft, SupportMessage};
use moodyday::ops::{record_mood, SupportService};
use mockito::Matcher;
use serde_json::json;

fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
    .to_string()
}

fn client_for(server: &mockito::Server) -> OpenAiClient {
    OpenAiClient::new(server.url(), Some("sk-test".to_string()), "gpt-3.5-turbo").unwrap()
}

fn test_db() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.initialize_schema().unwrap();
    db
}

#[test]
fn test_generate_parses_title_and_message() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-3.5-turbo",
            "temperature": 0.7,
            "max_tokens": 150
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(
            "Title: Seasonal Joy\nMessage: Nature has a way of lifting us.",
        ))
        .expect(1)
        .create();

    let support = client_for(&server)
        .generate(&Mood::Happy, Some("first snow"))
        .unwrap();

    mock.assert();
    assert_eq!(support, SupportMessage::new("Seasonal Joy", "Nature has a way of lifting us."));
}

#[test]
fn test_request_carries_note_in_user_message() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex("They mentioned".to_string()))
        .with_status(200)
        .with_body(completion_body("Title: T\nMessage: M"))
        .create();

    client_for(&server)
        .generate(&Mood::Tired, Some("deadline week"))
        .unwrap();
    mock.assert();
}

#[test]
fn test_http_error_is_reported() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_body("{\"error\":\"bad key\"}")
        .create();

    match client_for(&server).generate(&Mood::Sad, None) {
        Err(AppError::AI(AIError::Http { status, body })) => {
            assert_eq!(status, 401);
            assert!(body.contains("bad key"));
        }
        other => panic!("Expected HTTP error, got {:?}", other),
    }
}

#[test]
fn test_empty_choices_is_invalid_response() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body("{\"choices\": []}")
        .create();

    let result = client_for(&server).generate(&Mood::Sad, None);
    assert!(matches!(result, Err(AppError::AI(AIError::InvalidResponse(_)))));
}

#[test]
fn test_unparseable_reply_falls_back_per_half() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(completion_body("Message: Just breathe."))
        .create();

    let support = client_for(&server).generate(&Mood::Angry, None).unwrap();
    assert_eq!(support.title, FALLBACK_SUPPORT_TITLE);
    assert_eq!(support.message, "Just breathe.");
}

#[test]
fn test_service_calls_endpoint_once_per_entry() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(completion_body("Title: Keep Going\nMessage: One step at a time."))
        .expect(1)
        .create();

    let db = test_db();
    let clock = FixedClock::new(
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 7, 1, 18, 0, 0)
            .unwrap(),
    );
    let rules = DailyRules::new(&clock);
    let service = SupportService::new(client_for(&server));

    let (entry, first) =
        record_mood(&rules, &db, Some(&service), MoodDraft::new(Mood::Tired, "")).unwrap();
    let second = service
        .message_for(&db, Some(entry.id), &entry.mood, &entry.note)
        .unwrap();

    mock.assert();
    assert_eq!(first, Some(second.clone()));
    assert_eq!(second.title, "Keep Going");
}

#[test]
fn test_service_falls_back_on_server_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .create();

    let db = test_db();
    let id = db
        .insert_or_replace(&moodyday::MoodEntry::new(Mood::Sad, "", 1))
        .unwrap();
    let service = SupportService::new(client_for(&server));

    let support = service.message_for(&db, Some(id), &Mood::Sad, "").unwrap();
    assert_eq!(support.title, FALLBACK_SUPPORT_TITLE);
    assert_eq!(support.message, FALLBACK_SUPPORT_MESSAGE);
}

/// Runs `during` inside `generate`, standing in for a user acting while the
/// request is in flight.
struct InterleavingGenerator<F: Fn()> {
    during: F,
}

impl<F: Fn()> SupportGenerator for InterleavingGenerator<F> {
    fn generate(&self, _mood: &Mood, _note: Option<&str>) -> moodyday::AppResult<SupportMessage> {
        (self.during)();
        Ok(SupportMessage::new("Stale", "Written for the old entry"))
    }
}

fn evening_clock() -> FixedClock {
    FixedClock::new(
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 7, 1, 20, 0, 0)
            .unwrap(),
    )
}

#[test]
fn test_save_during_generation_is_not_reverted() {
    let db = test_db();
    let clock = evening_clock();
    let rules = DailyRules::new(&clock);
    let original = rules.save(&db, MoodDraft::new(Mood::Happy, "old")).unwrap();

    let service = SupportService::new(InterleavingGenerator {
        during: || {
            rules.save(&db, MoodDraft::new(Mood::Sad, "new")).unwrap();
        },
    });
    service
        .message_for(&db, Some(original.id), &original.mood, &original.note)
        .unwrap();

    let all = db.all_by_timestamp_desc().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, original.id);
    assert_eq!(all[0].mood, Mood::Sad);
    assert_eq!(all[0].note, "new");
    assert_eq!(all[0].cached_support(), None);
}

#[test]
fn test_delete_during_generation_is_not_undone() {
    let db = test_db();
    let clock = evening_clock();
    let rules = DailyRules::new(&clock);
    let original = rules.save(&db, MoodDraft::new(Mood::Happy, "old")).unwrap();

    let service = SupportService::new(InterleavingGenerator {
        during: || db.delete(&original).unwrap(),
    });
    let support = service
        .message_for(&db, Some(original.id), &original.mood, &original.note)
        .unwrap();

    assert_eq!(support.title, "Stale");
    assert!(db.all_by_timestamp_desc().unwrap().is_empty());
    assert!(db.get_by_id(original.id).unwrap().is_none());
}
