//! Entry CRUD operations.
//!
//! This module provides functions for creating, reading, replacing, and deleting
//! mood entries on a single connection. The `Database` handle in the parent
//! module wires them into the `EntryStore` trait.

use crate::errors::{AppResult, DatabaseError};
use crate::mood_core::{Mood, MoodEntry, SupportMessage};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

const SELECT_COLUMNS: &str =
    "SELECT id, mood, note, timestamp, supportTitle, supportMessage FROM mood_entries";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<MoodEntry> {
    Ok(MoodEntry {
        id: row.get(0)?,
        mood: Mood::from_raw(&row.get::<_, String>(1)?),
        note: row.get(2)?,
        timestamp: row.get(3)?,
        support_title: row.get(4)?,
        support_message: row.get(5)?,
    })
}

/// Inserts a new entry or replaces the row with the same id.
///
/// An entry with id `0` is inserted and receives a fresh id; any other id
/// replaces that row in full (or recreates it if it was deleted).
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn insert_or_replace(conn: &Connection, entry: &MoodEntry) -> AppResult<i64> {
    if entry.is_persisted() {
        debug!("Replacing mood entry {}", entry.id);
        conn.execute(
            r#"
            INSERT OR REPLACE INTO mood_entries
                (id, mood, note, timestamp, supportTitle, supportMessage)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                entry.id,
                entry.mood.as_stored(),
                entry.note,
                entry.timestamp,
                entry.support_title,
                entry.support_message
            ],
        )
        .map_err(DatabaseError::Sqlite)?;
        return Ok(entry.id);
    }

    conn.execute(
        r#"
        INSERT INTO mood_entries (mood, note, timestamp, supportTitle, supportMessage)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![
            entry.mood.as_stored(),
            entry.note,
            entry.timestamp,
            entry.support_title,
            entry.support_message
        ],
    )
    .map_err(DatabaseError::Sqlite)?;

    let id = conn.last_insert_rowid();
    debug!("Inserted mood entry {}", id);
    Ok(id)
}

/// Writes the support columns of entry `id`, but only while its mood and note
/// are still `mood` and `note`. Returns whether a row was updated.
///
/// Other columns are never touched, so a concurrent save or delete is not undone.
pub fn update_support_if_unchanged(
    conn: &Connection,
    id: i64,
    mood: &Mood,
    note: &str,
    support: &SupportMessage,
) -> AppResult<bool> {
    let rows = conn
        .execute(
            r#"
            UPDATE mood_entries
            SET supportTitle = ?1, supportMessage = ?2
            WHERE id = ?3 AND mood = ?4 AND note = ?5
            "#,
            params![support.title, support.message, id, mood.as_stored(), note],
        )
        .map_err(DatabaseError::Sqlite)?;
    debug!("Support update for entry {} matched {} rows", id, rows);
    Ok(rows > 0)
}

/// Deletes an entry by id. Returns whether a row was removed.
pub fn delete_entry(conn: &Connection, id: i64) -> AppResult<bool> {
    let rows = conn
        .execute("DELETE FROM mood_entries WHERE id = ?1", params![id])
        .map_err(DatabaseError::Sqlite)?;
    debug!("Deleted mood entry {} ({} rows)", id, rows);
    Ok(rows > 0)
}

/// Retrieves an entry by id.
///
/// Returns `Ok(None)` if no entry has that id.
pub fn get_entry_by_id(conn: &Connection, id: i64) -> AppResult<Option<MoodEntry>> {
    conn.query_row(
        &format!("{} WHERE id = ?1", SELECT_COLUMNS),
        params![id],
        entry_from_row,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Retrieves every entry, newest timestamp first (ties: newest id first).
pub fn get_all_entries(conn: &Connection) -> AppResult<Vec<MoodEntry>> {
    let mut stmt = conn
        .prepare(&format!(
            "{} ORDER BY timestamp DESC, id DESC",
            SELECT_COLUMNS
        ))
        .map_err(DatabaseError::Sqlite)?;

    let entries = stmt
        .query_map([], entry_from_row)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    debug!("Loaded {} mood entries", entries.len());
    Ok(entries)
}
