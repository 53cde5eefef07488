//! Database schema definitions and initialization.
//!
//! One table holds mood entries. The support columns were added after the
//! first release, so databases created before them are upgraded in place with
//! additive `ALTER TABLE` statements.

use crate::errors::{AppResult, DatabaseError};
use rusqlite::Connection;
use tracing::{debug, info};

/// Current schema version.
///
/// Version 1 had no support columns; version 2 adds `supportTitle` and
/// `supportMessage`.
pub const SCHEMA_VERSION: i32 = 2;

/// Columns added after version 1, with their DDL type.
const ADDITIVE_COLUMNS: &[(&str, &str)] = &[("supportTitle", "TEXT"), ("supportMessage", "TEXT")];

/// Creates the database tables and indexes, then upgrades older layouts.
///
/// This function is idempotent - it uses `CREATE TABLE IF NOT EXISTS`
/// and only adds columns that are missing.
///
/// # Tables
///
/// - `mood_entries`: One row per logged mood
/// - `schema_version`: Applied schema versions
///
/// # Errors
///
/// Returns an error if any DDL statement fails.
pub fn create_tables(conn: &Connection) -> AppResult<()> {
    debug!("Creating database tables");

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS mood_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            mood TEXT NOT NULL,
            note TEXT NOT NULL DEFAULT '',
            timestamp INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_mood_entries_timestamp ON mood_entries(timestamp DESC);
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL,
            applied_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    add_missing_columns(conn)?;

    let current_version = get_schema_version(conn)?;
    if current_version.map_or(true, |v| v < SCHEMA_VERSION) {
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?)",
            [SCHEMA_VERSION],
        )
        .map_err(DatabaseError::Sqlite)?;
        info!(
            "Database schema moved from {:?} to version {}",
            current_version, SCHEMA_VERSION
        );
    } else {
        debug!("Schema version already recorded: {:?}", current_version);
    }

    Ok(())
}

fn add_missing_columns(conn: &Connection) -> AppResult<()> {
    let existing = column_names(conn, "mood_entries")?;

    for (column, ddl_type) in ADDITIVE_COLUMNS {
        if existing.iter().any(|c| c == column) {
            continue;
        }
        conn.execute_batch(&format!(
            "ALTER TABLE mood_entries ADD COLUMN {} {} NULL",
            column, ddl_type
        ))
        .map_err(DatabaseError::Sqlite)?;
        info!("Added column {} to mood_entries", column);
    }

    Ok(())
}

/// Lists the column names of `table`.
pub fn column_names(conn: &Connection, table: &str) -> AppResult<Vec<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({})", table))
        .map_err(DatabaseError::Sqlite)?;

    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    Ok(names)
}

/// Gets the highest recorded schema version.
///
/// Returns `None` if the schema_version table doesn't exist or is empty.
pub fn get_schema_version(conn: &Connection) -> AppResult<Option<i32>> {
    let result = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, Option<i32>>(0)
    });

    match result {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) if e.to_string().contains("no such table") => Ok(None),
        Err(e) => Err(DatabaseError::Sqlite(e).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_create_tables() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        let table_exists: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='mood_entries'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(table_exists, 1);

        let columns = column_names(&conn, "mood_entries").unwrap();
        assert_eq!(
            columns,
            vec![
                "id",
                "mood",
                "note",
                "timestamp",
                "supportTitle",
                "supportMessage"
            ]
        );
        assert_eq!(get_schema_version(&conn).unwrap(), Some(SCHEMA_VERSION));
    }

    #[test]
    fn test_create_tables_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();

        let versions: i32 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn test_upgrade_from_version_one_keeps_rows() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE mood_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                mood TEXT NOT NULL,
                note TEXT NOT NULL DEFAULT '',
                timestamp INTEGER NOT NULL
            );
            CREATE TABLE schema_version (
                version INTEGER NOT NULL,
                applied_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            INSERT INTO schema_version (version) VALUES (1);
            INSERT INTO mood_entries (mood, note, timestamp) VALUES ('😊', 'old', 42);
            "#,
        )
        .unwrap();

        create_tables(&conn).unwrap();

        let (note, title): (String, Option<String>) = conn
            .query_row(
                "SELECT note, supportTitle FROM mood_entries WHERE timestamp = 42",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(note, "old");
        assert!(title.is_none());
        assert_eq!(get_schema_version(&conn).unwrap(), Some(SCHEMA_VERSION));
    }

    #[test]
    fn test_schema_version_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), None);
    }

    #[test]
    fn test_timestamp_index_created() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        let index_count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name = 'idx_mood_entries_timestamp'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(index_count, 1);
    }
}
