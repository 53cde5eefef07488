//! SQLite persistence for mood entries.
//!
//! This module provides the [`EntryStore`] boundary the daily rules depend on
//! and its SQLite implementation, [`Database`]. Connections come from an r2d2
//! pool; every connection waits on the write lock instead of failing fast, so
//! concurrent saves serialize at the database.
//!
//! # Module Structure
//!
//! - `schema`: Table definitions, schema initialization and additive upgrades
//! - `entries`: Entry CRUD operations on a single connection
//!
//! # Example
//!
//! ```no_run
//! use moodyday::db::{Database, EntryStore};
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/moods.db"))?;
//! db.initialize_schema()?;
//! let entries = db.all_by_timestamp_desc()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod entries;
pub mod schema;

use crate::constants::{DB_BUSY_TIMEOUT_MS, DB_POOL_SIZE};
use crate::errors::{AppResult, DatabaseError};
use crate::mood_core::{Mood, MoodEntry, SupportMessage};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, TransactionBehavior};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Type alias for a pooled SQLite connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// In-process persistence boundary for mood entries.
///
/// Implementations must make [`EntryStore::upsert_atomically`] a single
/// serialized unit: two callers racing for the same day observe each other's
/// writes.
pub trait EntryStore {
    /// Inserts `entry` (id `0`) or replaces the row with the same id. Returns the id.
    fn insert_or_replace(&self, entry: &MoodEntry) -> AppResult<i64>;

    /// Removes the entry's row. Removing a missing row is not an error.
    fn delete(&self, entry: &MoodEntry) -> AppResult<()>;

    fn get_by_id(&self, id: i64) -> AppResult<Option<MoodEntry>>;

    /// Stores `support` on entry `id` only if it still holds `mood` and `note`.
    ///
    /// Returns `false` when the entry was deleted or saved with other content
    /// in the meantime; nothing is written then.
    fn attach_support(
        &self,
        id: i64,
        mood: &Mood,
        note: &str,
        support: &SupportMessage,
    ) -> AppResult<bool>;

    /// Every entry, newest first.
    fn all_by_timestamp_desc(&self) -> AppResult<Vec<MoodEntry>>;

    /// Reads the full collection, lets `plan` choose the entry to write, and
    /// writes it, all under one write lock. Returns the written entry with its id.
    fn upsert_atomically(
        &self,
        plan: &mut dyn FnMut(&[MoodEntry]) -> MoodEntry,
    ) -> AppResult<MoodEntry>;
}

/// Database handle with connection pooling.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Opens or creates the SQLite database at `db_path`.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The parent directory cannot be created
    /// - The database file cannot be opened
    /// - Connection pool cannot be initialized
    pub fn open(db_path: &Path) -> AppResult<Self> {
        debug!("Opening database at: {:?}", db_path);

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(db_path);
        let db = Self::with_manager(manager, DB_POOL_SIZE)?;

        info!("Database opened successfully");
        Ok(db)
    }

    /// Opens a private in-memory database backed by a single pooled connection.
    pub fn open_in_memory() -> AppResult<Self> {
        Self::with_manager(SqliteConnectionManager::memory(), 1)
    }

    fn with_manager(manager: SqliteConnectionManager, max_size: u32) -> AppResult<Self> {
        let pool = Pool::builder()
            .max_size(max_size)
            .connection_customizer(Box::new(ConnectionTuning {
                busy_timeout: Duration::from_millis(DB_BUSY_TIMEOUT_MS),
            }))
            .build(manager)
            .map_err(DatabaseError::Pool)?;

        Ok(Database { pool })
    }

    /// Gets a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or the pool is exhausted.
    pub fn get_conn(&self) -> AppResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| DatabaseError::Pool(e).into())
    }

    /// Initializes the database schema.
    ///
    /// Creates the entry table if it doesn't exist and adds any missing
    /// support columns. Safe to call on every start.
    pub fn initialize_schema(&self) -> AppResult<()> {
        let conn = self.get_conn()?;
        schema::create_tables(&conn)?;
        info!("Database schema initialized");
        Ok(())
    }
}

impl EntryStore for Database {
    fn insert_or_replace(&self, entry: &MoodEntry) -> AppResult<i64> {
        let conn = self.get_conn()?;
        entries::insert_or_replace(&conn, entry)
    }

    fn delete(&self, entry: &MoodEntry) -> AppResult<()> {
        let conn = self.get_conn()?;
        entries::delete_entry(&conn, entry.id)?;
        Ok(())
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<MoodEntry>> {
        let conn = self.get_conn()?;
        entries::get_entry_by_id(&conn, id)
    }

    fn attach_support(
        &self,
        id: i64,
        mood: &Mood,
        note: &str,
        support: &SupportMessage,
    ) -> AppResult<bool> {
        let conn = self.get_conn()?;
        entries::update_support_if_unchanged(&conn, id, mood, note, support)
    }

    fn all_by_timestamp_desc(&self) -> AppResult<Vec<MoodEntry>> {
        let conn = self.get_conn()?;
        entries::get_all_entries(&conn)
    }

    fn upsert_atomically(
        &self,
        plan: &mut dyn FnMut(&[MoodEntry]) -> MoodEntry,
    ) -> AppResult<MoodEntry> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(DatabaseError::Sqlite)?;

        let current = entries::get_all_entries(&tx)?;
        let mut entry = plan(&current);
        entry.id = entries::insert_or_replace(&tx, &entry)?;

        tx.commit().map_err(DatabaseError::Sqlite)?;
        debug!("Atomic upsert wrote entry {}", entry.id);
        Ok(entry)
    }
}

/// Connection customizer applied to every pooled connection.
#[derive(Debug)]
struct ConnectionTuning {
    busy_timeout: Duration,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for ConnectionTuning {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.busy_timeout(self.busy_timeout)?;
        Ok(())
    }

    fn on_release(&self, _conn: Connection) {}
}
