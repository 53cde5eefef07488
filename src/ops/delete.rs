//! Delete with a short-lived, single-slot undo.

use crate::db::EntryStore;
use crate::errors::AppResult;
use crate::mood_core::{Clock, DailyRules, MoodDraft, MoodEntry};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Holds at most one recently deleted entry until its undo window closes.
///
/// Arming the slot again replaces whatever it held.
#[derive(Debug)]
pub struct UndoSlot {
    window: Duration,
    pending: Option<(MoodEntry, Instant)>,
}

impl UndoSlot {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Remembers `entry` until `now + window`.
    pub fn arm(&mut self, entry: MoodEntry, now: Instant) {
        if let Some((previous, _)) = &self.pending {
            debug!("Undo slot dropping entry {}", previous.id);
        }
        self.pending = Some((entry, now + self.window));
    }

    /// Empties the slot, returning the entry only if the window is still open.
    pub fn take(&mut self, now: Instant) -> Option<MoodEntry> {
        match self.pending.take() {
            Some((entry, expires_at)) if now < expires_at => Some(entry),
            Some((entry, _)) => {
                debug!("Undo window for entry {} expired", entry.id);
                None
            }
            None => None,
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}

/// Deletes `entry` and arms the undo slot with it.
///
/// # Errors
///
/// Returns store errors unchanged; the slot is left untouched on failure.
pub fn delete_entry<S: EntryStore + ?Sized>(
    store: &S,
    entry: MoodEntry,
    slot: &mut UndoSlot,
    now: Instant,
) -> AppResult<()> {
    store.delete(&entry)?;
    info!("Deleted mood entry {}", entry.id);
    slot.arm(entry, now);
    Ok(())
}

/// Outcome of a successful undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    pub entry: MoodEntry,
    /// An entry logged for the same day after the delete, now overwritten.
    pub replaced: Option<MoodEntry>,
}

/// Restores the entry held by the slot, if its window is still open.
///
/// The mood and note come back through the one-entry-per-day rule for the
/// day the entry was written, keeping its original timestamp. The id and any
/// cached support message are not restored. If that day got a new entry in
/// the meantime, it is overwritten and reported in [`Restored::replaced`].
///
/// Returns `Ok(None)` when there is nothing to undo.
pub fn undo_delete<C: Clock, S: EntryStore + ?Sized>(
    rules: &DailyRules<C>,
    store: &S,
    slot: &mut UndoSlot,
    now: Instant,
) -> AppResult<Option<Restored>> {
    let Some(deleted) = slot.take(now) else {
        return Ok(None);
    };

    let day = rules.day_range_of(deleted.timestamp);
    let draft = MoodDraft::new(deleted.mood.clone(), deleted.note.clone());
    let (entry, replaced) = rules.upsert_on_day(store, day, draft, deleted.timestamp)?;

    match &replaced {
        Some(newer) => warn!(
            "Restoring entry {} overwrote entry {} ({}) logged after the delete",
            deleted.id,
            newer.id,
            newer.mood.name()
        ),
        None => info!("Restored entry {} as {}", deleted.id, entry.id),
    }
    Ok(Some(Restored { entry, replaced }))
}
