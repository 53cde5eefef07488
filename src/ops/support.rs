//! Generate-once support messages for mood entries.

use crate::ai::SupportGenerator;
use crate::db::EntryStore;
use crate::errors::AppResult;
use crate::mood_core::{Mood, SupportMessage};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Cache policy in front of a [`SupportGenerator`].
///
/// A support message is produced at most once per entry: once both halves
/// are stored on the entry, later requests read them back instead of calling
/// the generator.
#[derive(Debug)]
pub struct SupportService<G> {
    generator: G,
}

impl<G: SupportGenerator> SupportService<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Returns the support message for a mood, generating it if needed.
    ///
    /// # Flow
    ///
    /// 1. If `existing_id` names an entry with a cached title and message, return them
    /// 2. Otherwise ask the generator (passing the note only when non-empty)
    /// 3. On any generator failure, use the fixed fallback
    /// 4. Store the result on the entry, unless it was deleted or saved with a
    ///    different mood or note while the generator ran
    ///
    /// # Errors
    ///
    /// Only store errors are returned; generator errors become the fallback.
    pub fn message_for<S: EntryStore + ?Sized>(
        &self,
        store: &S,
        existing_id: Option<i64>,
        mood: &Mood,
        note: &str,
    ) -> AppResult<SupportMessage> {
        let existing = match existing_id {
            Some(id) => store.get_by_id(id)?,
            None => None,
        };

        if let Some(cached) = existing.as_ref().and_then(|entry| entry.cached_support()) {
            debug!("Using cached support message for entry {:?}", existing_id);
            return Ok(cached);
        }

        let note = Some(note).filter(|n| !n.is_empty());
        let support = match self.generator.generate(mood, note) {
            Ok(support) => support,
            Err(e) => {
                warn!("Support message generation failed, using fallback: {}", e);
                SupportMessage::fallback()
            }
        };

        if let Some(entry) = existing {
            if store.attach_support(entry.id, &entry.mood, &entry.note, &support)? {
                info!("Stored support message on entry {}", entry.id);
            } else {
                info!(
                    "Entry {} changed or was deleted during generation, support not stored",
                    entry.id
                );
            }
        }

        Ok(support)
    }
}

impl<G: SupportGenerator + Send + Sync + 'static> SupportService<G> {
    /// Runs [`SupportService::message_for`] for a saved entry on a background thread.
    ///
    /// Two attaches racing for the same entry both write; the last one wins.
    pub fn spawn_attach<S>(
        self: &Arc<Self>,
        store: Arc<S>,
        entry_id: i64,
        mood: Mood,
        note: String,
    ) -> JoinHandle<AppResult<SupportMessage>>
    where
        S: EntryStore + Send + Sync + 'static,
    {
        let service = Arc::clone(self);
        thread::spawn(move || {
            let result = service.message_for(store.as_ref(), Some(entry_id), &mood, &note);
            if let Err(e) = &result {
                warn!("Background support attach for entry {} failed: {}", entry_id, e);
            }
            result
        })
    }
}
