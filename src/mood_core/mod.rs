//! The daily rules for mood entries, without any I/O of their own.
//!
//! This module decides whether a save creates or updates an entry, finds
//! today's entry, buckets entries by month, and scores moods for trend and
//! frequency views. Persistence goes through the [`EntryStore`] handed in by
//! the caller; "now" and the local timezone come from an injected [`Clock`].

mod clock;
mod mood;

pub use clock::{Clock, FixedClock, SystemClock};
pub use mood::{Mood, MoodDraft, MoodEntry, SupportMessage};

use crate::db::EntryStore;
use crate::errors::AppResult;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// A local calendar day as the half-open millisecond range `[start_ms, end_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl DayRange {
    pub fn contains(&self, timestamp_ms: i64) -> bool {
        self.start_ms <= timestamp_ms && timestamp_ms < self.end_ms
    }
}

/// Computes the millisecond range of `date` in `tz`, local midnight to local midnight.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, NaiveDate};
/// use moodyday::mood_core::day_range_for;
///
/// let utc = FixedOffset::east_opt(0).unwrap();
/// let day = day_range_for(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap(), &utc);
/// assert_eq!(day.start_ms, 86_400_000);
/// assert_eq!(day.end_ms, 2 * 86_400_000);
/// ```
pub fn day_range_for<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DayRange {
    let start_ms = local_midnight_ms(date, tz);
    let end_ms = date
        .succ_opt()
        .map(|next| local_midnight_ms(next, tz))
        .unwrap_or(i64::MAX);
    DayRange { start_ms, end_ms }
}

fn local_midnight_ms<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> i64 {
    let midnight = date.and_time(Default::default());

    if let Some(start) = tz.from_local_datetime(&midnight).earliest() {
        return start.timestamp_millis();
    }

    // Midnight skipped by a DST jump: the day starts at the first valid minute.
    (1..=24 * 60)
        .find_map(|minutes| {
            tz.from_local_datetime(&(midnight + Duration::minutes(minutes)))
                .earliest()
        })
        .map(|start| start.timestamp_millis())
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight).timestamp_millis())
}

/// Returns the first entry, in iteration order, inside `range`.
pub fn resolve_in_range(entries: &[MoodEntry], range: DayRange) -> Option<&MoodEntry> {
    entries.iter().find(|entry| range.contains(entry.timestamp))
}

/// Display/ranking scalar for a mood, 0 (unknown) to 6 (happy).
pub fn mood_score(mood: &Mood) -> u8 {
    match mood {
        Mood::Sad => 1,
        Mood::Angry => 2,
        Mood::Tired => 3,
        Mood::Neutral => 4,
        Mood::Confident => 5,
        Mood::Happy => 6,
        Mood::Unknown(_) => 0,
    }
}

/// Direction of mood scores over a recent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Improving,
    Declining,
    Mixed,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Mixed => "mixed",
        };
        f.write_str(label)
    }
}

/// Classifies a score sequence (oldest first).
///
/// Fewer than two scores have no trend. A flat sequence counts as improving.
///
/// # Examples
///
/// ```
/// use moodyday::mood_core::{classify_scores, Trend};
///
/// assert_eq!(classify_scores(&[1, 3, 5]), Some(Trend::Improving));
/// assert_eq!(classify_scores(&[5, 3, 1]), Some(Trend::Declining));
/// assert_eq!(classify_scores(&[1, 5, 2]), Some(Trend::Mixed));
/// assert_eq!(classify_scores(&[4]), None);
/// ```
pub fn classify_scores(scores: &[u8]) -> Option<Trend> {
    if scores.len() < 2 {
        return None;
    }

    if scores.windows(2).all(|pair| pair[0] <= pair[1]) {
        Some(Trend::Improving)
    } else if scores.windows(2).all(|pair| pair[0] >= pair[1]) {
        Some(Trend::Declining)
    } else {
        Some(Trend::Mixed)
    }
}

/// Trend of `entries`, which must be ordered oldest to newest.
pub fn compute_trend(entries: &[MoodEntry]) -> Option<Trend> {
    let scores: Vec<u8> = entries.iter().map(|e| mood_score(&e.mood)).collect();
    classify_scores(&scores)
}

/// The mood that appears most often; ties go to the one seen first.
pub fn most_frequent_mood(entries: &[MoodEntry]) -> Option<Mood> {
    let mut counts: Vec<(&Mood, usize)> = Vec::new();
    for entry in entries {
        match counts.iter_mut().find(|(mood, _)| *mood == &entry.mood) {
            Some((_, count)) => *count += 1,
            None => counts.push((&entry.mood, 1)),
        }
    }

    let mut best: Option<(&Mood, usize)> = None;
    for (mood, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((mood, count));
        }
    }
    best.map(|(mood, _)| mood.clone())
}

/// The `n` newest entries of a newest-first collection, returned oldest first.
pub fn recent_window(entries_desc: &[MoodEntry], n: usize) -> Vec<MoodEntry> {
    entries_desc.iter().take(n).rev().cloned().collect()
}

/// Entries of one local calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBucket {
    pub year: i32,
    /// 1-based month.
    pub month: u32,
    pub entries: Vec<MoodEntry>,
}

/// Groups entries by local `(year, month)`, most recent month first.
///
/// Entries keep their input order inside a bucket.
pub fn group_by_month<Tz: TimeZone>(entries: &[MoodEntry], tz: &Tz) -> Vec<MonthBucket> {
    let mut buckets: BTreeMap<(i32, u32), Vec<MoodEntry>> = BTreeMap::new();
    for entry in entries {
        let local = local_naive(entry, tz);
        buckets
            .entry((local.year(), local.month()))
            .or_default()
            .push(entry.clone());
    }

    buckets
        .into_iter()
        .rev()
        .map(|((year, month), entries)| MonthBucket {
            year,
            month,
            entries,
        })
        .collect()
}

/// Local wall-clock time of an entry; unrepresentable timestamps read as the epoch.
pub fn local_naive<Tz: TimeZone>(entry: &MoodEntry, tz: &Tz) -> NaiveDateTime {
    entry
        .local_datetime(tz)
        .map(|dt| dt.naive_local())
        .unwrap_or_default()
}

/// The daily rule engine: one entry per local calendar day.
///
/// Constructed once with a clock and passed by reference to whatever needs it.
pub struct DailyRules<C: Clock> {
    clock: C,
}

impl<C: Clock> DailyRules<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn timezone(&self) -> C::Tz {
        self.clock.timezone()
    }

    /// Today's range, recomputed from the clock on every call.
    pub fn today_range(&self) -> DayRange {
        let now = self.clock.now();
        day_range_for(now.date_naive(), &now.timezone())
    }

    /// The local day containing `timestamp_ms`.
    pub fn day_range_of(&self, timestamp_ms: i64) -> DayRange {
        let tz = self.clock.timezone();
        let date = tz
            .timestamp_millis_opt(timestamp_ms)
            .single()
            .map(|dt| dt.date_naive())
            .unwrap_or_default();
        day_range_for(date, &tz)
    }

    /// Today's entry, if any. Reads nothing but the clock.
    pub fn resolve_today_entry<'a>(&self, entries: &'a [MoodEntry]) -> Option<&'a MoodEntry> {
        resolve_in_range(entries, self.today_range())
    }

    /// Saves today's mood: updates today's entry in place or creates it.
    ///
    /// # Errors
    ///
    /// Returns store errors unchanged.
    pub fn save<S: EntryStore + ?Sized>(&self, store: &S, draft: MoodDraft) -> AppResult<MoodEntry> {
        let day = self.today_range();
        let now = self.clock.now_millis();
        self.save_on_day(store, day, draft, now)
    }

    /// Applies the one-entry-per-day rule to `day`, writing `timestamp`.
    ///
    /// The lookup of the day's current entry and the write happen in one
    /// atomic store operation.
    pub fn save_on_day<S: EntryStore + ?Sized>(
        &self,
        store: &S,
        day: DayRange,
        draft: MoodDraft,
        timestamp: i64,
    ) -> AppResult<MoodEntry> {
        self.upsert_on_day(store, day, draft, timestamp)
            .map(|(saved, _)| saved)
    }

    /// Like [`DailyRules::save_on_day`], also returning the entry the day held
    /// before the write, as it was when it got overwritten.
    pub fn upsert_on_day<S: EntryStore + ?Sized>(
        &self,
        store: &S,
        day: DayRange,
        draft: MoodDraft,
        timestamp: i64,
    ) -> AppResult<(MoodEntry, Option<MoodEntry>)> {
        let mut replaced = None;
        let saved = store.upsert_atomically(&mut |current: &[MoodEntry]| {
            replaced = resolve_in_range(current, day).cloned();
            let id = replaced.as_ref().map_or(0, |existing| existing.id);
            debug!("Day {:?} resolves to existing id {}", day, id);
            MoodEntry {
                id,
                mood: draft.mood.clone(),
                note: draft.note.clone(),
                timestamp,
                support_title: None,
                support_message: None,
            }
            .with_support(draft.support.clone())
        })?;

        info!("Saved mood entry {} ({})", saved.id, saved.mood.name());
        Ok((saved, replaced))
    }

    /// Month buckets in the clock's timezone.
    pub fn group_by_month(&self, entries: &[MoodEntry]) -> Vec<MonthBucket> {
        group_by_month(entries, &self.clock.timezone())
    }
}
