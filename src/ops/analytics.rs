//! Chart series, labels and summary figures derived from stored entries.

use crate::constants::{CHART_DATE_FORMAT, MONTH_HEADER_FORMAT};
use crate::mood_core::{
    compute_trend, local_naive, mood_score, most_frequent_mood, recent_window, Clock,
    DailyRules, Mood, MoodEntry, Trend,
};
use chrono::{NaiveDate, TimeZone};

/// One point of the mood chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    /// Position on the x axis, oldest entry at 0.
    pub index: usize,
    pub score: u8,
    /// Local date of the entry, e.g. "Mar 7".
    pub label: String,
}

/// Chart points for a newest-first collection, oldest first.
pub fn mood_series<Tz: TimeZone>(entries_desc: &[MoodEntry], tz: &Tz) -> Vec<ChartPoint> {
    entries_desc
        .iter()
        .rev()
        .enumerate()
        .map(|(index, entry)| ChartPoint {
            index,
            score: mood_score(&entry.mood),
            label: local_naive(entry, tz).format(CHART_DATE_FORMAT).to_string(),
        })
        .collect()
}

/// Y-axis label for a score: the mood's emoji for 1 through 6, otherwise empty.
pub fn axis_label(score: u8) -> &'static str {
    match score {
        1 => Mood::Sad.symbol(),
        2 => Mood::Angry.symbol(),
        3 => Mood::Tired.symbol(),
        4 => Mood::Neutral.symbol(),
        5 => Mood::Confident.symbol(),
        6 => Mood::Happy.symbol(),
        _ => "",
    }
}

/// History section header, e.g. "October 2026".
///
/// Returns an empty string for an invalid month.
pub fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|date| date.format(MONTH_HEADER_FORMAT).to_string())
        .unwrap_or_default()
}

/// Headline figures for the stats view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodSummary {
    pub total_entries: usize,
    pub logged_today: bool,
    /// Entries considered for trend and frequency.
    pub window_len: usize,
    pub trend: Option<Trend>,
    pub most_frequent: Option<Mood>,
}

/// Summarizes a newest-first collection over its `window` most recent entries.
pub fn summarize<C: Clock>(
    rules: &DailyRules<C>,
    entries_desc: &[MoodEntry],
    window: usize,
) -> MoodSummary {
    let recent = recent_window(entries_desc, window);

    MoodSummary {
        total_entries: entries_desc.len(),
        logged_today: rules.resolve_today_entry(entries_desc).is_some(),
        window_len: recent.len(),
        trend: compute_trend(&recent),
        most_frequent: most_frequent_mood(&recent),
    }
}
