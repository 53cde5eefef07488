//! Daily reminder policy: when to fire, and whether to notify at all.

use crate::constants::{REMINDER_BODY, REMINDER_TITLE};
use crate::db::EntryStore;
use crate::errors::AppResult;
use crate::mood_core::{Clock, DailyRules};
use chrono::{DateTime, Duration, NaiveTime, TimeZone};
use std::thread;
use tracing::{debug, info};

/// Delay from `now` until the next local occurrence of `reminder_time`.
///
/// If the time has already passed today, or is exactly now, the reminder goes
/// to tomorrow.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, FixedOffset, NaiveTime, TimeZone};
/// use moodyday::ops::reminder::initial_delay;
///
/// let tz = FixedOffset::east_opt(0).unwrap();
/// let eight = NaiveTime::from_hms_opt(20, 0, 0).unwrap();
///
/// let afternoon = tz.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap();
/// assert_eq!(initial_delay(&afternoon, eight), Duration::hours(5));
///
/// let late = tz.with_ymd_and_hms(2024, 3, 1, 21, 0, 0).unwrap();
/// assert_eq!(initial_delay(&late, eight), Duration::hours(23));
/// ```
pub fn initial_delay<Tz: TimeZone>(now: &DateTime<Tz>, reminder_time: NaiveTime) -> Duration {
    let tz = now.timezone();
    let mut date = now.date_naive();

    // Bounded: a wall-clock time exists on at least one of the next few days.
    for _ in 0..3 {
        if let Some(target) = tz.from_local_datetime(&date.and_time(reminder_time)).earliest() {
            if target > *now {
                return target.signed_duration_since(now.clone());
            }
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    Duration::days(1)
}

/// Whether a reminder should be shown: true only when today has no entry.
///
/// Reads the store fresh, so an entry logged after scheduling suppresses it.
pub fn should_remind<C: Clock, S: EntryStore + ?Sized>(
    rules: &DailyRules<C>,
    store: &S,
) -> AppResult<bool> {
    let entries = store.all_by_timestamp_desc()?;
    Ok(rules.resolve_today_entry(&entries).is_none())
}

/// Delivers a reminder to the user.
pub trait Notifier {
    fn notify(&self, title: &str, body: &str) -> AppResult<()>;
}

/// Prints reminders to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, body: &str) -> AppResult<()> {
        println!("{}\n{}", title, body);
        Ok(())
    }
}

/// One fire-time check. Returns whether a notification was sent.
pub fn fire_reminder<C: Clock, S: EntryStore + ?Sized, N: Notifier + ?Sized>(
    rules: &DailyRules<C>,
    store: &S,
    notifier: &N,
) -> AppResult<bool> {
    if !should_remind(rules, store)? {
        info!("Mood already logged today, skipping reminder");
        return Ok(false);
    }

    notifier.notify(REMINDER_TITLE, REMINDER_BODY)?;
    info!("Reminder sent");
    Ok(true)
}

/// Sleeps until each daily occurrence of `reminder_time` and fires. Never returns
/// unless a check fails.
pub fn run_daily<C: Clock, S: EntryStore + ?Sized, N: Notifier + ?Sized>(
    rules: &DailyRules<C>,
    store: &S,
    notifier: &N,
    reminder_time: NaiveTime,
) -> AppResult<()> {
    loop {
        let delay = initial_delay(&rules.clock().now(), reminder_time);
        info!("Next reminder in {} minutes", delay.num_minutes());
        thread::sleep(delay.to_std().unwrap_or_default());
        debug!("Reminder timer fired");
        fire_reminder(rules, store, notifier)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::mood_core::{FixedClock, Mood, MoodDraft};
    use chrono::FixedOffset;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: RefCell<Vec<(String, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, title: &str, body: &str) -> AppResult<()> {
            self.sent
                .borrow_mut()
                .push((title.to_string(), body.to_string()));
            Ok(())
        }
    }

    fn at(h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, h, m, 0)
            .unwrap()
    }

    fn eight_pm() -> NaiveTime {
        NaiveTime::from_hms_opt(20, 0, 0).unwrap()
    }

    #[test]
    fn test_initial_delay_before_and_after() {
        assert_eq!(initial_delay(&at(19, 30), eight_pm()), Duration::minutes(30));
        assert_eq!(initial_delay(&at(20, 30), eight_pm()), Duration::minutes(23 * 60 + 30));
    }

    #[test]
    fn test_initial_delay_exactly_now_goes_to_tomorrow() {
        assert_eq!(initial_delay(&at(20, 0), eight_pm()), Duration::hours(24));
    }

    #[test]
    fn test_fire_reminder_when_nothing_logged() {
        let clock = FixedClock::new(at(20, 0));
        let rules = DailyRules::new(&clock);
        let db = Database::open_in_memory().unwrap();
        db.initialize_schema().unwrap();
        let notifier = RecordingNotifier::default();

        assert!(fire_reminder(&rules, &db, &notifier).unwrap());
        assert_eq!(
            notifier.sent.borrow().as_slice(),
            &[(REMINDER_TITLE.to_string(), REMINDER_BODY.to_string())]
        );
    }

    #[test]
    fn test_fire_reminder_suppressed_by_todays_entry() {
        let clock = FixedClock::new(at(9, 0));
        let rules = DailyRules::new(&clock);
        let db = Database::open_in_memory().unwrap();
        db.initialize_schema().unwrap();
        rules.save(&db, MoodDraft::new(Mood::Happy, "")).unwrap();

        clock.set(at(20, 0));
        let notifier = RecordingNotifier::default();
        assert!(!fire_reminder(&rules, &db, &notifier).unwrap());
        assert!(notifier.sent.borrow().is_empty());

        // the next day nothing is logged yet
        clock.advance(Duration::days(1));
        assert!(should_remind(&rules, &db).unwrap());
    }
}
