/*!
# moodyday - One Mood a Day

moodyday is a command-line mood journal. It keeps one entry per local calendar
day, shows history and simple analytics, and asks a chat completion API for a
short supportive message that is generated once per entry.

This file contains the main application flow: it sets up logging, loads the
configuration, wires the collaborators together once, and dispatches the
subcommand.

## Usage

```
moodyday [OPTIONS] <COMMAND>

Commands:
  log      Log today's mood (replaces today's entry if there is one)
  today    Show today's entry
  history  List entries by month, newest first
  stats    Show the mood chart, trend and most frequent mood
  support  Show the support message for an entry
  delete   Delete an entry, with a short window to undo
  remind   Remind to log a mood if today has no entry

Options:
      --log-format <LOG_FORMAT>  Log output format [default: text] [possible values: text, json]
  -v, --verbose                  Print verbose output
  -h, --help                     Print help
  -V, --version                  Print version
```

## Configuration

See `moodyday::config` for the environment variables (`MOODYDAY_DB`,
`OPENAI_API_KEY`, `MOODYDAY_API_BASE`, `MOODYDAY_MODEL`,
`MOODYDAY_REMINDER_TIME`, `MOODYDAY_UNDO_SECONDS`).
*/

use moodyday::ai::OpenAiClient;
use moodyday::cli::{parse_mood, CliArgs, Commands};
use moodyday::config::Config;
use moodyday::constants::{DEFAULT_LOG_LEVEL, TRACING_ROOT_SPAN_NAME};
use moodyday::db::{Database, EntryStore};
use moodyday::errors::{AppResult, DatabaseError};
use moodyday::mood_core::{local_naive, Clock, DailyRules, MoodDraft, MoodEntry, SystemClock};
use moodyday::ops::{self, ConsoleNotifier, SupportService, UndoSlot};
use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info, info_span};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// The main entry point for the moodyday application.
///
/// # Errors
///
/// Returns configuration, database and input errors. Support-message
/// failures never reach here; they fall back to the fixed message.
fn main() -> AppResult<()> {
    let args = CliArgs::parse();
    init_tracing(args.json_logs(), args.verbose);

    let correlation_id = Uuid::new_v4();
    let root_span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        correlation_id = %correlation_id,
        command = ?args.command
    );
    let _guard = root_span.enter();

    info!("Starting moodyday");
    debug!("CLI arguments: {:?}", args);

    run(args).map_err(|e| {
        error!("Command failed: {}", e);
        e
    })
}

fn init_tracing(json: bool, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .init();
    }
}

fn run(args: CliArgs) -> AppResult<()> {
    info!("Loading configuration");
    let config = Config::load()?;
    config.validate()?;
    debug!("Configuration: {:?}", config);

    let db = Database::open(&config.db_path)?;
    db.initialize_schema()?;
    let rules = DailyRules::new(SystemClock);

    match args.command {
        Commands::Log {
            mood,
            note,
            no_support,
        } => {
            let mood = parse_mood(&mood)?;
            let draft = MoodDraft::new(mood, note.unwrap_or_default().trim());
            let service = if no_support {
                None
            } else {
                Some(SupportService::new(OpenAiClient::from_config(&config)?))
            };

            let (entry, support) = ops::record_mood(&rules, &db, service.as_ref(), draft)?;
            println!("Saved {}", format_entry(&entry, &rules));
            if let Some(support) = support {
                println!();
                println!("{}", support.title);
                println!("{}", support.message);
            }
        }

        Commands::Today => {
            let entries = db.all_by_timestamp_desc()?;
            match rules.resolve_today_entry(&entries) {
                Some(entry) => println!("{}", format_entry(entry, &rules)),
                None => println!("No mood logged today"),
            }
        }

        Commands::History => {
            let entries = db.all_by_timestamp_desc()?;
            if entries.is_empty() {
                println!("No entries yet");
            }
            for bucket in rules.group_by_month(&entries) {
                println!("{}", ops::month_label(bucket.year, bucket.month));
                for entry in &bucket.entries {
                    println!("  {}", format_entry(entry, &rules));
                }
            }
        }

        Commands::Stats { window } => {
            let entries = db.all_by_timestamp_desc()?;
            let tz = rules.timezone();
            for point in ops::mood_series(&entries, &tz) {
                println!(
                    "{:>7} {} {}",
                    point.label,
                    ops::axis_label(point.score),
                    "#".repeat(point.score as usize)
                );
            }

            let summary = ops::summarize(&rules, &entries, window);
            println!();
            println!("Entries: {}", summary.total_entries);
            println!(
                "Logged today: {}",
                if summary.logged_today { "yes" } else { "no" }
            );
            match summary.trend {
                Some(trend) => println!("Trend (last {}): {}", summary.window_len, trend),
                None => println!("Trend: not enough entries"),
            }
            if let Some(mood) = summary.most_frequent {
                println!("Most frequent: {} {}", mood.symbol(), mood.name());
            }
        }

        Commands::Support { id } => {
            let entry = find_entry(&db, id)?;
            let service = SupportService::new(OpenAiClient::from_config(&config)?);
            let support = service.message_for(&db, Some(entry.id), &entry.mood, &entry.note)?;
            println!("{}", support.title);
            println!("{}", support.message);
        }

        Commands::Delete { id, no_undo } => {
            let entry = find_entry(&db, id)?;
            let mut slot = UndoSlot::new(config.undo_window);
            ops::delete_entry(&db, entry, &mut slot, Instant::now())?;

            if no_undo || slot.window().is_zero() {
                slot.clear();
                println!("Deleted entry #{}", id);
                return Ok(());
            }

            println!(
                "Deleted entry #{}. Type 'u' and press Enter within {}s to undo.",
                id,
                slot.window().as_secs()
            );
            if wait_for_undo(&slot) {
                match ops::undo_delete(&rules, &db, &mut slot, Instant::now())? {
                    Some(restored) => {
                        if let Some(replaced) = &restored.replaced {
                            println!("Replaced {}", format_entry(replaced, &rules));
                        }
                        println!("Restored {}", format_entry(&restored.entry, &rules));
                    }
                    None => println!("Undo window expired"),
                }
            } else {
                slot.clear();
            }
        }

        Commands::Remind { once } => {
            if once {
                if !ops::fire_reminder(&rules, &db, &ConsoleNotifier)? {
                    println!("Mood already logged today");
                }
            } else {
                ops::run_daily(&rules, &db, &ConsoleNotifier, config.reminder_time)?;
            }
        }
    }

    info!("Done");
    Ok(())
}

fn find_entry(db: &Database, id: i64) -> AppResult<MoodEntry> {
    db.get_by_id(id)?
        .ok_or_else(|| DatabaseError::NotFound(format!("Entry #{}", id)).into())
}

/// Waits up to the slot's window for an undo line on stdin.
fn wait_for_undo(slot: &UndoSlot) -> bool {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_ok() {
            let _ = tx.send(line);
        }
    });

    match rx.recv_timeout(slot.window()) {
        Ok(line) => matches!(line.trim().to_lowercase().as_str(), "u" | "undo"),
        Err(_) => false,
    }
}

fn format_entry<C: Clock>(entry: &MoodEntry, rules: &DailyRules<C>) -> String {
    let when = local_naive(entry, &rules.timezone()).format("%a %b %-d %H:%M");
    let mut line = format!("#{} {} {} {}", entry.id, when, entry.mood.symbol(), entry.mood.name());
    if entry.has_note() {
        line.push_str(&format!(" - {}", entry.note));
    }
    line
}
