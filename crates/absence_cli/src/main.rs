//! Command-line front end for the absence tracker.
//!
//! # Responsibility
//! - Map subcommands onto the core tracker API against a SQLite file.
//! - Report persistence failures as errors without hiding applied changes.

use absence_core::db::open_db;
use absence_core::{
    default_log_level, init_logging, AbsenceTracker, CalendarDay, Clock, SqliteKvPort,
    StatsSummary, SystemClock,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "absence_cli",
    version,
    about = "Track absence days and their reasons"
)]
struct Cli {
    /// SQLite database file holding records and categories.
    #[arg(long, env = "ABSENCE_DB", default_value = "absence_tracker.sqlite3")]
    db: PathBuf,
    /// Directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "ABSENCE_LOG_DIR")]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, env = "ABSENCE_LOG_LEVEL")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mark a day (YYYY-MM-DD) as absent.
    Mark {
        day: CalendarDay,
        /// Category to use instead of the selected one.
        #[arg(short, long)]
        reason: Option<String>,
    },
    /// Remove the absence on a day.
    Clear { day: CalendarDay },
    /// Show whether a day is an absence day.
    Show { day: CalendarDay },
    /// List all absence days in calendar order.
    List,
    /// Manage absence categories.
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Print statistics for one year (defaults to the current year).
    Stats {
        #[arg(short, long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    List,
    Add { label: String },
    Remove { label: String },
    Select { label: String },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    if let Some(log_dir) = cli.log_dir.as_deref() {
        start_logging(log_dir, cli.log_level.as_deref())?;
    }

    let conn = open_db(&cli.db).with_context(|| format!("open {}", cli.db.display()))?;
    let mut tracker =
        AbsenceTracker::open(SqliteKvPort::new(&conn)).context("load tracker state")?;

    match cli.command {
        Command::Mark { day, reason } => {
            let outcome = match reason {
                Some(reason) => tracker.record(day, &reason),
                None => tracker.record_selected(day),
            };
            outcome.with_context(|| format!("mark {day}"))?;
            if let Some(record) = tracker.status(day) {
                println!("{day}: {}", record.reason);
            }
        }
        Command::Clear { day } => {
            tracker.clear(day).with_context(|| format!("clear {day}"))?;
            println!("{day}: present");
        }
        Command::Show { day } => match tracker.status(day) {
            Some(record) => println!("{day}: {}", record.reason),
            None => println!("{day}: present"),
        },
        Command::List => {
            let mut records = tracker.store().all().to_vec();
            records.sort_by_key(|record| record.day);
            for record in records {
                println!("{}\t{}", record.day, record.reason);
            }
        }
        Command::Categories { action } => run_category_action(&mut tracker, action)?,
        Command::Stats { year } => {
            let summary = match year {
                Some(year) => tracker.summary(year),
                None => tracker.summary_for_current_year(&SystemClock),
            };
            print_summary(&summary);
        }
    }

    Ok(())
}

fn run_category_action(
    tracker: &mut AbsenceTracker<SqliteKvPort<'_>>,
    action: CategoryAction,
) -> Result<()> {
    let registry = tracker.registry_mut();
    match action {
        CategoryAction::List => {
            for label in registry.list() {
                let marker = if registry.current() == Some(label.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {label}");
            }
        }
        CategoryAction::Add { label } => {
            if !registry.add(label.clone()).context("add category")? {
                println!("category `{label}` is empty or already exists");
            }
        }
        CategoryAction::Remove { label } => {
            registry.remove(&label).context("remove category")?;
        }
        CategoryAction::Select { label } => {
            if !registry.contains(&label) {
                anyhow::bail!("unknown category `{label}`");
            }
            registry.select(label).context("select category")?;
        }
    }
    Ok(())
}

fn print_summary(summary: &StatsSummary) {
    println!("total days: {}", summary.total_days);
    println!(
        "top reason: {}",
        summary.top_reason.as_deref().unwrap_or("-")
    );
    for entry in &summary.reason_frequency {
        println!("  {}: {}", entry.reason, entry.count);
    }
    println!("year {}:", summary.year);
    for (month0, count) in summary.monthly_counts.iter().enumerate() {
        println!("  {:02}: {}", month0 + 1, count);
    }
}

fn start_logging(log_dir: &Path, level: Option<&str>) -> Result<()> {
    let absolute = if log_dir.is_absolute() {
        log_dir.to_path_buf()
    } else {
        std::env::current_dir()
            .context("resolve current directory")?
            .join(log_dir)
    };
    let level = level.unwrap_or(default_log_level());
    init_logging(level, &absolute.to_string_lossy()).map_err(anyhow::Error::msg)?;
    log::info!(
        "event=cli_start module=cli status=ok today={}",
        SystemClock.today()
    );
    Ok(())
}
