//! weekset - weekly working-set tracker

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use weekset::catalog::{DEFAULT_MUSCLES, EXTENDED_DEFAULTS};
use weekset::charts::ChartSeries;
use weekset::error::parse_set_count;
use weekset::tui::App;
use weekset::week::{RangeToken, today};
use weekset::{SqliteStore, Tracker};

const DB_PATH: &str = "weekset.db";

#[derive(Parser)]
#[command(name = "weekset")]
#[command(author, version, about = "Weekly working-set tracker")]
struct Cli {
    /// Path to the database file
    #[arg(long, env = "WEEKSET_DB", default_value = DB_PATH, global = true)]
    db: String,

    /// Seed a new catalog with the extended muscle list
    #[arg(long, global = true)]
    extended_seed: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// Add sets for a muscle group (merged into the week's entry)
    Add {
        muscle: String,

        /// Number of sets
        sets: String,

        /// Any day of the week, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Overwrite the set count of an existing entry
    Set {
        muscle: String,

        /// New number of sets (use `remove` to drop the entry)
        sets: String,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Delete a muscle's entry from a week
    Remove {
        muscle: String,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show working sets for a week
    Week {
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show a muscle's weekly sets over a range
    Trend {
        muscle: String,

        /// 1_month, 3_months, 6_months or 1_year
        #[arg(short, long, default_value = "1_month")]
        range: RangeToken,
    },

    /// Show total weekly sets over a range
    Totals {
        #[arg(short, long, default_value = "1_month")]
        range: RangeToken,
    },

    /// Manage the muscle group catalog
    Muscles {
        #[command(subcommand)]
        action: Option<MuscleAction>,
    },
}

#[derive(Subcommand)]
enum MuscleAction {
    /// List muscle groups
    List,
    /// Add a muscle group
    Add { name: String },
    /// Remove a muscle group and all its recorded sets
    Remove { name: String },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = SqliteStore::open(&cli.db).with_context(|| format!("opening {}", cli.db))?;
    let seed = if cli.extended_seed { EXTENDED_DEFAULTS } else { DEFAULT_MUSCLES };
    let mut tracker = Tracker::load(store, seed)?;

    match cli.command {
        Some(Commands::Add { muscle, sets, date }) => {
            let date = date.unwrap_or_else(today);
            let sets = parse_set_count(&sets)?;
            let total = tracker.add_sets(date, &muscle, sets as i64)?;
            println!("{}: {} sets for the week of {}", muscle, total, tracker.week_of(date));
        }

        Some(Commands::Set { muscle, sets, date }) => {
            let date = date.unwrap_or_else(today);
            let sets = parse_set_count(&sets)?;
            if !tracker.set_count(date, &muscle, sets)? {
                bail!("no {} entry for the week of {}", muscle, tracker.week_of(date));
            }
            println!("{}: {} sets for the week of {}", muscle, sets, tracker.week_of(date));
        }

        Some(Commands::Remove { muscle, date }) => {
            let date = date.unwrap_or_else(today);
            if !tracker.remove_entry(date, &muscle)? {
                bail!("no {} entry for the week of {}", muscle, tracker.week_of(date));
            }
            println!("Removed {} from the week of {}", muscle, tracker.week_of(date));
        }

        Some(Commands::Week { date }) => {
            let week = tracker.week_of(date.unwrap_or_else(today));
            println!("Working sets for the week of {}", week);
            println!("{:-<40}", "");
            print_series(&tracker.bar_series(&week), "No sets recorded this week");
        }

        Some(Commands::Trend { muscle, range }) => {
            println!("{} - {}", muscle, range.title());
            println!("{:-<40}", "");
            print_series(&tracker.trend_series(&muscle, range.token(), today()), "Gains are waiting!");
        }

        Some(Commands::Totals { range }) => {
            println!("Total sets - {}", range.title());
            println!("{:-<40}", "");
            print_series(&tracker.total_series(range.token(), today()), "Gains are waiting!");
        }

        Some(Commands::Muscles { action }) => match action.unwrap_or(MuscleAction::List) {
            MuscleAction::List => {
                for name in tracker.muscles() {
                    println!("{}", name);
                }
            }
            MuscleAction::Add { name } => {
                let name = tracker.add_muscle(&name)?;
                println!("Added {}", name);
            }
            MuscleAction::Remove { name } => {
                let removed = tracker.remove_muscle(&name)?;
                println!("Removed {} ({} weekly entries)", name, removed);
            }
        },

        Some(Commands::Tui) | None => {
            let mut app = App::new(tracker);
            app.run()?;
        }
    }

    Ok(())
}

fn print_series(series: &ChartSeries, empty: &str) {
    if series.is_empty() {
        println!("{}", empty);
        return;
    }

    let max = series.max_value().max(1.0);
    for (label, value) in series.iter() {
        let width = ((value / max) * 30.0).round() as usize;
        println!("{:12} {:>4} {}", label, value, "#".repeat(width));
    }
}
