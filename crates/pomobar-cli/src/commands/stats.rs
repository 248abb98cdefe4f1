use std::path::PathBuf;

use clap::Subcommand;
use pomobar_core::history::WEEK_DAYS;
use pomobar_core::{Clock, Config, HistoryRecorder, SqliteStore, SystemClock};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's completed pomodoros and focus minutes
    Today,
    /// Per-day totals for the trailing window, oldest first
    Week {
        /// Number of days, including today
        #[arg(long, default_value_t = WEEK_DAYS)]
        days: u32,
    },
    /// All-time stats
    All,
    /// Export every recorded interval as comma-separated text
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Delete all history and the saved timer state
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    let history = HistoryRecorder::new(&store);

    match action {
        StatsAction::Today => {
            let today = history.today(SystemClock.now_ms());
            println!("{}", serde_json::to_string_pretty(&today)?);
        }
        StatsAction::Week { days } => {
            let window = history.rolling_window(days);
            println!("{}", serde_json::to_string_pretty(&window)?);
        }
        StatsAction::All => {
            let totals = history.all_time_totals();
            println!("{}", serde_json::to_string_pretty(&totals)?);
        }
        StatsAction::Export { output } => {
            let labels = Config::load_or_default().export_labels();
            let text = history.export_delimited_with(&labels);
            match output {
                Some(path) => {
                    std::fs::write(&path, text)?;
                    eprintln!("exported to {}", path.display());
                }
                None => println!("{text}"),
            }
        }
        StatsAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear history without --yes".into());
            }
            history.clear_all();
            println!("history cleared");
        }
    }
    Ok(())
}
