use clap::Subcommand;
use pomobar_core::{
    quick_menu, Command, Config, Event, SqliteStore, TimerController, TimerSnapshot,
};
use serde::Serialize;

use crate::host::{print_menu, Output, TerminalNotifier};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a pomodoro
    Start,
    /// Pause the running countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Start, pause or resume depending on the current state
    Toggle,
    /// Cancel the current interval and return to idle
    Cancel,
    /// Print current timer state as JSON
    Status,
    /// List the quick menu entries for the current state
    Menu,
}

impl TimerAction {
    fn command(&self) -> Option<Command> {
        match self {
            Self::Start => Some(Command::Start),
            Self::Pause => Some(Command::Pause),
            Self::Resume => Some(Command::Resume),
            Self::Toggle => Some(Command::Toggle),
            Self::Cancel => Some(Command::Cancel),
            Self::Status | Self::Menu => None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    status: String,
    tooltip: String,
    snapshot: TimerSnapshot,
    events: Vec<Event>,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Config::load_or_default().settings();
    let store = SqliteStore::open()?;
    let mut ctl = TimerController::new(store, TerminalNotifier::new(Output::Human));

    // Time passed since the last invocation is charged before acting.
    let mut events = ctl.restore(&settings);

    if let TimerAction::Menu = action {
        print_menu(&quick_menu(ctl.state()), Output::Human);
        return Ok(());
    }
    if let Some(command) = action.command() {
        events.extend(ctl.execute(command, &settings));
    }

    let report = StatusReport {
        status: ctl.status_text(&settings),
        tooltip: ctl.tooltip(),
        snapshot: ctl.snapshot(),
        events,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
