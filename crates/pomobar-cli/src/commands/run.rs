//! Foreground host: drives the countdown once per second and reads
//! commands from stdin, one per line.
//!
//! Accepted input: a command name (`start`, `toggle`, `show-panel`, ...),
//! a panel message as JSON (`{"type":"toggleTimer"}`), `close-panel`, or
//! `quit`. End of input also quits.

use std::time::Duration;

use clap::Args;
use pomobar_core::command::UnknownCommand;
use pomobar_core::{
    quick_menu, Command, Config, Notice, Notifier, PanelMessage, PanelSlot, SqliteStore,
    TimerController, TimerSettings,
};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use crate::host::{print_menu, Output, TerminalNotifier, TerminalPanel, TerminalStatus};

#[derive(Args)]
pub struct RunArgs {
    /// Emit one JSON object per line instead of human-readable text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, PartialEq)]
enum Input {
    Empty,
    Quit,
    ClosePanel,
    Command(Command),
    Panel(PanelMessage),
}

#[derive(Error, Debug)]
enum InputError {
    #[error(transparent)]
    Command(#[from] UnknownCommand),
    #[error("invalid panel message: {0}")]
    Panel(#[from] serde_json::Error),
}

fn parse_input(line: &str) -> Result<Input, InputError> {
    let line = line.trim();
    match line {
        "" => Ok(Input::Empty),
        "quit" | "exit" => Ok(Input::Quit),
        "close-panel" => Ok(Input::ClosePanel),
        _ if line.starts_with('{') => Ok(Input::Panel(serde_json::from_str(line)?)),
        _ => Ok(Input::Command(line.parse()?)),
    }
}

/// Read fresh on every event so edits to the config file apply immediately.
fn current_settings() -> TimerSettings {
    Config::load_or_default().settings()
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let output = if args.json { Output::Json } else { Output::Human };
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(event_loop(output))
}

async fn event_loop(output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    let mut ctl = TimerController::new(store, TerminalNotifier::new(output));
    let mut status = TerminalStatus::new(output);
    let mut panel: PanelSlot<TerminalPanel> = PanelSlot::new();

    let settings = current_settings();
    let restored = ctl.restore(&settings);
    tracing::debug!(events = restored.len(), state = %ctl.state(), "timer restored");
    ctl.render_status(&mut status, &settings);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.reset();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let settings = current_settings();
                ctl.tick(&settings);
                ctl.render_status(&mut status, &settings);
                panel.redraw(&ctl.panel_view());
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let settings = current_settings();
                let was_counting = ctl.state().is_counting();

                match parse_input(&line) {
                    Ok(Input::Empty) => continue,
                    Ok(Input::Quit) => break,
                    Ok(Input::ClosePanel) => {
                        panel.close();
                    }
                    Ok(Input::Command(Command::ShowPanel)) => {
                        panel.show_with(|| TerminalPanel::new(output), &ctl.panel_view());
                    }
                    Ok(Input::Command(Command::ShowMenu)) => {
                        print_menu(&quick_menu(ctl.state()), output);
                    }
                    Ok(Input::Command(command)) => {
                        ctl.execute(command, &settings);
                    }
                    Ok(Input::Panel(message)) => {
                        ctl.handle_panel_message(message, &settings);
                    }
                    Err(e) => ctl.notifier_mut().notify(&Notice::info(e.to_string())),
                }

                // A countdown that just (re)started gets a full first second.
                if !was_counting && ctl.state().is_counting() {
                    ticker.reset();
                }
                ctl.render_status(&mut status, &settings);
                panel.redraw(&ctl.panel_view());
            }
        }
    }

    status.finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_names() {
        assert_eq!(parse_input("start").unwrap(), Input::Command(Command::Start));
        assert_eq!(
            parse_input("  Show-Panel\n").unwrap(),
            Input::Command(Command::ShowPanel)
        );
        assert!(matches!(parse_input("explode"), Err(InputError::Command(_))));
    }

    #[test]
    fn parses_panel_messages() {
        assert_eq!(
            parse_input(r#"{"type":"toggleTimer"}"#).unwrap(),
            Input::Panel(PanelMessage::ToggleTimer)
        );
        assert_eq!(
            parse_input(r#"{"type":"refresh"}"#).unwrap(),
            Input::Panel(PanelMessage::Refresh)
        );
        assert!(matches!(
            parse_input(r#"{"type":"selfDestruct"}"#),
            Err(InputError::Panel(_))
        ));
    }

    #[test]
    fn control_words() {
        assert_eq!(parse_input("").unwrap(), Input::Empty);
        assert_eq!(parse_input("quit").unwrap(), Input::Quit);
        assert_eq!(parse_input("exit").unwrap(), Input::Quit);
        assert_eq!(parse_input("close-panel").unwrap(), Input::ClosePanel);
    }
}
