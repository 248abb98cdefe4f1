//! Commands exposed to the host's command surface and quick menu.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timer::TimerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    Start,
    Pause,
    Resume,
    /// Start if idle, resume if paused, pause otherwise.
    Toggle,
    Cancel,
    ShowPanel,
    ShowMenu,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl Command {
    pub const ALL: [Command; 7] = [
        Command::Start,
        Command::Pause,
        Command::Resume,
        Command::Toggle,
        Command::Cancel,
        Command::ShowPanel,
        Command::ShowMenu,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Toggle => "toggle",
            Self::Cancel => "cancel",
            Self::ShowPanel => "show-panel",
            Self::ShowMenu => "show-menu",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Start => "Start Pomodoro",
            Self::Pause => "Pause",
            Self::Resume => "Resume",
            Self::Toggle => "Start/Pause",
            Self::Cancel => "Cancel",
            Self::ShowPanel => "Show Details",
            Self::ShowMenu => "Pomodoro Menu",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

/// Entries offered by the status item's quick menu in a given state.
pub fn quick_menu(state: TimerState) -> Vec<Command> {
    match state {
        TimerState::Idle => vec![Command::Start, Command::ShowPanel],
        TimerState::Paused => vec![Command::Resume, Command::Cancel, Command::ShowPanel],
        _ => vec![Command::Pause, Command::Cancel, Command::ShowPanel],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        for c in Command::ALL {
            assert_eq!(c.name().parse::<Command>(), Ok(c));
        }
        assert_eq!(" Toggle ".parse::<Command>(), Ok(Command::Toggle));
        assert_eq!(
            "explode".parse::<Command>(),
            Err(UnknownCommand("explode".into()))
        );
    }

    #[test]
    fn serde_names_match_display() {
        let json = serde_json::to_string(&Command::ShowPanel).unwrap();
        assert_eq!(json, "\"show-panel\"");
    }

    #[test]
    fn menu_depends_on_state() {
        assert_eq!(quick_menu(TimerState::Idle)[0], Command::Start);
        assert_eq!(quick_menu(TimerState::Paused)[0], Command::Resume);
        assert_eq!(quick_menu(TimerState::LongBreak)[0], Command::Pause);
        assert!(quick_menu(TimerState::Working).contains(&Command::Cancel));
    }
}
