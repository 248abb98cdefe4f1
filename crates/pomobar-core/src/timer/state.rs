use std::fmt;

use serde::{Deserialize, Serialize};

/// Store key under which the live timer snapshot is persisted.
pub const TIMER_STATE_KEY: &str = "timerState";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerState {
    Idle,
    Working,
    ShortBreak,
    LongBreak,
    Paused,
}

impl TimerState {
    /// States in which the one-second countdown is active.
    pub fn is_counting(self) -> bool {
        matches!(self, Self::Working | Self::ShortBreak | Self::LongBreak)
    }

    pub fn is_break(self) -> bool {
        matches!(self, Self::ShortBreak | Self::LongBreak)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Working => "Working",
            Self::ShortBreak => "Short break",
            Self::LongBreak => "Long break",
            Self::Paused => "Paused",
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Durable point-in-time capture of the timer, written after every
/// state-affecting mutation and read back once at process start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub remaining_seconds: u64,
    pub total_duration_seconds: u64,
    pub completed_pomodoro_count: u32,
    pub consecutive_pomodoro_count: u32,
    /// Epoch milliseconds at which the snapshot was taken.
    pub saved_at_timestamp: u64,
    /// State to return to when `state` is `Paused`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_from: Option<TimerState>,
    /// Epoch milliseconds at which the current work interval began.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
}
