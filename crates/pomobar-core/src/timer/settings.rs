use serde::{Deserialize, Serialize};

use super::TimerState;

/// Configuration snapshot handed to every transition.
///
/// The host reads configuration fresh before each action and passes it in;
/// the engine never consults a global source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    /// Work interval length in minutes.
    pub work_minutes: u64,
    pub short_break_minutes: u64,
    pub long_break_minutes: u64,
    /// Completed work intervals before a long break.
    pub long_break_interval: u32,
    pub enable_sound: bool,
    pub enable_notification: bool,
    /// Record cancelled work intervals as `completed = false`.
    pub record_cancelled: bool,
}

impl TimerSettings {
    /// Get work duration in seconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn work_secs(&self) -> u64 {
        self.work_minutes.saturating_mul(60)
    }

    /// Duration of the given break kind in seconds. Non-break states yield 0.
    pub fn break_secs(&self, kind: TimerState) -> u64 {
        match kind {
            TimerState::ShortBreak => self.short_break_minutes.saturating_mul(60),
            TimerState::LongBreak => self.long_break_minutes.saturating_mul(60),
            _ => 0,
        }
    }

    /// Break that follows a work interval, given the consecutive count after
    /// that interval completed. An interval of 0 is treated as 1.
    pub fn next_break(&self, consecutive: u32) -> TimerState {
        if consecutive >= self.long_break_interval.max(1) {
            TimerState::LongBreak
        } else {
            TimerState::ShortBreak
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_interval: 4,
            enable_sound: true,
            enable_notification: true,
            record_cancelled: false,
        }
    }
}
