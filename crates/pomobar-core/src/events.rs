use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::history::WorkIntervalRecord;
use crate::timer::TimerState;

/// Every state change of the timer engine produces an Event.
/// The controller turns them into history writes and notices; hosts may
/// print or forward them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    WorkStarted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    Paused {
        from: TimerState,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Resumed {
        to: TimerState,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown stopped early. `from` is the counting state that was
    /// cancelled, even when the timer was paused at the time.
    Cancelled {
        from: TimerState,
        elapsed_secs: u64,
        started_at_ms: Option<u64>,
        at: DateTime<Utc>,
    },
    WorkCompleted {
        record: WorkIntervalRecord,
        completed_count: u32,
        consecutive_count: u32,
    },
    BreakStarted {
        kind: TimerState,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    BreakCompleted {
        kind: TimerState,
        at: DateTime<Utc>,
    },
    /// A break elapsed entirely while the process was down and was resolved
    /// straight to idle during restoration.
    BreakElapsed {
        kind: TimerState,
        at: DateTime<Utc>,
    },
    Restored {
        state: TimerState,
        remaining_secs: u64,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
}

/// Convert epoch milliseconds into an event timestamp.
pub(crate) fn at(epoch_ms: u64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms as i64).unwrap_or_default()
}
