//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It owns no threads and
//! no I/O: the caller invokes `tick()` once per second and hands in the
//! current time and a `TimerSettings` snapshot for every transition.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Working -> (ShortBreak | LongBreak) -> Idle
//!            \______ Paused ______/
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.start_work(&settings, now_ms)?;
//! // Once per second:
//! let events = engine.tick(&settings, now_ms);
//! ```

use serde::{Deserialize, Serialize};

use super::settings::TimerSettings;
use super::state::{TimerSnapshot, TimerState};
use crate::error::TransitionError;
use crate::events::{at, Event};
use crate::history::WorkIntervalRecord;

/// Core timer engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEngine {
    state: TimerState,
    /// State to resume into (only set while `Paused`).
    paused_from: Option<TimerState>,
    remaining_secs: u64,
    total_secs: u64,
    completed_count: u32,
    consecutive_count: u32,
    /// Epoch ms at which the current work interval started.
    started_at_ms: Option<u64>,
}

impl TimerEngine {
    /// Create an idle engine with zeroed counters.
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            paused_from: None,
            remaining_secs: 0,
            total_secs: 0,
            completed_count: 0,
            consecutive_count: 0,
            started_at_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// The counting state behind a pause, or the state itself.
    pub fn effective_state(&self) -> TimerState {
        match self.state {
            TimerState::Paused => self.paused_from.unwrap_or(TimerState::Working),
            other => other,
        }
    }

    pub fn paused_from(&self) -> Option<TimerState> {
        self.paused_from
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn completed_count(&self) -> u32 {
        self.completed_count
    }

    pub fn consecutive_count(&self) -> u32 {
        self.consecutive_count
    }

    pub fn started_at_ms(&self) -> Option<u64> {
        self.started_at_ms
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / self.total_secs as f64)
    }

    /// Build the persistable snapshot.
    pub fn snapshot(&self, now_ms: u64) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state,
            remaining_seconds: self.remaining_secs,
            total_duration_seconds: self.total_secs,
            completed_pomodoro_count: self.completed_count,
            consecutive_pomodoro_count: self.consecutive_count,
            saved_at_timestamp: now_ms,
            paused_from: self.paused_from,
            start_time: self.started_at_ms,
        }
    }

    /// Rebuild an engine from a snapshot without applying elapsed time.
    ///
    /// `remaining` is clamped into `[0, total]`. A paused snapshot that does
    /// not say what it paused resumes into `Working`.
    pub fn from_snapshot(snapshot: &TimerSnapshot) -> Self {
        let total_secs = snapshot.total_duration_seconds;
        let paused_from = match snapshot.state {
            TimerState::Paused => Some(
                snapshot
                    .paused_from
                    .filter(|s| s.is_counting())
                    .unwrap_or(TimerState::Working),
            ),
            _ => None,
        };
        let mut engine = Self {
            state: snapshot.state,
            paused_from,
            remaining_secs: snapshot.remaining_seconds.min(total_secs),
            total_secs,
            completed_count: snapshot.completed_pomodoro_count,
            consecutive_count: snapshot.consecutive_pomodoro_count,
            started_at_ms: snapshot.start_time,
        };
        if engine.state == TimerState::Idle {
            engine.reset_interval();
        }
        engine
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start_work(
        &mut self,
        settings: &TimerSettings,
        now_ms: u64,
    ) -> Result<Event, TransitionError> {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Working;
                self.total_secs = settings.work_secs();
                self.remaining_secs = self.total_secs;
                self.started_at_ms = Some(now_ms);
                Ok(Event::WorkStarted {
                    duration_secs: self.total_secs,
                    at: at(now_ms),
                })
            }
            TimerState::Working => Err(TransitionError::AlreadyWorking),
            TimerState::Paused => Err(TransitionError::AlreadyPaused),
            other => Err(TransitionError::Busy(other)),
        }
    }

    pub fn pause(&mut self, now_ms: u64) -> Result<Event, TransitionError> {
        match self.state {
            state if state.is_counting() => {
                self.paused_from = Some(state);
                self.state = TimerState::Paused;
                Ok(Event::Paused {
                    from: state,
                    remaining_secs: self.remaining_secs,
                    at: at(now_ms),
                })
            }
            TimerState::Paused => Err(TransitionError::AlreadyPaused),
            _ => Err(TransitionError::NotRunning),
        }
    }

    pub fn resume(&mut self, now_ms: u64) -> Result<Event, TransitionError> {
        if self.state != TimerState::Paused {
            return Err(TransitionError::NotPaused);
        }
        let to = self.paused_from.take().unwrap_or(TimerState::Working);
        self.state = to;
        Ok(Event::Resumed {
            to,
            remaining_secs: self.remaining_secs,
            at: at(now_ms),
        })
    }

    /// Start if idle, resume if paused, pause otherwise.
    pub fn toggle(
        &mut self,
        settings: &TimerSettings,
        now_ms: u64,
    ) -> Result<Event, TransitionError> {
        match self.state {
            TimerState::Idle => self.start_work(settings, now_ms),
            TimerState::Paused => self.resume(now_ms),
            _ => self.pause(now_ms),
        }
    }

    pub fn cancel(&mut self, now_ms: u64) -> Result<Event, TransitionError> {
        if self.state == TimerState::Idle {
            return Err(TransitionError::NotRunning);
        }
        let from = self.effective_state();
        if from == TimerState::Working {
            self.consecutive_count = 0;
        }
        let event = Event::Cancelled {
            from,
            elapsed_secs: self.total_secs.saturating_sub(self.remaining_secs),
            started_at_ms: self.started_at_ms,
            at: at(now_ms),
        };
        self.reset_interval();
        Ok(event)
    }

    /// Advance the countdown by one second.
    ///
    /// Returns the completion events when the countdown reaches zero, an
    /// empty list otherwise. Does nothing unless a countdown is active.
    pub fn tick(&mut self, settings: &TimerSettings, now_ms: u64) -> Vec<Event> {
        if !self.state.is_counting() {
            return Vec::new();
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return self.complete(settings, now_ms);
        }
        Vec::new()
    }

    /// Rebuild from a snapshot and account for the time elapsed since it
    /// was saved.
    ///
    /// At most one completion step is applied. When a work interval finishes
    /// during the downtime, the leftover downtime is charged to the break
    /// that follows; if it covers the whole break, the break is resolved
    /// straight to idle without a break-completion event.
    pub fn restore(
        snapshot: &TimerSnapshot,
        settings: &TimerSettings,
        now_ms: u64,
    ) -> (Self, Vec<Event>) {
        let mut engine = Self::from_snapshot(snapshot);
        if !engine.state.is_counting() {
            return (engine, Vec::new());
        }

        let elapsed = now_ms.saturating_sub(snapshot.saved_at_timestamp) / 1000;
        let before = engine.remaining_secs;
        engine.remaining_secs = before.saturating_sub(elapsed);

        let mut events = vec![Event::Restored {
            state: engine.state,
            remaining_secs: engine.remaining_secs,
            elapsed_secs: elapsed,
            at: at(now_ms),
        }];
        if engine.remaining_secs > 0 {
            return (engine, events);
        }

        let ended_at_ms = snapshot
            .saved_at_timestamp
            .saturating_add(before.saturating_mul(1000));
        let was_working = engine.state == TimerState::Working;
        events.extend(engine.complete(settings, ended_at_ms));

        let overflow = elapsed - before;
        if was_working && overflow > 0 {
            let kind = engine.state;
            if overflow >= engine.total_secs {
                engine.reset_interval();
                events.push(Event::BreakElapsed {
                    kind,
                    at: at(now_ms),
                });
            } else {
                engine.remaining_secs -= overflow;
            }
        }
        (engine, events)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self, settings: &TimerSettings, ended_at_ms: u64) -> Vec<Event> {
        match self.state {
            TimerState::Working => {
                self.completed_count += 1;
                self.consecutive_count += 1;
                let start_time = self
                    .started_at_ms
                    .unwrap_or_else(|| ended_at_ms.saturating_sub(self.total_secs * 1000));
                let record = WorkIntervalRecord {
                    start_time,
                    end_time: ended_at_ms,
                    duration_minutes: self.total_secs / 60,
                    completed: true,
                };
                let completed = Event::WorkCompleted {
                    record,
                    completed_count: self.completed_count,
                    consecutive_count: self.consecutive_count,
                };

                let kind = settings.next_break(self.consecutive_count);
                if kind == TimerState::LongBreak {
                    self.consecutive_count = 0;
                }
                self.state = kind;
                self.total_secs = settings.break_secs(kind);
                self.remaining_secs = self.total_secs;
                self.started_at_ms = None;

                vec![
                    completed,
                    Event::BreakStarted {
                        kind,
                        duration_secs: self.total_secs,
                        at: at(ended_at_ms),
                    },
                ]
            }
            kind @ (TimerState::ShortBreak | TimerState::LongBreak) => {
                if kind == TimerState::LongBreak {
                    self.consecutive_count = 0;
                }
                self.reset_interval();
                vec![Event::BreakCompleted {
                    kind,
                    at: at(ended_at_ms),
                }]
            }
            _ => Vec::new(),
        }
    }

    fn reset_interval(&mut self) {
        self.state = TimerState::Idle;
        self.paused_from = None;
        self.remaining_secs = 0;
        self.total_secs = 0;
        self.started_at_ms = None;
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}
