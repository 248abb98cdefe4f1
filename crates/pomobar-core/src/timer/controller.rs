//! Glue between the pure engine and its collaborators.
//!
//! The controller owns the engine, the key-value store, the notification
//! sink and a clock. Each public mutator applies one engine transition, then
//! records history, raises notices and persists a snapshot. Nothing here
//! returns an error: rejected actions become informational notices and store
//! failures are logged.

use super::display;
use super::engine::TimerEngine;
use super::settings::TimerSettings;
use super::state::{TimerSnapshot, TimerState, TIMER_STATE_KEY};
use crate::clock::{Clock, SystemClock};
use crate::command::Command;
use crate::error::TransitionError;
use crate::events::Event;
use crate::history::{HistoryRecorder, WorkIntervalRecord, WEEK_DAYS};
use crate::notify::{Notice, Notifier};
use crate::storage::kv::{self, KeyValueStore};
use crate::surface::{PanelMessage, PanelView, StatusSurface};

pub struct TimerController<S, N, C = SystemClock> {
    engine: TimerEngine,
    store: S,
    notifier: N,
    clock: C,
}

impl<S, N> TimerController<S, N, SystemClock>
where
    S: KeyValueStore,
    N: Notifier,
{
    /// Idle controller on the system clock. Call `restore` before use.
    pub fn new(store: S, notifier: N) -> Self {
        Self::with_clock(store, notifier, SystemClock)
    }
}

impl<S, N, C> TimerController<S, N, C>
where
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    pub fn with_clock(store: S, notifier: N, clock: C) -> Self {
        Self {
            engine: TimerEngine::new(),
            store,
            notifier,
            clock,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn state(&self) -> TimerState {
        self.engine.state()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn history(&self) -> HistoryRecorder<'_, S> {
        HistoryRecorder::new(&self.store)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.engine.snapshot(self.clock.now_ms())
    }

    pub fn status_text(&self, settings: &TimerSettings) -> String {
        display::status_text(&self.engine, settings)
    }

    pub fn tooltip(&self) -> String {
        let today = self.history().today(self.clock.now_ms());
        display::tooltip(&self.engine, &today)
    }

    pub fn render_status(&self, surface: &mut impl StatusSurface, settings: &TimerSettings) {
        surface.update(&self.status_text(settings), &self.tooltip());
    }

    pub fn panel_view(&self) -> PanelView {
        let now = self.clock.now_ms();
        let history = self.history();
        let week = history.rolling_window_ending(crate::history::local_date(now), WEEK_DAYS);
        let today = week
            .last()
            .copied()
            .unwrap_or_else(|| history.today(now));
        PanelView {
            state: self.engine.state(),
            state_label: display::state_label(&self.engine),
            countdown: display::format_countdown(self.engine.remaining_secs()),
            progress: self.engine.progress(),
            completed_count: self.engine.completed_count(),
            consecutive_count: self.engine.consecutive_count(),
            today,
            week,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Rebuild state from the persisted snapshot, charging the downtime.
    ///
    /// Completions that happened while the process was down are finalized
    /// exactly as a live countdown would have: recorded, counted, notified.
    pub fn restore(&mut self, settings: &TimerSettings) -> Vec<Event> {
        let snapshot = match kv::load::<TimerSnapshot, _>(&self.store, TIMER_STATE_KEY) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable timer snapshot");
                return Vec::new();
            }
        };

        let now = self.clock.now_ms();
        let (engine, events) = TimerEngine::restore(&snapshot, settings, now);
        self.engine = engine;
        if !events.is_empty() {
            self.dispatch(&events, settings);
            // Only whole seconds were charged; the remainder carries over to
            // the next restore.
            let charged_ms = now.saturating_sub(snapshot.saved_at_timestamp) / 1000 * 1000;
            self.persist_at(snapshot.saved_at_timestamp.saturating_add(charged_ms));
        }
        events
    }

    pub fn start_work(&mut self, settings: &TimerSettings) -> Vec<Event> {
        let result = self.engine.start_work(settings, self.clock.now_ms());
        self.apply(result, settings)
    }

    pub fn pause(&mut self, settings: &TimerSettings) -> Vec<Event> {
        let result = self.engine.pause(self.clock.now_ms());
        self.apply(result, settings)
    }

    pub fn resume(&mut self, settings: &TimerSettings) -> Vec<Event> {
        let result = self.engine.resume(self.clock.now_ms());
        self.apply(result, settings)
    }

    pub fn toggle(&mut self, settings: &TimerSettings) -> Vec<Event> {
        let result = self.engine.toggle(settings, self.clock.now_ms());
        self.apply(result, settings)
    }

    pub fn cancel(&mut self, settings: &TimerSettings) -> Vec<Event> {
        let result = self.engine.cancel(self.clock.now_ms());
        self.apply(result, settings)
    }

    /// Run a timer command. Host-only commands are ignored here.
    pub fn execute(&mut self, command: Command, settings: &TimerSettings) -> Vec<Event> {
        match command {
            Command::Start => self.start_work(settings),
            Command::Pause => self.pause(settings),
            Command::Resume => self.resume(settings),
            Command::Toggle => self.toggle(settings),
            Command::Cancel => self.cancel(settings),
            Command::ShowPanel | Command::ShowMenu => Vec::new(),
        }
    }

    pub fn handle_panel_message(
        &mut self,
        message: PanelMessage,
        settings: &TimerSettings,
    ) -> Vec<Event> {
        match message.command() {
            Some(command) => self.execute(command, settings),
            None => Vec::new(),
        }
    }

    /// One-second countdown tick. A no-op unless a countdown is active.
    pub fn tick(&mut self, settings: &TimerSettings) -> Vec<Event> {
        if !self.engine.state().is_counting() {
            return Vec::new();
        }
        let events = self.engine.tick(settings, self.clock.now_ms());
        self.dispatch(&events, settings);
        self.persist();
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply(
        &mut self,
        result: Result<Event, TransitionError>,
        settings: &TimerSettings,
    ) -> Vec<Event> {
        match result {
            Ok(event) => {
                let events = vec![event];
                self.dispatch(&events, settings);
                self.persist();
                events
            }
            Err(e) => {
                tracing::debug!(state = %self.engine.state(), error = %e, "rejected transition");
                self.notifier.notify(&Notice::info(e.to_string()));
                Vec::new()
            }
        }
    }

    fn dispatch(&mut self, events: &[Event], settings: &TimerSettings) {
        for event in events {
            match event {
                Event::WorkCompleted {
                    record,
                    completed_count,
                    consecutive_count,
                } => {
                    self.history().record_interval(record.clone());
                    let next = settings.next_break(*consecutive_count);
                    self.alert(
                        Notice::WorkEnd {
                            completed_count: *completed_count,
                            next,
                            break_minutes: settings.break_secs(next) / 60,
                        },
                        settings,
                    );
                }
                Event::BreakCompleted { kind, .. } => {
                    self.alert(Notice::BreakEnd { kind: *kind }, settings);
                }
                Event::Cancelled {
                    from: TimerState::Working,
                    elapsed_secs,
                    started_at_ms,
                    at,
                } if settings.record_cancelled => {
                    let end_time = at.timestamp_millis().max(0) as u64;
                    self.history().record_interval(WorkIntervalRecord {
                        start_time: started_at_ms
                            .unwrap_or_else(|| end_time.saturating_sub(elapsed_secs * 1000)),
                        end_time,
                        duration_minutes: elapsed_secs / 60,
                        completed: false,
                    });
                }
                Event::Restored {
                    state,
                    remaining_secs,
                    elapsed_secs,
                    ..
                } => {
                    tracing::info!(%state, remaining_secs, elapsed_secs, "restored timer");
                }
                Event::BreakElapsed { kind, .. } => {
                    tracing::info!(%kind, "break elapsed while stopped");
                }
                other => tracing::debug!(event = ?other, "timer event"),
            }
        }
    }

    fn alert(&mut self, notice: Notice, settings: &TimerSettings) {
        if settings.enable_notification {
            self.notifier.notify(&notice);
        }
        if settings.enable_sound {
            self.notifier.chime();
        }
    }

    fn persist(&self) {
        self.persist_at(self.clock.now_ms());
    }

    fn persist_at(&self, saved_at_ms: u64) {
        let snapshot = self.engine.snapshot(saved_at_ms);
        if let Err(e) = kv::save(&self.store, TIMER_STATE_KEY, &snapshot) {
            tracing::warn!(error = %e, "failed to persist timer snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::StoreError;
    use crate::notify::NoticeLog;
    use crate::storage::MemoryStore;
    use serde_json::Value;

    const T0: u64 = 1_700_000_000_000;

    fn short() -> TimerSettings {
        TimerSettings {
            work_minutes: 1,
            short_break_minutes: 1,
            long_break_minutes: 2,
            ..TimerSettings::default()
        }
    }

    fn ticks<S: KeyValueStore, N: Notifier>(
        ctl: &mut TimerController<S, N, &ManualClock>,
        clock: &ManualClock,
        settings: &TimerSettings,
        n: u64,
    ) {
        for _ in 0..n {
            clock.advance_secs(1);
            ctl.tick(settings);
        }
    }

    #[test]
    fn completion_records_and_notifies() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let s = short();
        let mut ctl = TimerController::with_clock(&store, NoticeLog::new(), &clock);

        ctl.start_work(&s);
        ticks(&mut ctl, &clock, &s, 60);

        assert_eq!(ctl.state(), TimerState::ShortBreak);
        let records = ctl.history().intervals();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].duration_minutes, 1);
        assert_eq!(records[0].start_time, T0);
        assert!(records[0].completed);
        assert!(matches!(
            ctl.notifier().notices.as_slice(),
            [Notice::WorkEnd {
                completed_count: 1,
                next: TimerState::ShortBreak,
                break_minutes: 1
            }]
        ));
        assert_eq!(ctl.notifier().chimes, 1);

        ticks(&mut ctl, &clock, &s, 60);
        assert_eq!(ctl.state(), TimerState::Idle);
        assert!(matches!(
            ctl.notifier().notices.last(),
            Some(Notice::BreakEnd {
                kind: TimerState::ShortBreak
            })
        ));
    }

    #[test]
    fn disabled_notifications_and_sound_stay_quiet() {
        let clock = ManualClock::new(T0);
        let s = TimerSettings {
            enable_sound: false,
            enable_notification: false,
            ..short()
        };
        let mut ctl = TimerController::with_clock(MemoryStore::new(), NoticeLog::new(), &clock);
        ctl.start_work(&s);
        ticks(&mut ctl, &clock, &s, 120);
        assert_eq!(ctl.state(), TimerState::Idle);
        assert!(ctl.notifier().notices.is_empty());
        assert_eq!(ctl.notifier().chimes, 0);
        assert_eq!(ctl.history().intervals().len(), 1);
    }

    #[test]
    fn rejected_action_is_informational() {
        let clock = ManualClock::new(T0);
        let s = short();
        let mut ctl = TimerController::with_clock(MemoryStore::new(), NoticeLog::new(), &clock);
        assert!(ctl.pause(&s).is_empty());
        assert_eq!(ctl.state(), TimerState::Idle);
        assert_eq!(
            ctl.notifier().notices,
            vec![Notice::info("No timer is running")]
        );
        assert!(!ctl.store().contains(TIMER_STATE_KEY));
    }

    #[test]
    fn every_mutation_persists_snapshot() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let s = short();
        let mut ctl = TimerController::with_clock(&store, NoticeLog::new(), &clock);

        ctl.start_work(&s);
        clock.advance_secs(1);
        ctl.tick(&s);
        let snap: TimerSnapshot = kv::load(&store, TIMER_STATE_KEY).unwrap().unwrap();
        assert_eq!(snap.state, TimerState::Working);
        assert_eq!(snap.remaining_seconds, 59);
        assert_eq!(snap.saved_at_timestamp, T0 + 1000);

        ctl.cancel(&s);
        let snap: TimerSnapshot = kv::load(&store, TIMER_STATE_KEY).unwrap().unwrap();
        assert_eq!(snap.state, TimerState::Idle);
    }

    #[test]
    fn idle_tick_does_not_write() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let mut ctl = TimerController::with_clock(&store, NoticeLog::new(), &clock);
        assert!(ctl.tick(&short()).is_empty());
        assert!(!store.contains(TIMER_STATE_KEY));
    }

    #[test]
    fn cancelled_work_is_recorded_when_enabled() {
        let clock = ManualClock::new(T0);
        let s = TimerSettings {
            work_minutes: 25,
            record_cancelled: true,
            ..TimerSettings::default()
        };
        let mut ctl = TimerController::with_clock(MemoryStore::new(), NoticeLog::new(), &clock);
        ctl.start_work(&s);
        ticks(&mut ctl, &clock, &s, 600);
        ctl.cancel(&s);

        let records = ctl.history().intervals();
        assert_eq!(
            records,
            vec![WorkIntervalRecord {
                start_time: T0,
                end_time: T0 + 600_000,
                duration_minutes: 10,
                completed: false,
            }]
        );
        assert_eq!(ctl.engine().consecutive_count(), 0);
    }

    #[test]
    fn panel_messages_drive_the_timer() {
        let clock = ManualClock::new(T0);
        let s = short();
        let mut ctl = TimerController::with_clock(MemoryStore::new(), NoticeLog::new(), &clock);

        ctl.handle_panel_message(PanelMessage::ToggleTimer, &s);
        assert_eq!(ctl.state(), TimerState::Working);
        ctl.handle_panel_message(PanelMessage::Refresh, &s);
        assert_eq!(ctl.state(), TimerState::Working);
        ctl.handle_panel_message(PanelMessage::CancelTimer, &s);
        assert_eq!(ctl.state(), TimerState::Idle);
    }

    #[test]
    fn host_commands_leave_the_timer_alone() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let s = short();
        let mut ctl = TimerController::with_clock(&store, NoticeLog::new(), &clock);

        assert!(ctl.execute(Command::ShowPanel, &s).is_empty());
        assert!(ctl.execute(Command::ShowMenu, &s).is_empty());
        assert_eq!(ctl.state(), TimerState::Idle);
        assert!(ctl.notifier().notices.is_empty());
        assert!(!store.contains(TIMER_STATE_KEY));

        ctl.execute(Command::Start, &s);
        let before = ctl.engine().clone();
        assert!(ctl.execute(Command::ShowPanel, &s).is_empty());
        assert_eq!(ctl.engine(), &before);
    }

    #[test]
    fn panel_view_reports_week_and_today() {
        let clock = ManualClock::new(T0);
        let s = short();
        let mut ctl = TimerController::with_clock(MemoryStore::new(), NoticeLog::new(), &clock);
        ctl.start_work(&s);
        ticks(&mut ctl, &clock, &s, 60);

        let view = ctl.panel_view();
        assert_eq!(view.state, TimerState::ShortBreak);
        assert_eq!(view.countdown, "01:00");
        assert_eq!(view.week.len(), 7);
        assert_eq!(view.today, *view.week.last().unwrap());
        assert_eq!(view.completed_count, 1);
    }

    struct WriteOnlyFails(MemoryStore);

    impl KeyValueStore for WriteOnlyFails {
        fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
            self.0.get(key)
        }
        fn set(&self, _key: &str, _value: &Value) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".into()))
        }
        fn delete(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".into()))
        }
    }

    #[test]
    fn store_failures_do_not_stop_the_timer() {
        let clock = ManualClock::new(T0);
        let s = short();
        let mut ctl = TimerController::with_clock(
            WriteOnlyFails(MemoryStore::new()),
            NoticeLog::new(),
            &clock,
        );
        ctl.start_work(&s);
        ticks(&mut ctl, &clock, &s, 60);
        assert_eq!(ctl.state(), TimerState::ShortBreak);
        assert_eq!(ctl.engine().completed_count(), 1);
        assert!(ctl.history().intervals().is_empty());
    }
}
