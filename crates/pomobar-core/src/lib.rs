//! # Pomobar Core Library
//!
//! This library provides the core logic for Pomobar, a Pomodoro timer that
//! lives in a host's status bar. The host (an editor extension, the bundled
//! terminal CLI, ...) supplies the UI surfaces and a key-value store; this
//! crate owns the state machine, persistence and history.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A tick-driven state machine; the caller invokes
//!   `tick()` once per second and passes configuration explicitly
//! - **Timer Controller**: Applies engine events to history, notifications
//!   and snapshot persistence, and restores state after a restart
//! - **History**: Append-only work interval log with daily/weekly rollups
//!   and delimited export
//! - **Storage**: Key-value store abstraction (SQLite or in-memory) and
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerController`]: Engine plus side effects and restoration
//! - [`HistoryRecorder`]: Interval log and aggregates
//! - [`Config`]: Application configuration management
//! - [`KeyValueStore`]: Trait for durable storage backends

pub mod clock;
pub mod command;
pub mod error;
pub mod events;
pub mod history;
pub mod notify;
pub mod storage;
pub mod surface;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{quick_menu, Command};
pub use error::{ConfigError, CoreError, StoreError, TransitionError};
pub use events::Event;
pub use history::{DailyAggregate, ExportLabels, HistoryRecorder, Totals, WorkIntervalRecord};
pub use notify::{Notice, NoticeLog, Notifier};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
pub use surface::{PanelMessage, PanelSlot, PanelSurface, PanelView, StatusSurface};
pub use timer::{TimerController, TimerEngine, TimerSettings, TimerSnapshot, TimerState};
