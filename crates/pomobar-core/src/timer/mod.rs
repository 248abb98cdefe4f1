mod controller;
pub mod display;
mod engine;
mod settings;
mod state;

pub use controller::TimerController;
pub use engine::TimerEngine;
pub use settings::TimerSettings;
pub use state::{TimerSnapshot, TimerState, TIMER_STATE_KEY};
