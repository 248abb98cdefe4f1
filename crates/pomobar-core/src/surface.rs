//! Host-provided UI surfaces and the detail panel protocol.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::history::DailyAggregate;
use crate::timer::TimerState;

/// Single-line status indicator with a tooltip.
pub trait StatusSurface {
    fn update(&mut self, text: &str, tooltip: &str);
}

/// Detail panel. Hosts render `PanelView` however they like.
pub trait PanelSurface {
    fn render(&mut self, view: &PanelView);

    /// Bring an already-open panel to the front.
    fn reveal(&mut self);
}

/// Messages the panel sends back to the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PanelMessage {
    ToggleTimer,
    CancelTimer,
    /// Redraw only.
    Refresh,
}

impl PanelMessage {
    /// The timer command this message maps to, if any.
    pub fn command(self) -> Option<Command> {
        match self {
            Self::ToggleTimer => Some(Command::Toggle),
            Self::CancelTimer => Some(Command::Cancel),
            Self::Refresh => None,
        }
    }
}

/// Everything the detail panel shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub state: TimerState,
    pub state_label: String,
    pub countdown: String,
    /// 0.0 .. 1.0 within the current interval.
    pub progress: f64,
    pub completed_count: u32,
    pub consecutive_count: u32,
    pub today: DailyAggregate,
    /// Oldest first, today last.
    pub week: Vec<DailyAggregate>,
}

/// Holds at most one open panel. Showing again reveals the existing one.
#[derive(Debug)]
pub struct PanelSlot<P> {
    panel: Option<P>,
}

impl<P: PanelSurface> PanelSlot<P> {
    pub fn new() -> Self {
        Self { panel: None }
    }

    pub fn is_open(&self) -> bool {
        self.panel.is_some()
    }

    /// Open the panel, or reveal it if it is already open, then render.
    /// Returns `true` when a new panel was created.
    pub fn show_with(&mut self, create: impl FnOnce() -> P, view: &PanelView) -> bool {
        let created = self.panel.is_none();
        if let Some(panel) = self.panel.as_mut() {
            panel.reveal();
        }
        self.panel.get_or_insert_with(create).render(view);
        created
    }

    /// Re-render the open panel, if any.
    pub fn redraw(&mut self, view: &PanelView) {
        if let Some(panel) = self.panel.as_mut() {
            panel.render(view);
        }
    }

    pub fn get(&self) -> Option<&P> {
        self.panel.as_ref()
    }

    pub fn close(&mut self) -> Option<P> {
        self.panel.take()
    }
}

impl<P: PanelSurface> Default for PanelSlot<P> {
    fn default() -> Self {
        Self::new()
    }
}
