//! User-facing alerts.

use serde::{Deserialize, Serialize};

use crate::timer::TimerState;

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Notice {
    /// A work interval ran to zero.
    WorkEnd {
        completed_count: u32,
        next: TimerState,
        break_minutes: u64,
    },
    /// A break ran to zero.
    BreakEnd { kind: TimerState },
    /// One-line informational message, e.g. a rejected action.
    Info { message: String },
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self::Info {
            message: message.into(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::WorkEnd {
                completed_count,
                next,
                break_minutes,
            } => format!(
                "Pomodoro #{completed_count} complete! Time for a {} ({break_minutes} min).",
                next.label().to_lowercase()
            ),
            Self::BreakEnd { kind } => {
                format!("{} is over. Ready for the next pomodoro?", kind.label())
            }
            Self::Info { message } => message.clone(),
        }
    }
}

/// Fire-and-forget notification sink provided by the host.
pub trait Notifier {
    fn notify(&mut self, notice: &Notice);

    /// Signal the host to play its completion sound.
    fn chime(&mut self) {}
}

impl<T: Notifier + ?Sized> Notifier for &mut T {
    fn notify(&mut self, notice: &Notice) {
        (**self).notify(notice)
    }

    fn chime(&mut self) {
        (**self).chime()
    }
}

/// Notifier that keeps everything it is sent. Used by headless hosts and
/// tests to inspect what would have been shown.
#[derive(Debug, Default)]
pub struct NoticeLog {
    pub notices: Vec<Notice>,
    pub chimes: usize,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices other than informational messages.
    pub fn alerts(&self) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .filter(|n| !matches!(n, Notice::Info { .. }))
    }
}

impl Notifier for NoticeLog {
    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn chime(&mut self) {
        self.chimes += 1;
    }
}
