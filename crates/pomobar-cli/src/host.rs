//! Terminal implementations of the host surfaces.
//!
//! `Human` output writes readable text (status line redrawn in place,
//! notices on stderr). `Json` output writes one JSON object per line on
//! stdout so another process (an editor extension, a bar widget) can drive
//! its own UI from it.

use std::io::Write;

use pomobar_core::{Command, Notice, Notifier, PanelSurface, PanelView, StatusSurface};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Human,
    Json,
}

fn emit(value: serde_json::Value) {
    let mut out = std::io::stdout().lock();
    // A closed pipe just means nobody is listening anymore.
    let _ = writeln!(out, "{value}");
    let _ = out.flush();
}

pub struct TerminalNotifier {
    output: Output,
}

impl TerminalNotifier {
    pub fn new(output: Output) -> Self {
        Self { output }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&mut self, notice: &Notice) {
        match self.output {
            Output::Human => match notice {
                Notice::Info { message } => eprintln!("{message}"),
                other => eprintln!("\n🔔 {}", other.message()),
            },
            Output::Json => emit(json!({
                "type": "notice",
                "notice": notice,
                "message": notice.message(),
            })),
        }
    }

    fn chime(&mut self) {
        match self.output {
            Output::Human => {
                eprint!("\x07");
            }
            Output::Json => emit(json!({ "type": "chime" })),
        }
    }
}

pub struct TerminalStatus {
    output: Output,
    last: Option<(String, String)>,
}

impl TerminalStatus {
    pub fn new(output: Output) -> Self {
        Self { output, last: None }
    }

    /// Leave the cursor on a fresh line.
    pub fn finish(&self) {
        if self.output == Output::Human && self.last.is_some() {
            println!();
        }
    }
}

impl StatusSurface for TerminalStatus {
    fn update(&mut self, text: &str, tooltip: &str) {
        let current = (text.to_string(), tooltip.to_string());
        if self.last.as_ref() == Some(&current) {
            return;
        }
        match self.output {
            Output::Human => {
                let mut out = std::io::stdout().lock();
                let _ = write!(out, "\r\x1b[2K{text}");
                let _ = out.flush();
            }
            Output::Json => emit(json!({
                "type": "status",
                "text": text,
                "tooltip": tooltip,
            })),
        }
        self.last = Some(current);
    }
}

pub struct TerminalPanel {
    output: Output,
    /// What was last printed in human mode, minus the countdown.
    shown: Option<String>,
}

impl TerminalPanel {
    pub fn new(output: Output) -> Self {
        Self {
            output,
            shown: None,
        }
    }
}

pub fn render_panel_text(view: &PanelView) -> String {
    let mut lines = vec![
        format!("── Pomodoro ─ {}", view.state_label),
        format!(
            "Completed: {}  Streak: {}",
            view.completed_count, view.consecutive_count
        ),
        format!(
            "Today: {} pomodoros, {} min",
            view.today.completed_count, view.today.total_work_minutes
        ),
        "Last 7 days:".to_string(),
    ];
    for day in &view.week {
        lines.push(format!(
            "  {}  {:>2} {}",
            day.date.format("%a %m-%d"),
            day.completed_count,
            "▇".repeat(day.completed_count.min(20) as usize)
        ));
    }
    lines.join("\n")
}

impl PanelSurface for TerminalPanel {
    fn render(&mut self, view: &PanelView) {
        match self.output {
            Output::Human => {
                // The countdown already ticks on the status line; only
                // print the panel when something else changed.
                let text = render_panel_text(view);
                if self.shown.as_deref() == Some(text.as_str()) {
                    return;
                }
                println!("\r\x1b[2K{text}");
                self.shown = Some(text);
            }
            Output::Json => emit(json!({ "type": "panel", "view": view })),
        }
    }

    fn reveal(&mut self) {
        match self.output {
            Output::Human => self.shown = None,
            Output::Json => emit(json!({ "type": "reveal" })),
        }
    }
}

pub fn print_menu(items: &[Command], output: Output) {
    match output {
        Output::Human => {
            println!();
            for item in items {
                println!("  {:<12} {}", item.name(), item.title());
            }
        }
        Output::Json => emit(json!({
            "type": "menu",
            "items": items
                .iter()
                .map(|c| json!({ "command": c, "title": c.title() }))
                .collect::<Vec<_>>(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pomobar_core::{DailyAggregate, TimerState};

    #[test]
    fn panel_text_lists_week() {
        let day = |d: u32, n: u32| DailyAggregate {
            date: NaiveDate::from_ymd_opt(2024, 5, d).unwrap(),
            completed_count: n,
            total_work_minutes: u64::from(n) * 25,
        };
        let view = PanelView {
            state: TimerState::Working,
            state_label: "Working".into(),
            countdown: "12:00".into(),
            progress: 0.5,
            completed_count: 3,
            consecutive_count: 1,
            today: day(7, 3),
            week: (1..=7).map(|d| day(d, if d == 7 { 3 } else { 0 })).collect(),
        };
        let text = render_panel_text(&view);
        assert!(text.starts_with("── Pomodoro ─ Working"));
        assert!(text.contains("Today: 3 pomodoros, 75 min"));
        assert_eq!(text.lines().count(), 4 + 7);
        assert!(text.lines().last().unwrap().ends_with("3 ▇▇▇"));
    }
}
