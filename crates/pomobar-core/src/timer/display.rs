//! Text shown on the status surface. Everything here is a pure function of
//! engine state.

use super::engine::TimerEngine;
use super::settings::TimerSettings;
use super::state::TimerState;
use crate::history::DailyAggregate;

pub fn glyph(state: TimerState) -> &'static str {
    match state {
        TimerState::Idle | TimerState::Working => "🍅",
        TimerState::ShortBreak => "☕",
        TimerState::LongBreak => "🌴",
        TimerState::Paused => "⏸",
    }
}

/// `MM:SS`. Minutes are not wrapped at 60.
pub fn format_countdown(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Single-line status text, e.g. `🍅 24:59`. While idle the configured work
/// length is shown.
pub fn status_text(engine: &TimerEngine, settings: &TimerSettings) -> String {
    let secs = match engine.state() {
        TimerState::Idle => settings.work_secs(),
        _ => engine.remaining_secs(),
    };
    format!("{} {}", glyph(engine.state()), format_countdown(secs))
}

/// Human-readable state label. A pause names what it paused.
pub fn state_label(engine: &TimerEngine) -> String {
    match engine.state() {
        TimerState::Paused => format!("Paused ({})", engine.effective_state()),
        other => other.label().to_string(),
    }
}

pub fn tooltip(engine: &TimerEngine, today: &DailyAggregate) -> String {
    let mut lines = vec![
        format!(
            "Today: {} pomodoro{} ({} min)",
            today.completed_count,
            if today.completed_count == 1 { "" } else { "s" },
            today.total_work_minutes
        ),
        format!("Streak: {}", engine.consecutive_count()),
    ];
    if engine.state() != TimerState::Idle {
        lines.push(format!(
            "{}: {} remaining",
            state_label(engine),
            format_countdown(engine.remaining_secs())
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn today(count: u32, minutes: u64) -> DailyAggregate {
        DailyAggregate {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            completed_count: count,
            total_work_minutes: minutes,
        }
    }

    #[test]
    fn countdown_format() {
        assert_eq!(format_countdown(0), "00:00");
        assert_eq!(format_countdown(59), "00:59");
        assert_eq!(format_countdown(25 * 60), "25:00");
        assert_eq!(format_countdown(90 * 60 + 5), "90:05");
    }

    #[test]
    fn idle_status_shows_work_length() {
        let engine = TimerEngine::new();
        let s = TimerSettings::default();
        assert_eq!(status_text(&engine, &s), "🍅 25:00");
    }

    #[test]
    fn paused_label_names_prior_state() {
        let s = TimerSettings::default();
        let mut engine = TimerEngine::new();
        engine.start_work(&s, 0).unwrap();
        engine.pause(0).unwrap();
        assert_eq!(state_label(&engine), "Paused (Working)");
        assert_eq!(status_text(&engine, &s), "⏸ 25:00");
    }

    #[test]
    fn tooltip_idle_omits_state_line() {
        let engine = TimerEngine::new();
        let text = tooltip(&engine, &today(1, 25));
        assert_eq!(text, "Today: 1 pomodoro (25 min)\nStreak: 0");
    }

    #[test]
    fn tooltip_running_includes_remaining() {
        let s = TimerSettings::default();
        let mut engine = TimerEngine::new();
        engine.start_work(&s, 0).unwrap();
        let text = tooltip(&engine, &today(2, 50));
        assert!(text.starts_with("Today: 2 pomodoros (50 min)"));
        assert!(text.ends_with("Working: 25:00 remaining"));
    }
}
