use chrono::{DateTime, Local, Utc};

use super::WorkIntervalRecord;

const HEADER: &str = "start,end,duration(min),status";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Words used in the status column.
#[derive(Debug, Clone)]
pub struct ExportLabels {
    pub completed: String,
    pub cancelled: String,
}

impl Default for ExportLabels {
    fn default() -> Self {
        Self {
            completed: "completed".into(),
            cancelled: "cancelled".into(),
        }
    }
}

/// Header plus one comma-separated row per record, `\n` between rows and no
/// trailing newline. Timestamps are rendered in local time.
pub(crate) fn render(records: &[WorkIntervalRecord], labels: &ExportLabels) -> String {
    std::iter::once(HEADER.to_string())
        .chain(records.iter().map(|r| {
            format!(
                "{},{},{},{}",
                local_timestamp(r.start_time),
                local_timestamp(r.end_time),
                r.duration_minutes,
                if r.completed {
                    &labels.completed
                } else {
                    &labels.cancelled
                }
            )
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

fn local_timestamp(epoch_ms: u64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms as i64)
        .unwrap_or_default()
        .with_timezone(&Local)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}
