//! Work interval history.
//!
//! The log lives under a single store key as a JSON array, appended with a
//! read-modify-write of the whole collection. All operations are
//! best-effort: read failures look like an empty log and write failures are
//! logged and dropped.

mod aggregate;
mod export;

pub use aggregate::{day_bounds_ms, local_date, DailyAggregate, Totals, WEEK_DAYS};
pub use export::ExportLabels;

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::storage::kv::{self, KeyValueStore};
use crate::timer::TIMER_STATE_KEY;

/// Store key under which the work interval log is kept.
pub const RECORDS_KEY: &str = "pomodoroRecords";

/// One finished (or, when configured, cancelled) work interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkIntervalRecord {
    /// Epoch milliseconds.
    pub start_time: u64,
    /// Epoch milliseconds.
    pub end_time: u64,
    pub duration_minutes: u64,
    /// True only if the interval ran to zero without cancellation.
    pub completed: bool,
}

/// Read/append access to the interval log in a key-value store.
pub struct HistoryRecorder<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> HistoryRecorder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Append a record. Never fails; problems are logged.
    pub fn record_interval(&self, record: WorkIntervalRecord) {
        // A failed read must not be mistaken for an empty log, or the append
        // would overwrite everything recorded so far.
        let mut records = match kv::load::<Vec<WorkIntervalRecord>, _>(self.store, RECORDS_KEY) {
            Ok(records) => records.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "history unreadable, dropping interval record");
                return;
            }
        };
        records.push(record);
        match kv::save(self.store, RECORDS_KEY, &records) {
            Ok(()) => tracing::debug!(count = records.len(), "recorded work interval"),
            Err(e) => tracing::warn!(error = %e, "failed to persist interval record"),
        }
    }

    /// The full ordered log; empty if the store is empty or unreadable.
    pub fn intervals(&self) -> Vec<WorkIntervalRecord> {
        match kv::load::<Vec<WorkIntervalRecord>, _>(self.store, RECORDS_KEY) {
            Ok(records) => records.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read history");
                Vec::new()
            }
        }
    }

    /// Completed intervals that started on `date` (local time).
    pub fn daily_aggregate(&self, date: NaiveDate) -> DailyAggregate {
        DailyAggregate::collect(date, &self.intervals())
    }

    /// Aggregate for the local calendar day containing `now_ms`.
    pub fn today(&self, now_ms: u64) -> DailyAggregate {
        self.daily_aggregate(local_date(now_ms))
    }

    /// `days` per-day aggregates ending today, oldest first.
    pub fn rolling_window(&self, days: u32) -> Vec<DailyAggregate> {
        self.rolling_window_ending(Local::now().date_naive(), days)
    }

    /// `days` per-day aggregates ending at `last` inclusive, oldest first.
    /// Days without activity are zero-filled.
    pub fn rolling_window_ending(&self, last: NaiveDate, days: u32) -> Vec<DailyAggregate> {
        let records = self.intervals();
        (0..days)
            .rev()
            .map(|back| {
                let date = last
                    .checked_sub_days(Days::new(u64::from(back)))
                    .unwrap_or(NaiveDate::MIN);
                DailyAggregate::collect(date, &records)
            })
            .collect()
    }

    /// All-time totals over the whole log.
    pub fn all_time_totals(&self) -> Totals {
        Totals::collect(&self.intervals())
    }

    /// Delimited text report of the whole log with the default labels.
    pub fn export_delimited(&self) -> String {
        self.export_delimited_with(&ExportLabels::default())
    }

    pub fn export_delimited_with(&self, labels: &ExportLabels) -> String {
        export::render(&self.intervals(), labels)
    }

    /// Delete the interval log and any persisted timer snapshot.
    pub fn clear_all(&self) {
        for key in [RECORDS_KEY, TIMER_STATE_KEY] {
            if let Err(e) = self.store.delete(key) {
                tracing::warn!(key, error = %e, "failed to clear stored data");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;
    use serde_json::{json, Value};

    fn ms(date: NaiveDate, hour: u32) -> u64 {
        Local
            .from_local_datetime(&date.and_hms_opt(hour, 0, 0).unwrap())
            .earliest()
            .unwrap()
            .timestamp_millis() as u64
    }

    fn record(start: u64, minutes: u64, completed: bool) -> WorkIntervalRecord {
        WorkIntervalRecord {
            start_time: start,
            end_time: start + minutes * 60_000,
            duration_minutes: minutes,
            completed,
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
        fn set(&self, _key: &str, _value: &Value) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
        fn delete(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
    }

    #[test]
    fn record_appends_in_order() {
        let store = MemoryStore::new();
        let history = HistoryRecorder::new(&store);
        assert!(history.intervals().is_empty());

        history.record_interval(record(1_000, 25, true));
        history.record_interval(record(2_000, 25, true));
        let all = history.intervals();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].start_time, 1_000);
        assert_eq!(all[1].start_time, 2_000);
    }

    #[test]
    fn records_use_camel_case_keys() {
        let store = MemoryStore::new();
        HistoryRecorder::new(&store).record_interval(record(1, 25, true));
        assert_eq!(
            store.get(RECORDS_KEY).unwrap(),
            Some(json!([{
                "startTime": 1,
                "endTime": 1 + 25 * 60_000,
                "durationMinutes": 25,
                "completed": true
            }]))
        );
    }

    #[test]
    fn broken_store_is_swallowed() {
        let history = HistoryRecorder::new(&BrokenStore);
        history.record_interval(record(1, 25, true));
        assert!(history.intervals().is_empty());
        assert_eq!(history.all_time_totals(), Totals::default());
        history.clear_all();
    }

    #[test]
    fn unreadable_log_is_not_overwritten() {
        let store = MemoryStore::new();
        store.set(RECORDS_KEY, &json!("garbage")).unwrap();
        HistoryRecorder::new(&store).record_interval(record(1, 25, true));
        assert_eq!(store.get(RECORDS_KEY).unwrap(), Some(json!("garbage")));
    }

    #[test]
    fn daily_aggregate_counts_completed_only() {
        let store = MemoryStore::new();
        let history = HistoryRecorder::new(&store);
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let next = day.succ_opt().unwrap();

        history.record_interval(record(ms(day, 9), 25, true));
        history.record_interval(record(ms(day, 10), 50, true));
        history.record_interval(record(ms(day, 11), 10, false));
        history.record_interval(record(ms(next, 0), 25, true));

        let agg = history.daily_aggregate(day);
        assert_eq!(agg.date, day);
        assert_eq!(agg.completed_count, 2);
        assert_eq!(agg.total_work_minutes, 75);
        assert_eq!(history.daily_aggregate(next).completed_count, 1);
    }

    #[test]
    fn rolling_window_is_zero_filled_oldest_first() {
        let store = MemoryStore::new();
        let history = HistoryRecorder::new(&store);
        let last = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let three_back = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        history.record_interval(record(ms(three_back, 12), 25, true));
        history.record_interval(record(ms(last, 8), 25, true));

        let week = history.rolling_window_ending(last, WEEK_DAYS);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(week[6].date, last);
        assert_eq!(week[3].completed_count, 1);
        assert_eq!(week[6].completed_count, 1);
        let total: u32 = week.iter().map(|d| d.completed_count).sum();
        assert_eq!(total, 2);
        assert!(week.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn rolling_window_today_has_seven_entries() {
        let store = MemoryStore::new();
        let week = HistoryRecorder::new(&store).rolling_window(WEEK_DAYS);
        assert_eq!(week.len(), 7);
        assert_eq!(week[6].date, Local::now().date_naive());
        assert!(week.iter().all(|d| d.completed_count == 0));
    }

    #[test]
    fn clear_all_removes_log_and_snapshot() {
        let store = MemoryStore::new();
        let history = HistoryRecorder::new(&store);
        history.record_interval(record(1, 25, true));
        store.set(TIMER_STATE_KEY, &json!({"state": "working"})).unwrap();

        history.clear_all();
        assert!(!store.contains(RECORDS_KEY));
        assert!(!store.contains(TIMER_STATE_KEY));
        assert!(history.intervals().is_empty());
    }

    #[test]
    fn totals_split_completed_and_cancelled() {
        let store = MemoryStore::new();
        let history = HistoryRecorder::new(&store);
        history.record_interval(record(1, 25, true));
        history.record_interval(record(2, 25, true));
        history.record_interval(record(3, 7, false));
        assert_eq!(
            history.all_time_totals(),
            Totals {
                completed_count: 2,
                total_work_minutes: 50,
                cancelled_count: 1,
            }
        );
    }
}
