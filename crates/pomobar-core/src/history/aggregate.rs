use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::WorkIntervalRecord;

/// Length of the default rolling window.
pub const WEEK_DAYS: u32 = 7;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub completed_count: u32,
    pub total_work_minutes: u64,
}

impl DailyAggregate {
    pub(crate) fn collect(date: NaiveDate, records: &[WorkIntervalRecord]) -> Self {
        let (start, end) = day_bounds_ms(date);
        records
            .iter()
            .filter(|r| r.completed)
            .filter(|r| (start..end).contains(&(r.start_time as i64)))
            .fold(
                Self {
                    date,
                    completed_count: 0,
                    total_work_minutes: 0,
                },
                |mut acc, r| {
                    acc.completed_count += 1;
                    acc.total_work_minutes += r.duration_minutes;
                    acc
                },
            )
    }
}

/// All-time totals over the interval log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub completed_count: u64,
    pub total_work_minutes: u64,
    pub cancelled_count: u64,
}

impl Totals {
    pub(crate) fn collect(records: &[WorkIntervalRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            if r.completed {
                acc.completed_count += 1;
                acc.total_work_minutes += r.duration_minutes;
            } else {
                acc.cancelled_count += 1;
            }
            acc
        })
    }
}

/// `[dayStart, dayStart + 24h)` in epoch milliseconds for a local date.
///
/// When local midnight does not exist (DST gap) the first valid instant is
/// used; if the zone cannot resolve the date at all, UTC midnight is.
pub fn day_bounds_ms(date: NaiveDate) -> (i64, i64) {
    let midnight = date.and_time(NaiveTime::MIN);
    let start = Local
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            Local
                .from_local_datetime(&(midnight + chrono::Duration::hours(1)))
                .earliest()
        })
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| midnight.and_utc().timestamp_millis());
    (start, start + DAY_MS)
}

/// Local calendar date of an epoch-millisecond timestamp.
pub fn local_date(epoch_ms: u64) -> NaiveDate {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms as i64)
        .unwrap_or_default()
        .with_timezone(&Local)
        .date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_span_a_day() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let (start, end) = day_bounds_ms(date);
        assert_eq!(end - start, DAY_MS);
        assert_eq!(local_date(start as u64), date);
    }

    #[test]
    fn window_is_half_open() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let (start, end) = day_bounds_ms(date);
        let at = |ms: i64| WorkIntervalRecord {
            start_time: ms as u64,
            end_time: ms as u64,
            duration_minutes: 25,
            completed: true,
        };
        let records = [at(start), at(end - 1), at(end)];
        assert_eq!(DailyAggregate::collect(date, &records).completed_count, 2);
    }
}
