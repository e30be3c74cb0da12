//! Calendar arithmetic shared by the extractor and the trainer.

use chrono::{DateTime, Utc};

/// Milliseconds in one hour.
pub const MS_PER_HOUR: i64 = 3_600_000;

/// Milliseconds in one day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// ISO day of week (Monday = 1 .. Sunday = 7) for an epoch-ms timestamp.
///
/// The Unix epoch fell on a Thursday (ISO day 4), so the weekday follows
/// from whole days since the epoch without going through a datetime.
pub fn iso_weekday_of_ms(ts_ms: i64) -> u8 {
    let days = ts_ms.div_euclid(MS_PER_DAY);
    ((days + 3).rem_euclid(7) + 1) as u8
}

/// Saturday and Sunday count as the weekend.
pub fn is_weekend(dow: u8) -> bool {
    dow == 6 || dow == 7
}

/// UTC datetime for an epoch-ms timestamp, when it is representable.
pub fn utc_from_ms(ts_ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ts_ms)
}

/// Second-resolution ISO rendering used in stage-2 rows.
pub fn iso_compact(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S").to_string()
}
