//! Date and time to serial number conversion

use chrono::{NaiveDate, NaiveDateTime, Timelike};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Serial number of `dt` in the 1900 or 1904 date system.
///
/// The 1900 system counts 1900-02-29 as a real day, so every date from
/// 1900-03-01 on is one higher than the plain day count.
pub fn datetime_to_serial(dt: NaiveDateTime, date_1904: bool) -> f64 {
    let date_serial = if date_1904 {
        days_since(dt.date(), 1904, 1, 1)
    } else {
        let days = days_since(dt.date(), 1899, 12, 31);
        if days > 59.0 {
            days + 1.0
        } else {
            days
        }
    };

    let time = dt.time();
    let seconds =
        time.num_seconds_from_midnight() as f64 + time.nanosecond() as f64 / 1_000_000_000.0;
    date_serial + seconds / SECONDS_PER_DAY
}

fn days_since(date: NaiveDate, year: i32, month: u32, day: u32) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN);
    date.signed_duration_since(epoch).num_days() as f64
}
