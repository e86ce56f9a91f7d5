//! Date helpers for expiry inputs.
//!
//! Expiry is edited as a `YYYY-MM-DDTHH:MM` string in local time, the same
//! shape an HTML `datetime-local` input produces.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

const EDIT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Formats a timestamp as `YYYY-MM-DDTHH:MM` in its own time zone.
#[must_use]
pub fn format_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format(EDIT_FORMAT).to_string()
}

/// Formats an optional timestamp in local time; `None` formats as `""`.
#[must_use]
pub fn format_datetime_local(dt: Option<DateTime<Utc>>) -> String {
    dt.map(|dt| format_datetime(&dt.with_timezone(&Local)))
        .unwrap_or_default()
}

/// Moves a timestamp by whole days (negative values move back).
#[must_use]
pub fn add_days<Tz: TimeZone>(dt: DateTime<Tz>, days: i64) -> DateTime<Tz> {
    dt + Duration::days(days)
}

/// Returns the first instant of the day after `dt`, in the same time zone.
///
/// Returns `None` when that midnight does not exist locally (a DST gap).
#[must_use]
pub fn next_midnight<Tz: TimeZone>(dt: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let midnight = dt.date_naive().succ_opt()?.and_hms_opt(0, 0, 0)?;
    dt.timezone().from_local_datetime(&midnight).earliest()
}

/// Parses a user-supplied date or date-time.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (local time) and `YYYY-MM-DD`
/// (midnight UTC).
#[must_use]
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
