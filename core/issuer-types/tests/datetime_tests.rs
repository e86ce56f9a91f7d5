use chrono::{FixedOffset, TimeZone, Timelike, Utc};
use issuer_types::datetime::{
    add_days, format_datetime, format_datetime_local, next_midnight, parse_datetime,
};

#[test]
fn format_datetime_uses_edit_shape() {
    let dt = Utc.with_ymd_and_hms(2030, 3, 7, 9, 5, 59).unwrap();
    assert_eq!(format_datetime(&dt), "2030-03-07T09:05");
}

#[test]
fn format_absent_datetime_is_empty() {
    assert_eq!(format_datetime_local(None), "");
}

#[test]
fn add_days_moves_forward_and_back() {
    let dt = Utc.with_ymd_and_hms(2030, 2, 27, 12, 0, 0).unwrap();
    assert_eq!(add_days(dt, 2), Utc.with_ymd_and_hms(2030, 3, 1, 12, 0, 0).unwrap());
    assert_eq!(add_days(dt, -27), Utc.with_ymd_and_hms(2030, 1, 31, 12, 0, 0).unwrap());
}

#[test]
fn next_midnight_is_start_of_following_day() {
    let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    let dt = tz.with_ymd_and_hms(2030, 12, 31, 23, 59, 30).unwrap();
    let midnight = next_midnight(&dt).unwrap();
    assert_eq!(midnight, tz.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(midnight.hour(), 0);
    assert_eq!(midnight.second(), 0);
}

#[test]
fn parse_rfc3339() {
    assert_eq!(
        parse_datetime("2030-01-01T10:00:00+02:00"),
        Some(Utc.with_ymd_and_hms(2030, 1, 1, 8, 0, 0).unwrap())
    );
}

#[test]
fn parse_date_only_is_utc_midnight() {
    assert_eq!(
        parse_datetime("2030-05-06"),
        Some(Utc.with_ymd_and_hms(2030, 5, 6, 0, 0, 0).unwrap())
    );
}

#[test]
fn parse_edit_shape() {
    assert!(parse_datetime("2030-05-06T14:30").is_some());
    assert!(parse_datetime("2030-05-06T14:30:15").is_some());
}

#[test]
fn parse_rejects_garbage() {
    assert!(parse_datetime("").is_none());
    assert!(parse_datetime("tomorrow").is_none());
    assert!(parse_datetime("2030-13-01").is_none());
}

#[test]
fn format_then_parse_local_keeps_minutes() {
    let dt = Utc.with_ymd_and_hms(2030, 7, 1, 8, 45, 0).unwrap();
    let formatted = format_datetime_local(Some(dt));
    assert_eq!(parse_datetime(&formatted), Some(dt));
}
