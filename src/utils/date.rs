//! Date helpers: parsing of calendar days and RFC 3339 timestamps, month
//! arithmetic and naive → local conversion.

use crate::errors::{AppError, AppResult};
use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone,
};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Strict RFC 3339 parse, the format accepted on every input boundary.
pub fn parse_timestamp(s: &str) -> AppResult<DateTime<Local>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|_| AppError::InvalidDate(s.to_string()))
}

/// Empty or blank strings mean "absent".
pub fn parse_optional_timestamp(s: Option<&str>) -> AppResult<Option<DateTime<Local>>> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_timestamp(v).map(Some),
    }
}

/// Lenient parse used when reading back persisted values written by older
/// versions: RFC 3339 first, then a few naive layouts taken as local time.
pub fn parse_stored_timestamp(s: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ") {
        return Some(naive.and_utc().with_timezone(&Local));
    }

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .and_then(local_from_naive)
}

pub fn format_timestamp(dt: &DateTime<Local>) -> String {
    dt.to_rfc3339()
}

/// Resolve a wall-clock time to a local instant.
/// Ambiguous times (DST fall-back) take the earlier instant; times inside a
/// DST gap are pushed forward by one hour.
pub fn local_from_naive(naive: NaiveDateTime) -> Option<DateTime<Local>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(early, _) => Some(early),
        LocalResult::None => Local
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest(),
    }
}

pub fn at_time(day: NaiveDate, time: NaiveTime) -> Option<DateTime<Local>> {
    local_from_naive(day.and_time(time))
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Day `day` of the given month, clamped to the month's last day.
pub fn clamped_day_of_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = days_in_month(year, month);
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, last))
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}
