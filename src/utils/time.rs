//! Time-of-day utilities: the wall-clock component recurring reminders borrow
//! from their stored due date.

use chrono::{DateTime, Local, NaiveTime, Timelike};

/// Wall-clock time (hour/minute/second) of a stored due date, or midnight
/// when the reminder has none.
pub fn time_of_day(due: Option<&DateTime<Local>>) -> NaiveTime {
    due.and_then(|d| NaiveTime::from_hms_opt(d.hour(), d.minute(), d.second()))
        .unwrap_or(NaiveTime::MIN)
}
