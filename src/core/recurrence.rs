//! Recurrence evaluator.
//!
//! Pure functions over a reminder's [`RecurrencePattern`], the time-of-day
//! of its stored due date and a reference instant. Calendar days are local
//! days; no time zone other than the process-local one is considered.
//!
//! Recurring occurrences are computed at day granularity: the next
//! occurrence of a daily/weekly/monthly reminder is always on a calendar day
//! strictly after the reference day, at the stored time-of-day.
//!
//! A monthly `date` larger than the month's length is clamped to the last
//! day of that month (31 → Feb 28/29, Apr 30, ...), both for due checks and
//! for next-occurrence.

use crate::models::{RecurrencePattern, RecurrenceType, Reminder};
use crate::utils::date::{at_time, clamped_day_of_month, next_month};
use crate::utils::time::time_of_day;
use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveTime};

/// `true` once `reference` is strictly after the pattern's end date.
pub fn is_past_end(pattern: &RecurrencePattern, reference: &DateTime<Local>) -> bool {
    pattern
        .end_date
        .map(|end| *reference > end)
        .unwrap_or(false)
}

/// Whether the reminder has an occurrence on the local calendar day of
/// `reference`.
pub fn is_due_on(reminder: &Reminder, reference: DateTime<Local>) -> bool {
    let pattern = &reminder.recurrence;
    if is_past_end(pattern, &reference) {
        return false;
    }

    let day = reference.date_naive();
    match pattern.kind {
        RecurrenceType::Once => reminder
            .due_date
            .map(|due| due.date_naive() == day)
            .unwrap_or(false),
        RecurrenceType::Daily => true,
        RecurrenceType::Weekly => pattern.includes_weekday(day.weekday()),
        RecurrenceType::Monthly => monthly_day(pattern, day.year(), day.month())
            .map(|due| due == day)
            .unwrap_or(false),
    }
}

/// Day-level variant of [`is_due_on`] for callers holding a calendar date.
/// The reference instant is the start of that day.
pub fn is_due_on_day(reminder: &Reminder, day: NaiveDate) -> bool {
    match at_time(day, NaiveTime::MIN) {
        Some(reference) => is_due_on(reminder, reference),
        None => false,
    }
}

/// The first occurrence strictly after `after`, or `None` when the reminder
/// is exhausted (one-time and already past, or beyond its end date).
pub fn next_occurrence(reminder: &Reminder, after: DateTime<Local>) -> Option<DateTime<Local>> {
    let pattern = &reminder.recurrence;
    if is_past_end(pattern, &after) {
        return None;
    }

    let tod = time_of_day(reminder.due_date.as_ref());
    let after_day = after.date_naive();

    let candidate = match pattern.kind {
        RecurrenceType::Once => reminder.due_date.filter(|due| *due > after),
        RecurrenceType::Daily => after_day.succ_opt().and_then(|d| at_time(d, tod)),
        RecurrenceType::Weekly => next_weekly_day(pattern, after_day).and_then(|d| at_time(d, tod)),
        RecurrenceType::Monthly => {
            next_monthly_day(pattern, after_day).and_then(|d| at_time(d, tod))
        }
    }?;

    if is_past_end(pattern, &candidate) {
        return None;
    }
    Some(candidate)
}

/// Up to `limit` consecutive occurrences after `after`.
pub fn upcoming(reminder: &Reminder, after: DateTime<Local>, limit: usize) -> Vec<DateTime<Local>> {
    let mut out = Vec::new();
    let mut cursor = after;
    while out.len() < limit {
        match next_occurrence(reminder, cursor) {
            Some(next) => {
                out.push(next);
                cursor = next;
            }
            None => break,
        }
    }
    out
}

/// Scan the seven days following `after_day` for a listed weekday.
fn next_weekly_day(pattern: &RecurrencePattern, after_day: NaiveDate) -> Option<NaiveDate> {
    (1..=7u64)
        .filter_map(|offset| after_day.checked_add_days(Days::new(offset)))
        .find(|d| pattern.includes_weekday(d.weekday()))
}

/// This month's occurrence if it falls after `after_day`, otherwise next
/// month's.
fn next_monthly_day(pattern: &RecurrencePattern, after_day: NaiveDate) -> Option<NaiveDate> {
    let this_month = monthly_day(pattern, after_day.year(), after_day.month())?;
    if this_month > after_day {
        return Some(this_month);
    }
    let (year, month) = next_month(after_day.year(), after_day.month());
    monthly_day(pattern, year, month)
}

fn monthly_day(pattern: &RecurrencePattern, year: i32, month: u32) -> Option<NaiveDate> {
    match pattern.date {
        Some(d) if (1..=31).contains(&d) => clamped_day_of_month(year, month, d),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike, Weekday};

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).earliest().unwrap()
    }

    fn reminder(pattern: RecurrencePattern, due: Option<DateTime<Local>>) -> Reminder {
        Reminder::new("rem1", "t", "", due, "fam1", "Alice", pattern)
    }

    #[test]
    fn once_is_due_only_on_its_day() {
        let r = reminder(RecurrencePattern::once(), Some(local(2025, 5, 21, 10)));
        assert!(is_due_on(&r, local(2025, 5, 21, 23)));
        assert!(!is_due_on(&r, local(2025, 5, 20, 12)));
        assert!(!is_due_on(&r, local(2025, 5, 22, 12)));
    }

    #[test]
    fn once_without_due_date_is_never_due() {
        let r = reminder(RecurrencePattern::once(), None);
        assert!(!is_due_on(&r, local(2025, 5, 21, 12)));
        assert_eq!(next_occurrence(&r, local(2025, 5, 21, 12)), None);
    }

    #[test]
    fn weekday_match_is_case_insensitive_and_ignores_garbage() {
        let r = reminder(RecurrencePattern::weekly(&["MONDAY", "blursday"]), None);
        // 2025-06-02 is a Monday
        assert_eq!(local(2025, 6, 2, 12).weekday(), Weekday::Mon);
        assert!(is_due_on(&r, local(2025, 6, 2, 12)));
        assert!(!is_due_on(&r, local(2025, 6, 3, 12)));
    }

    #[test]
    fn weekly_next_skips_the_reference_day() {
        let r = reminder(
            RecurrencePattern::weekly(&["monday"]),
            Some(local(2025, 1, 1, 18)),
        );
        let next = next_occurrence(&r, local(2025, 6, 2, 6)).unwrap();
        assert_eq!(next.date_naive(), NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
        assert_eq!(next.hour(), 18);
    }

    #[test]
    fn monthly_clamps_to_month_end() {
        let r = reminder(RecurrencePattern::monthly(31), None);
        assert!(is_due_on(&r, local(2025, 2, 28, 12)));
        assert!(!is_due_on(&r, local(2025, 2, 27, 12)));
        assert!(is_due_on(&r, local(2024, 2, 29, 12)));
        assert!(is_due_on(&r, local(2025, 4, 30, 12)));

        let next = next_occurrence(&r, local(2025, 1, 31, 12)).unwrap();
        assert_eq!(next.date_naive(), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }

    #[test]
    fn daily_next_is_following_day_at_stored_time() {
        let r = reminder(RecurrencePattern::daily(), Some(local(2020, 1, 1, 7)));
        let next = next_occurrence(&r, local(2025, 12, 31, 22)).unwrap();
        assert_eq!(next.date_naive(), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(next.hour(), 7);
    }

    #[test]
    fn end_date_bounds_everything() {
        let pattern = RecurrencePattern::daily().until(local(2025, 3, 10, 12));
        let r = reminder(pattern, Some(local(2025, 1, 1, 20)));
        assert!(is_due_on(&r, local(2025, 3, 10, 9)));
        assert!(!is_due_on(&r, local(2025, 3, 10, 13)));
        assert!(!is_due_on(&r, local(2025, 3, 11, 9)));
        // 2025-03-10 20:00 would be past the bound
        assert_eq!(next_occurrence(&r, local(2025, 3, 9, 21)), None);
        assert_eq!(next_occurrence(&r, local(2025, 4, 1, 12)), None);
    }

    #[test]
    fn upcoming_stops_at_end_date() {
        let pattern = RecurrencePattern::weekly(&["saturday"]).until(local(2025, 6, 30, 0));
        let r = reminder(pattern, Some(local(2025, 1, 1, 9)));
        let dates = upcoming(&r, local(2025, 6, 1, 12), 10);
        assert_eq!(dates.len(), 4);
        assert!(dates.iter().all(|d| d.weekday() == Weekday::Sat));
    }

    #[test]
    fn upcoming_with_huge_limit_returns_what_exists() {
        let r = reminder(RecurrencePattern::once(), Some(local(2025, 6, 10, 9)));
        let dates = upcoming(&r, local(2025, 6, 1, 12), usize::MAX);
        assert_eq!(dates, vec![local(2025, 6, 10, 9)]);

        let bounded = RecurrencePattern::daily().until(local(2025, 6, 5, 23));
        let r = reminder(bounded, Some(local(2025, 1, 1, 9)));
        assert_eq!(upcoming(&r, local(2025, 6, 1, 12), usize::MAX).len(), 4);
    }
}
