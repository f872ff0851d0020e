//! Creation-time validation.
//!
//! Everything here runs before an id is minted or anything is written, so a
//! rejected request leaves no partial state behind.

use crate::errors::{AppError, AppResult};
use crate::models::{Family, NewReminder, RecurrenceInput, RecurrencePattern, RecurrenceType};
use crate::utils::date::parse_optional_timestamp;
use chrono::{DateTime, Local};

/// Field-level result of validating a [`NewReminder`]; the family reference
/// is checked separately against storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedReminder {
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Local>>,
    pub family_id: String,
    pub family_member: String,
    pub recurrence: RecurrencePattern,
}

/// Turn a raw recurrence payload into a structurally valid pattern.
///
/// An empty type means `once`. Weekly needs a non-empty set of valid weekday
/// names, monthly a date in 1..=31, and `end_date`, when present, must be an
/// RFC 3339 timestamp.
pub fn recurrence_from_input(input: &RecurrenceInput) -> AppResult<RecurrencePattern> {
    let kind = RecurrenceType::rt_from_str(&input.kind).ok_or_else(|| {
        AppError::InvalidRecurrence(format!("invalid recurrence type '{}'", input.kind))
    })?;

    let date = match input.date {
        Some(d) if (0..=i64::from(u32::MAX)).contains(&d) => Some(d as u32),
        Some(d) if kind == RecurrenceType::Monthly => {
            return Err(AppError::InvalidRecurrence(format!(
                "monthly recurrence requires a date between 1 and 31, got {}",
                d
            )));
        }
        _ => None,
    };

    let end_date = parse_optional_timestamp(input.end_date.as_deref()).map_err(|_| {
        AppError::InvalidDate(format!(
            "invalid end_date format: {}",
            input.end_date.as_deref().unwrap_or("")
        ))
    })?;

    let pattern = RecurrencePattern {
        kind,
        days: input.days.clone(),
        date,
        end_date,
    };
    pattern.validate().map_err(AppError::InvalidRecurrence)?;
    Ok(pattern)
}

pub fn validate_new_reminder(req: &NewReminder) -> AppResult<ValidatedReminder> {
    let due_date = parse_optional_timestamp(req.due_date.as_deref()).map_err(|_| {
        AppError::InvalidDate(format!(
            "invalid due_date format: {}",
            req.due_date.as_deref().unwrap_or("")
        ))
    })?;

    if req.family_id.trim().is_empty() {
        return Err(AppError::MissingField("family_id".into()));
    }
    if req.family_member.trim().is_empty() {
        return Err(AppError::MissingField("family_member".into()));
    }

    let recurrence = recurrence_from_input(&req.recurrence)?;

    Ok(ValidatedReminder {
        title: req.title.clone(),
        description: req.description.clone(),
        due_date,
        family_id: req.family_id.clone(),
        family_member: req.family_member.clone(),
        recurrence,
    })
}

pub fn ensure_member(family: &Family, member: &str) -> AppResult<()> {
    if family.has_member(member) {
        Ok(())
    } else {
        Err(AppError::MemberNotFound(member.to_string()))
    }
}
