//! Sparse reminder updates from JSON bodies.
//!
//! A field is taken only when it has the expected type and, for dates and
//! recurrences, a value that parses. Unknown keys and malformed values are
//! dropped without error.

use super::validate::recurrence_from_input;
use crate::errors::{AppError, AppResult};
use crate::models::{RecurrenceInput, ReminderPatch};
use crate::utils::date::parse_timestamp;
use serde_json::Value;

/// Build a patch from a decoded JSON body. Only a non-object body is an
/// error.
pub fn parse_patch(body: &Value) -> AppResult<ReminderPatch> {
    let map = body
        .as_object()
        .ok_or_else(|| AppError::InvalidPayload("patch body must be a JSON object".into()))?;

    let mut patch = ReminderPatch::default();
    for (key, value) in map {
        match key.as_str() {
            "title" => patch.title = value.as_str().map(str::to_string),
            "description" => patch.description = value.as_str().map(str::to_string),
            "family_member" => patch.family_member = value.as_str().map(str::to_string),
            "completed" => patch.completed = value.as_bool(),
            "due_date" => {
                patch.due_date = value.as_str().and_then(|s| parse_timestamp(s).ok());
            }
            "recurrence" => {
                patch.recurrence = value
                    .is_object()
                    .then(|| serde_json::from_value::<RecurrenceInput>(value.clone()).ok())
                    .flatten()
                    .and_then(|input| recurrence_from_input(&input).ok());
            }
            other => log::debug!("ignoring unknown patch field '{}'", other),
        }
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecurrenceType;
    use serde_json::json;

    #[test]
    fn wrong_types_and_unknown_keys_are_ignored() {
        let patch = parse_patch(&json!({
            "title": 42,
            "completed": "yes",
            "due_date": "not a date",
            "color": "red"
        }))
        .unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn typed_fields_are_picked_up() {
        let patch = parse_patch(&json!({
            "title": "Bins",
            "completed": true,
            "due_date": "2025-03-01T08:30:00Z",
            "recurrence": {"type": "weekly", "days": ["Tuesday"]}
        }))
        .unwrap();
        assert_eq!(patch.title.as_deref(), Some("Bins"));
        assert_eq!(patch.completed, Some(true));
        assert!(patch.due_date.is_some());
        assert_eq!(patch.recurrence.unwrap().kind, RecurrenceType::Weekly);
    }

    #[test]
    fn invalid_recurrence_is_dropped() {
        let patch = parse_patch(&json!({
            "recurrence": {"type": "weekly", "days": []}
        }))
        .unwrap();
        assert!(patch.recurrence.is_none());
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = parse_patch(&json!(["completed"])).unwrap_err();
        assert!(matches!(err, AppError::InvalidPayload(_)));
    }
}
