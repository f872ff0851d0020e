use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Append-only audit record of one completion action.
///
/// Independent of the reminder's own `completed` / `completed_at` fields:
/// a reminder can accumulate any number of events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub id: String,
    pub reminder_id: String,
    pub completed_at: DateTime<Local>,
    pub completed_by: String,
}

impl CompletionEvent {
    pub fn new(
        id: impl Into<String>,
        reminder_id: impl Into<String>,
        completed_by: impl Into<String>,
        completed_at: DateTime<Local>,
    ) -> Self {
        Self {
            id: id.into(),
            reminder_id: reminder_id.into(),
            completed_at,
            completed_by: completed_by.into(),
        }
    }
}
