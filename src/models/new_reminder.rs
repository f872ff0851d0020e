//! Raw creation payloads, exactly as they arrive from the boundary.
//! Nothing here is validated; `core::validate` turns them into entities.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceInput {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewReminder {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub family_id: String,
    #[serde(default)]
    pub family_member: String,
    #[serde(default)]
    pub recurrence: RecurrenceInput,
}
