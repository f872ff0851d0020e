//! Sparse reminder update.
//!
//! Each field is `Some` only when the update carries it; building one from a
//! JSON body is `core::patch::parse_patch`.

use super::recurrence::RecurrencePattern;
use chrono::{DateTime, Local};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Local>>,
    pub completed: Option<bool>,
    pub recurrence: Option<RecurrencePattern>,
    pub family_member: Option<String>,
}

/// One applicable field of a patch.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Title(String),
    Description(String),
    DueDate(DateTime<Local>),
    Recurrence(RecurrencePattern),
    FamilyMember(String),
    Completed(bool),
}

impl ReminderPatch {
    pub fn completion(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.updates().is_empty()
    }

    /// Applicable fields in application order: `completed` comes last so it
    /// sees the final recurrence type and assignee.
    pub fn updates(&self) -> Vec<FieldUpdate> {
        let mut out = Vec::new();
        if let Some(t) = &self.title {
            out.push(FieldUpdate::Title(t.clone()));
        }
        if let Some(d) = &self.description {
            out.push(FieldUpdate::Description(d.clone()));
        }
        if let Some(due) = self.due_date {
            out.push(FieldUpdate::DueDate(due));
        }
        if let Some(r) = &self.recurrence {
            out.push(FieldUpdate::Recurrence(r.clone()));
        }
        if let Some(m) = &self.family_member {
            out.push(FieldUpdate::FamilyMember(m.clone()));
        }
        if let Some(c) = self.completed {
            out.push(FieldUpdate::Completed(c));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_is_applied_last() {
        let patch = ReminderPatch {
            completed: Some(true),
            family_member: Some("Bob".into()),
            title: Some("x".into()),
            ..Default::default()
        };
        let updates = patch.updates();
        assert_eq!(updates.len(), 3);
        assert_eq!(updates.last(), Some(&FieldUpdate::Completed(true)));
    }

    #[test]
    fn default_patch_is_empty() {
        assert!(ReminderPatch::default().is_empty());
        assert!(!ReminderPatch::completion(false).is_empty());
    }
}
