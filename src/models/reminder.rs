//! Reminder entity.
//!
//! # Invariants
//! - A recurring reminder (`recurrence.kind != Once`) never has
//!   `completed == true`; only `completed_at` tracks the current occurrence.
//! - A non-recurring reminder is either `Pending` (`completed == false`,
//!   `completed_at == None`) or `Done` (`completed == true`,
//!   `completed_at == Some(_)`).

use super::recurrence::RecurrencePattern;
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// For `once` the occurrence itself; for recurring patterns only the
    /// time-of-day is used.
    #[serde(default)]
    pub due_date: Option<DateTime<Local>>,
    #[serde(default)]
    pub recurrence: RecurrencePattern,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Local>>,
    pub family_id: String,
    pub family_member: String,
}

/// Completion state as seen through the reminder's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    Pending,
    Done(DateTime<Local>),
    /// Recurring reminder; holds the last time an occurrence was marked done.
    Recurring(Option<DateTime<Local>>),
}

impl Reminder {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: Option<DateTime<Local>>,
        family_id: impl Into<String>,
        family_member: impl Into<String>,
        recurrence: RecurrencePattern,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            due_date,
            recurrence,
            completed: false,
            completed_at: None,
            family_id: family_id.into(),
            family_member: family_member.into(),
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_recurring()
    }

    pub fn completion_state(&self) -> CompletionState {
        if self.is_recurring() {
            return CompletionState::Recurring(self.completed_at);
        }
        match (self.completed, self.completed_at) {
            (true, Some(at)) => CompletionState::Done(at),
            _ => CompletionState::Pending,
        }
    }

    /// Whether the occurrence on `day` counts as done.
    ///
    /// One-time reminders look at `completed`; recurring ones require
    /// `completed_at` to fall on the same local calendar day.
    pub fn is_done_on(&self, day: NaiveDate) -> bool {
        if self.is_recurring() {
            self.completed_at
                .map(|at| at.date_naive() == day)
                .unwrap_or(false)
        } else {
            self.completed
        }
    }

    /// Pin the fields back into a legal state after the recurrence changed.
    /// A reminder that became recurring drops `completed`; one that became
    /// one-time keeps `completed_at` only together with `completed`.
    pub fn normalize_completion(&mut self) {
        if self.is_recurring() {
            self.completed = false;
        } else if !self.completed {
            self.completed_at = None;
        } else if self.completed_at.is_none() {
            self.completed = false;
        }
    }
}
