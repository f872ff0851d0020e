//! Completion reconciler.
//!
//! Decides, for a completion toggle, how `completed` / `completed_at` move
//! and whether the patch as a whole needs a persistence write. Event minting
//! and storage are left to the caller (`core::reminder`).
//!
//! One-time reminders: `Pending <-> Done`, transitions only when the current
//! flag differs from the requested one. Marking an already `Done` reminder
//! complete again keeps the first `completed_at`.
//!
//! Recurring reminders: `completed` stays `false`; `true` stamps
//! `completed_at = now` (always overwriting), `false` clears it.

use crate::models::{FieldUpdate, Reminder, ReminderPatch};
use chrono::{DateTime, Local};

/// Result of applying a patch to an in-memory reminder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    /// At least one field was applied; the reminder must be persisted.
    pub updated: bool,
    /// The requested completion value, when the patch carried one. Every such
    /// request is logged as a completion event, whether or not it changed
    /// anything.
    pub completion_requested: Option<bool>,
}

impl PatchOutcome {
    pub fn emits_event(&self) -> bool {
        self.completion_requested.is_some()
    }
}

/// Apply a completion request. Returns `true` when the reminder must be
/// written back.
pub fn reconcile(reminder: &mut Reminder, requested: bool, now: DateTime<Local>) -> bool {
    if reminder.is_recurring() {
        reminder.completed_at = requested.then_some(now);
        reminder.completed = false;
        return true;
    }

    match (reminder.completed, requested) {
        (false, true) => {
            reminder.completed = true;
            reminder.completed_at = Some(now);
            true
        }
        (true, false) => {
            reminder.completed = false;
            reminder.completed_at = None;
            true
        }
        _ => false,
    }
}

pub fn mark_complete(reminder: &mut Reminder, now: DateTime<Local>) -> bool {
    reconcile(reminder, true, now)
}

pub fn mark_incomplete(reminder: &mut Reminder, now: DateTime<Local>) -> bool {
    reconcile(reminder, false, now)
}

/// Apply every field of `patch` in order.
pub fn apply_patch(
    reminder: &mut Reminder,
    patch: &ReminderPatch,
    now: DateTime<Local>,
) -> PatchOutcome {
    let mut outcome = PatchOutcome::default();

    for update in patch.updates() {
        match update {
            FieldUpdate::Title(title) => {
                reminder.title = title;
                outcome.updated = true;
            }
            FieldUpdate::Description(description) => {
                reminder.description = description;
                outcome.updated = true;
            }
            FieldUpdate::DueDate(due) => {
                reminder.due_date = Some(due);
                outcome.updated = true;
            }
            FieldUpdate::Recurrence(recurrence) => {
                reminder.recurrence = recurrence;
                reminder.normalize_completion();
                outcome.updated = true;
            }
            FieldUpdate::FamilyMember(member) => {
                reminder.family_member = member;
                outcome.updated = true;
            }
            FieldUpdate::Completed(requested) => {
                if reconcile(reminder, requested, now) {
                    outcome.updated = true;
                }
                outcome.completion_requested = Some(requested);
            }
        }
    }

    outcome
}
