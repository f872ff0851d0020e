//! Reminder operations: validated creation, due-day listing, patches with
//! completion events.

use super::completion::apply_patch;
use super::ids::mint_id;
use super::recurrence::{is_due_on_day, next_occurrence, upcoming};
use super::validate::{ensure_member, validate_new_reminder};
use super::write_gate;
use crate::errors::{AppError, AppResult};
use crate::models::{CompletionEvent, NewReminder, Reminder, ReminderPatch};
use crate::storage::{CounterKind, Storage};
use chrono::{DateTime, Local, NaiveDate};
use std::sync::{Arc, Mutex};

/// Optional narrowing for [`ReminderLogic::list_due_on`].
#[derive(Debug, Clone, Default)]
pub struct ReminderFilter {
    pub family_id: Option<String>,
    pub family_member: Option<String>,
    /// Drop reminders whose occurrence on the listed day is already done.
    pub pending_only: bool,
}

impl ReminderFilter {
    pub fn matches(&self, r: &Reminder) -> bool {
        self.family_id.as_deref().is_none_or(|f| r.family_id == f)
            && self
                .family_member
                .as_deref()
                .is_none_or(|m| r.family_member == m)
    }
}

pub struct ReminderLogic {
    store: Arc<dyn Storage>,
    gate: Arc<Mutex<()>>,
}

impl ReminderLogic {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self::with_gate(store, Arc::new(Mutex::new(())))
    }

    pub fn with_gate(store: Arc<dyn Storage>, gate: Arc<Mutex<()>>) -> Self {
        Self { store, gate }
    }

    /// Validate and persist a new reminder.
    ///
    /// Field checks run first, then the family reference; the id is minted
    /// only once everything passed.
    pub fn create(&self, req: &NewReminder) -> AppResult<Reminder> {
        let v = validate_new_reminder(req)?;

        let _g = write_gate(&self.gate)?;
        let family = self.store.get_family(&v.family_id).map_err(|e| {
            if e.is_not_found() {
                AppError::FamilyNotFound(v.family_id.clone())
            } else {
                e
            }
        })?;
        ensure_member(&family, &v.family_member)?;

        let id = mint_id(self.store.as_ref(), CounterKind::Reminder)?;
        let reminder = Reminder::new(
            id,
            v.title,
            v.description,
            v.due_date,
            v.family_id,
            v.family_member,
            v.recurrence,
        );
        self.store.create_reminder(&reminder)?;

        log::info!(
            "created reminder {} ({}) for {}/{}",
            reminder.id,
            reminder.recurrence.kind.to_db_str(),
            reminder.family_id,
            reminder.family_member
        );
        Ok(reminder)
    }

    pub fn get(&self, id: &str) -> AppResult<Reminder> {
        self.store.get_reminder(id)
    }

    pub fn list(&self) -> AppResult<Vec<Reminder>> {
        self.store.list_reminders()
    }

    /// Completion events of the reminder are kept.
    pub fn delete(&self, id: &str) -> AppResult<()> {
        let _g = write_gate(&self.gate)?;
        self.store.delete_reminder(id)?;
        log::info!("deleted reminder {}", id);
        Ok(())
    }

    /// Reminders with an occurrence on `day`.
    pub fn list_due_on(
        &self,
        day: NaiveDate,
        filter: &ReminderFilter,
    ) -> AppResult<Vec<Reminder>> {
        Ok(self
            .store
            .list_reminders()?
            .into_iter()
            .filter(|r| filter.matches(r) && is_due_on_day(r, day))
            .filter(|r| !filter.pending_only || !r.is_done_on(day))
            .collect())
    }

    pub fn next_occurrence(
        &self,
        id: &str,
        after: DateTime<Local>,
    ) -> AppResult<Option<DateTime<Local>>> {
        let reminder = self.store.get_reminder(id)?;
        Ok(next_occurrence(&reminder, after))
    }

    /// Up to `limit` consecutive occurrences after `after`.
    pub fn upcoming(
        &self,
        id: &str,
        after: DateTime<Local>,
        limit: usize,
    ) -> AppResult<Vec<DateTime<Local>>> {
        let reminder = self.store.get_reminder(id)?;
        Ok(upcoming(&reminder, after, limit))
    }

    pub fn patch(&self, id: &str, patch: &ReminderPatch) -> AppResult<Reminder> {
        self.patch_at(id, patch, Local::now())
    }

    /// Apply `patch` as of `now`.
    ///
    /// A patch carrying `completed` always appends a completion event
    /// credited to the (possibly just reassigned) family member, even when
    /// the flag did not change. The reminder is written only if some field
    /// was applied; a failure part-way leaves earlier writes in place.
    pub fn patch_at(
        &self,
        id: &str,
        patch: &ReminderPatch,
        now: DateTime<Local>,
    ) -> AppResult<Reminder> {
        let _g = write_gate(&self.gate)?;
        let mut reminder = self.store.get_reminder(id)?;

        let outcome = apply_patch(&mut reminder, patch, now);

        if outcome.emits_event() {
            let event_id = mint_id(self.store.as_ref(), CounterKind::CompletionEvent)?;
            let event =
                CompletionEvent::new(event_id, &reminder.id, &reminder.family_member, now);
            self.store.create_completion_event(&event)?;
            log::info!(
                "completion event {} for {} by {}",
                event.id,
                reminder.id,
                event.completed_by
            );
        }

        if outcome.updated {
            self.store.create_reminder(&reminder)?;
            log::info!("patched reminder {}", reminder.id);
        } else {
            log::debug!("patch of {} changed nothing", reminder.id);
        }

        Ok(reminder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FamilyLogic;
    use crate::models::RecurrenceInput;
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;

    fn setup() -> (Arc<dyn Storage>, ReminderLogic) {
        let store: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        FamilyLogic::new(store.clone())
            .create("Smith", &["Alice".into(), "Bob".into()])
            .unwrap();
        (store.clone(), ReminderLogic::new(store))
    }

    fn request(kind: &str) -> NewReminder {
        NewReminder {
            title: "Trash".into(),
            family_id: "fam1".into(),
            family_member: "Alice".into(),
            recurrence: RecurrenceInput {
                kind: kind.into(),
                days: vec!["monday".into()],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn unknown_family_and_member_are_rejected_without_minting() {
        let (store, logic) = setup();

        let mut req = request("weekly");
        req.family_id = "fam9".into();
        assert!(matches!(
            logic.create(&req).unwrap_err(),
            AppError::FamilyNotFound(_)
        ));

        let mut req = request("weekly");
        req.family_member = "Carol".into();
        assert!(matches!(
            logic.create(&req).unwrap_err(),
            AppError::MemberNotFound(_)
        ));

        assert_eq!(store.get_counter(CounterKind::Reminder).unwrap(), 0);
        assert!(logic.list().unwrap().is_empty());
    }

    #[test]
    fn empty_patch_writes_nothing() {
        let (_, logic) = setup();
        let r = logic.create(&request("weekly")).unwrap();
        let after = logic.patch(&r.id, &ReminderPatch::default()).unwrap();
        assert_eq!(after, r);
    }

    #[test]
    fn completion_event_credits_reassigned_member() {
        let (store, logic) = setup();
        let r = logic.create(&request("weekly")).unwrap();

        let patch = ReminderPatch {
            family_member: Some("Bob".into()),
            completed: Some(true),
            ..Default::default()
        };
        let now = Local.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).earliest().unwrap();
        logic.patch_at(&r.id, &patch, now).unwrap();

        let events = store.list_completion_events(&r.id).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].completed_by, "Bob");
        assert_eq!(events[0].completed_at, now);
    }

    #[test]
    fn due_listing_honors_filters() {
        let (_, logic) = setup();
        logic.create(&request("weekly")).unwrap();
        let mut daily = request("daily");
        daily.family_member = "Bob".into();
        logic.create(&daily).unwrap();

        let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();

        let all = ReminderFilter::default();
        assert_eq!(logic.list_due_on(monday, &all).unwrap().len(), 2);
        assert_eq!(logic.list_due_on(tuesday, &all).unwrap().len(), 1);

        let only_alice = ReminderFilter {
            family_member: Some("Alice".into()),
            ..Default::default()
        };
        let due = logic.list_due_on(monday, &only_alice).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].title, "Trash");
    }

    #[test]
    fn pending_filter_hides_occurrences_done_that_day() {
        let (_, logic) = setup();
        let r = logic.create(&request("weekly")).unwrap();

        let monday = Local.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).earliest().unwrap();
        logic
            .patch_at(&r.id, &ReminderPatch::completion(true), monday)
            .unwrap();

        let pending = ReminderFilter {
            pending_only: true,
            ..Default::default()
        };
        assert!(logic.list_due_on(monday.date_naive(), &pending).unwrap().is_empty());

        // next Monday is a fresh occurrence
        let next = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        assert_eq!(logic.list_due_on(next, &pending).unwrap().len(), 1);
    }
}
