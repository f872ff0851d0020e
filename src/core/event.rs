use super::ids::mint_id;
use super::write_gate;
use crate::errors::{AppError, AppResult};
use crate::models::CompletionEvent;
use crate::storage::{CounterKind, Storage};
use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex};

/// Direct access to the completion audit log.
///
/// Events created here are independent of the reminder's own completion
/// fields; the reminder is not touched.
pub struct EventLogic {
    store: Arc<dyn Storage>,
    gate: Arc<Mutex<()>>,
}

impl EventLogic {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self::with_gate(store, Arc::new(Mutex::new(())))
    }

    pub fn with_gate(store: Arc<dyn Storage>, gate: Arc<Mutex<()>>) -> Self {
        Self { store, gate }
    }

    /// Record a completion. `completed_at` defaults to now.
    pub fn create(
        &self,
        reminder_id: &str,
        completed_by: &str,
        completed_at: Option<DateTime<Local>>,
    ) -> AppResult<CompletionEvent> {
        if reminder_id.trim().is_empty() {
            return Err(AppError::MissingField("reminder_id".into()));
        }
        if completed_by.trim().is_empty() {
            return Err(AppError::MissingField("completed_by".into()));
        }

        let _g = write_gate(&self.gate)?;
        let id = mint_id(self.store.as_ref(), CounterKind::CompletionEvent)?;
        let event = CompletionEvent::new(
            id,
            reminder_id,
            completed_by,
            completed_at.unwrap_or_else(Local::now),
        );
        self.store.create_completion_event(&event)?;

        log::info!("created completion event {} for {}", event.id, reminder_id);
        Ok(event)
    }

    pub fn get(&self, id: &str) -> AppResult<CompletionEvent> {
        self.store.get_completion_event(id)
    }

    pub fn list(&self, reminder_id: &str) -> AppResult<Vec<CompletionEvent>> {
        self.store.list_completion_events(reminder_id)
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        let _g = write_gate(&self.gate)?;
        self.store.delete_completion_event(id)?;
        log::info!("deleted completion event {}", id);
        Ok(())
    }
}
