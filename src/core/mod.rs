pub mod completion;
pub mod event;
pub mod family;
pub mod ids;
pub mod patch;
pub mod recurrence;
pub mod reminder;
pub mod validate;

pub use event::EventLogic;
pub use family::FamilyLogic;
pub use reminder::{ReminderFilter, ReminderLogic};

use crate::errors::{AppError, AppResult};
use crate::storage::Storage;
use std::sync::{Arc, Mutex, MutexGuard};

/// The three operation groups over one store, sharing a single write gate
/// so that read-modify-write sequences never interleave.
pub struct Services {
    pub families: FamilyLogic,
    pub reminders: ReminderLogic,
    pub events: EventLogic,
}

impl Services {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        let gate = Arc::new(Mutex::new(()));
        Self {
            families: FamilyLogic::with_gate(store.clone(), gate.clone()),
            reminders: ReminderLogic::with_gate(store.clone(), gate.clone()),
            events: EventLogic::with_gate(store, gate),
        }
    }
}

pub(crate) fn write_gate(gate: &Mutex<()>) -> AppResult<MutexGuard<'_, ()>> {
    gate.lock()
        .map_err(|_| AppError::Storage("write gate poisoned".into()))
}
