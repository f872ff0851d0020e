//! In-memory storage: id-keyed maps behind one mutex.

use super::{CounterKind, Storage, id_sort_key};
use crate::errors::{AppError, AppResult};
use crate::models::{CompletionEvent, Family, Reminder};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    families: HashMap<String, Family>,
    reminders: HashMap<String, Reminder>,
    completion_events: HashMap<String, CompletionEvent>,
    counters: HashMap<CounterKind, i64>,
}

#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| AppError::Storage("memory storage lock poisoned".into()))
    }
}

fn sorted_by_id<T: Clone>(values: impl Iterator<Item = T>, id: impl Fn(&T) -> &str) -> Vec<T> {
    let mut out: Vec<T> = values.collect();
    out.sort_by_key(|v| id_sort_key(id(v)));
    out
}

impl Storage for MemoryStorage {
    fn create_family(&self, family: &Family) -> AppResult<()> {
        self.lock()?
            .families
            .insert(family.id.clone(), family.clone());
        Ok(())
    }

    fn get_family(&self, id: &str) -> AppResult<Family> {
        self.lock()?
            .families
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("family", id))
    }

    fn list_families(&self) -> AppResult<Vec<Family>> {
        let inner = self.lock()?;
        Ok(sorted_by_id(inner.families.values().cloned(), |f| f.id.as_str()))
    }

    fn delete_family(&self, id: &str) -> AppResult<()> {
        self.lock()?
            .families
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("family", id))
    }

    fn create_reminder(&self, reminder: &Reminder) -> AppResult<()> {
        self.lock()?
            .reminders
            .insert(reminder.id.clone(), reminder.clone());
        Ok(())
    }

    fn get_reminder(&self, id: &str) -> AppResult<Reminder> {
        self.lock()?
            .reminders
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("reminder", id))
    }

    fn list_reminders(&self) -> AppResult<Vec<Reminder>> {
        let inner = self.lock()?;
        Ok(sorted_by_id(inner.reminders.values().cloned(), |r| r.id.as_str()))
    }

    fn delete_reminder(&self, id: &str) -> AppResult<()> {
        self.lock()?
            .reminders
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("reminder", id))
    }

    fn create_completion_event(&self, event: &CompletionEvent) -> AppResult<()> {
        self.lock()?
            .completion_events
            .insert(event.id.clone(), event.clone());
        Ok(())
    }

    fn get_completion_event(&self, id: &str) -> AppResult<CompletionEvent> {
        self.lock()?
            .completion_events
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("completion event", id))
    }

    fn list_completion_events(&self, reminder_id: &str) -> AppResult<Vec<CompletionEvent>> {
        let inner = self.lock()?;
        Ok(sorted_by_id(
            inner
                .completion_events
                .values()
                .filter(|e| e.reminder_id == reminder_id)
                .cloned(),
            |e| e.id.as_str(),
        ))
    }

    fn list_all_completion_events(&self) -> AppResult<Vec<CompletionEvent>> {
        let inner = self.lock()?;
        Ok(sorted_by_id(inner.completion_events.values().cloned(), |e| {
            e.id.as_str()
        }))
    }

    fn delete_completion_event(&self, id: &str) -> AppResult<()> {
        self.lock()?
            .completion_events
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("completion event", id))
    }

    fn get_counter(&self, kind: CounterKind) -> AppResult<i64> {
        Ok(self.lock()?.counters.get(&kind).copied().unwrap_or(0))
    }

    fn set_counter(&self, kind: CounterKind, value: i64) -> AppResult<()> {
        self.lock()?.counters.insert(kind, value);
        Ok(())
    }

    fn next_id(&self, kind: CounterKind) -> AppResult<i64> {
        let mut inner = self.lock()?;
        let counter = inner.counters.entry(kind).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}
