//! JSON file storage.
//!
//! One pretty-printed, id-keyed JSON document per entity kind plus a
//! `counters.json`, all under a single data directory. Every operation
//! reloads the affected document and writes it back while holding the
//! adapter's lock. A missing or empty document is an empty collection.

use super::{CounterKind, Storage, id_sort_key, recalculate_counters};
use crate::errors::{AppError, AppResult};
use crate::models::{CompletionEvent, Family, Reminder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

pub const FAMILIES_FILE: &str = "families.json";
pub const REMINDERS_FILE: &str = "reminders.json";
pub const COMPLETION_EVENTS_FILE: &str = "completion_events.json";
pub const COUNTERS_FILE: &str = "counters.json";

pub struct FileStorage {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Open (and create if needed) a data directory. When no counters
    /// document exists yet, counters are rebuilt from the stored ids.
    pub fn open(dir: &Path) -> AppResult<Self> {
        fs::create_dir_all(dir)?;
        let store = Self {
            dir: dir.to_path_buf(),
            lock: Mutex::new(()),
        };
        if !store.path(COUNTERS_FILE).exists() {
            recalculate_counters(&store)?;
        }
        Ok(store)
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn guard(&self) -> AppResult<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| AppError::Storage("file storage lock poisoned".into()))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> AppResult<BTreeMap<String, T>> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    /// Written to a sibling temp file, then renamed over the document.
    fn save<T: Serialize>(&self, name: &str, map: &BTreeMap<String, T>) -> AppResult<()> {
        let path = self.path(name);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(map)?)?;
        fs::rename(&tmp, &path)?;
        log::debug!("wrote {} ({} entries)", path.display(), map.len());
        Ok(())
    }

    fn upsert<T: Serialize + DeserializeOwned + Clone>(
        &self,
        name: &str,
        id: &str,
        value: &T,
    ) -> AppResult<()> {
        let _g = self.guard()?;
        let mut map: BTreeMap<String, T> = self.load(name)?;
        map.insert(id.to_string(), value.clone());
        self.save(name, &map)
    }

    fn fetch<T: DeserializeOwned>(&self, name: &str, kind: &'static str, id: &str) -> AppResult<T> {
        let _g = self.guard()?;
        let mut map: BTreeMap<String, T> = self.load(name)?;
        map.remove(id).ok_or_else(|| AppError::not_found(kind, id))
    }

    fn remove<T: Serialize + DeserializeOwned>(
        &self,
        name: &str,
        kind: &'static str,
        id: &str,
    ) -> AppResult<()> {
        let _g = self.guard()?;
        let mut map: BTreeMap<String, T> = self.load(name)?;
        if map.remove(id).is_none() {
            return Err(AppError::not_found(kind, id));
        }
        self.save(name, &map)
    }

    fn all<T: DeserializeOwned>(&self, name: &str) -> AppResult<Vec<(String, T)>> {
        let _g = self.guard()?;
        let map: BTreeMap<String, T> = self.load(name)?;
        let mut out: Vec<(String, T)> = map.into_iter().collect();
        out.sort_by_key(|(id, _)| id_sort_key(id));
        Ok(out)
    }

    fn read_counters(&self) -> AppResult<BTreeMap<String, i64>> {
        self.load(COUNTERS_FILE)
    }
}

impl Storage for FileStorage {
    fn create_family(&self, family: &Family) -> AppResult<()> {
        self.upsert(FAMILIES_FILE, &family.id, family)
    }

    fn get_family(&self, id: &str) -> AppResult<Family> {
        self.fetch(FAMILIES_FILE, "family", id)
    }

    fn list_families(&self) -> AppResult<Vec<Family>> {
        Ok(self
            .all::<Family>(FAMILIES_FILE)?
            .into_iter()
            .map(|(_, f)| f)
            .collect())
    }

    fn delete_family(&self, id: &str) -> AppResult<()> {
        self.remove::<Family>(FAMILIES_FILE, "family", id)
    }

    fn create_reminder(&self, reminder: &Reminder) -> AppResult<()> {
        self.upsert(REMINDERS_FILE, &reminder.id, reminder)
    }

    fn get_reminder(&self, id: &str) -> AppResult<Reminder> {
        self.fetch(REMINDERS_FILE, "reminder", id)
    }

    fn list_reminders(&self) -> AppResult<Vec<Reminder>> {
        Ok(self
            .all::<Reminder>(REMINDERS_FILE)?
            .into_iter()
            .map(|(_, r)| r)
            .collect())
    }

    fn delete_reminder(&self, id: &str) -> AppResult<()> {
        self.remove::<Reminder>(REMINDERS_FILE, "reminder", id)
    }

    fn create_completion_event(&self, event: &CompletionEvent) -> AppResult<()> {
        self.upsert(COMPLETION_EVENTS_FILE, &event.id, event)
    }

    fn get_completion_event(&self, id: &str) -> AppResult<CompletionEvent> {
        self.fetch(COMPLETION_EVENTS_FILE, "completion event", id)
    }

    fn list_completion_events(&self, reminder_id: &str) -> AppResult<Vec<CompletionEvent>> {
        Ok(self
            .all::<CompletionEvent>(COMPLETION_EVENTS_FILE)?
            .into_iter()
            .map(|(_, e)| e)
            .filter(|e| e.reminder_id == reminder_id)
            .collect())
    }

    fn list_all_completion_events(&self) -> AppResult<Vec<CompletionEvent>> {
        Ok(self
            .all::<CompletionEvent>(COMPLETION_EVENTS_FILE)?
            .into_iter()
            .map(|(_, e)| e)
            .collect())
    }

    fn delete_completion_event(&self, id: &str) -> AppResult<()> {
        self.remove::<CompletionEvent>(COMPLETION_EVENTS_FILE, "completion event", id)
    }

    fn get_counter(&self, kind: CounterKind) -> AppResult<i64> {
        let _g = self.guard()?;
        Ok(self
            .read_counters()?
            .get(kind.to_db_str())
            .copied()
            .unwrap_or(0))
    }

    fn set_counter(&self, kind: CounterKind, value: i64) -> AppResult<()> {
        let _g = self.guard()?;
        let mut counters = self.read_counters()?;
        counters.insert(kind.to_db_str().to_string(), value);
        self.save(COUNTERS_FILE, &counters)
    }

    fn next_id(&self, kind: CounterKind) -> AppResult<i64> {
        let _g = self.guard()?;
        let mut counters = self.read_counters()?;
        let next = counters.get(kind.to_db_str()).copied().unwrap_or(0) + 1;
        counters.insert(kind.to_db_str().to_string(), next);
        self.save(COUNTERS_FILE, &counters)?;
        Ok(next)
    }
}
