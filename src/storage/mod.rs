//! Persistence boundary.
//!
//! The core only talks to [`Storage`]; concrete adapters own their backing
//! store (maps, JSON files, a SQLite connection) and guard it with their own
//! lock so that every call is atomic.

pub mod file;
pub mod memory;
pub mod sqlite;

use crate::config::{Backend, Config};
use crate::errors::AppResult;
use crate::models::{CompletionEvent, Family, Reminder};
use std::path::Path;
use std::sync::Arc;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// The three id sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    Family,
    Reminder,
    CompletionEvent,
}

impl CounterKind {
    pub const ALL: [CounterKind; 3] = [
        CounterKind::Family,
        CounterKind::Reminder,
        CounterKind::CompletionEvent,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            CounterKind::Family => "fam",
            CounterKind::Reminder => "rem",
            CounterKind::CompletionEvent => "cev",
        }
    }

    /// Convert enum → DB key
    pub fn to_db_str(&self) -> &'static str {
        match self {
            CounterKind::Family => "family_id",
            CounterKind::Reminder => "reminder_id",
            CounterKind::CompletionEvent => "completion_event_id",
        }
    }

    pub fn format_id(&self, n: i64) -> String {
        format!("{}{}", self.prefix(), n)
    }

    /// Numeric suffix of an id carrying this kind's prefix.
    pub fn parse_id(&self, id: &str) -> Option<i64> {
        id.strip_prefix(self.prefix())?.parse().ok()
    }
}

/// Sort key for ids such as `rem12`: numeric suffix first, then the raw
/// string, so `rem2` < `rem10` and foreign ids still order deterministically.
pub fn id_sort_key(id: &str) -> (i64, String) {
    let digits: String = id.chars().skip_while(|c| !c.is_ascii_digit()).collect();
    (digits.parse().unwrap_or(i64::MAX), id.to_string())
}

pub trait Storage: Send + Sync {
    // Family operations
    fn create_family(&self, family: &Family) -> AppResult<()>;
    fn get_family(&self, id: &str) -> AppResult<Family>;
    fn list_families(&self) -> AppResult<Vec<Family>>;
    fn delete_family(&self, id: &str) -> AppResult<()>;

    // Reminder operations (create is an upsert by id)
    fn create_reminder(&self, reminder: &Reminder) -> AppResult<()>;
    fn get_reminder(&self, id: &str) -> AppResult<Reminder>;
    fn list_reminders(&self) -> AppResult<Vec<Reminder>>;
    fn delete_reminder(&self, id: &str) -> AppResult<()>;

    // Completion event operations (create is an upsert by id)
    fn create_completion_event(&self, event: &CompletionEvent) -> AppResult<()>;
    fn get_completion_event(&self, id: &str) -> AppResult<CompletionEvent>;
    fn list_completion_events(&self, reminder_id: &str) -> AppResult<Vec<CompletionEvent>>;
    /// Every stored event, including those whose reminder was deleted.
    fn list_all_completion_events(&self) -> AppResult<Vec<CompletionEvent>>;
    fn delete_completion_event(&self, id: &str) -> AppResult<()>;

    // Id counters
    fn get_counter(&self, kind: CounterKind) -> AppResult<i64>;
    fn set_counter(&self, kind: CounterKind, value: i64) -> AppResult<()>;

    /// Increment the counter and persist it in one atomic step, returning the
    /// new value.
    fn next_id(&self, kind: CounterKind) -> AppResult<i64>;
}

/// Reset every counter to the highest numeric id suffix found in the data.
pub fn recalculate_counters(store: &dyn Storage) -> AppResult<()> {
    let family_max = max_suffix(
        CounterKind::Family,
        store.list_families()?.iter().map(|f| f.id.as_str()),
    );

    let reminder_max = max_suffix(
        CounterKind::Reminder,
        store.list_reminders()?.iter().map(|r| r.id.as_str()),
    );

    // Events outlive their reminder, so scan all of them.
    let event_max = max_suffix(
        CounterKind::CompletionEvent,
        store
            .list_all_completion_events()?
            .iter()
            .map(|e| e.id.as_str()),
    );

    // Counters only move forward: ids of deleted entities are never reused.
    for (kind, found) in [
        (CounterKind::Family, family_max),
        (CounterKind::Reminder, reminder_max),
        (CounterKind::CompletionEvent, event_max),
    ] {
        let value = found.max(store.get_counter(kind)?);
        store.set_counter(kind, value)?;
        log::info!("recalculated {} counter: {}", kind.prefix(), value);
    }
    Ok(())
}

fn max_suffix<'a>(kind: CounterKind, ids: impl Iterator<Item = &'a str>) -> i64 {
    ids.filter_map(|id| kind.parse_id(id)).max().unwrap_or(0)
}

/// Open the backend selected by the configuration.
pub fn open_storage(cfg: &Config) -> AppResult<Arc<dyn Storage>> {
    let store: Arc<dyn Storage> = match cfg.backend {
        Backend::Memory => Arc::new(MemoryStorage::new()),
        Backend::File => Arc::new(FileStorage::open(Path::new(&cfg.data_dir))?),
        Backend::Sqlite => Arc::new(SqliteStorage::open(&cfg.database)?),
    };
    log::debug!("opened {:?} storage", cfg.backend);
    Ok(store)
}
