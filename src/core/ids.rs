//! Sequential id minting.

use crate::errors::AppResult;
use crate::storage::{CounterKind, Storage};

/// Reserve the next id of `kind` (`fam3`, `rem12`, `cev7`, ...).
///
/// The counter is advanced before the entity is written, so an aborted
/// creation leaves a gap in the sequence but never reuses an id.
pub fn mint_id(store: &dyn Storage, kind: CounterKind) -> AppResult<String> {
    let n = store.next_id(kind)?;
    let id = kind.format_id(n);
    log::debug!("minted id {}", id);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn ids_are_prefixed_and_sequential() {
        let store = MemoryStorage::new();
        assert_eq!(mint_id(&store, CounterKind::Family).unwrap(), "fam1");
        assert_eq!(mint_id(&store, CounterKind::Family).unwrap(), "fam2");
        assert_eq!(mint_id(&store, CounterKind::Reminder).unwrap(), "rem1");
        assert_eq!(mint_id(&store, CounterKind::CompletionEvent).unwrap(), "cev1");
    }

    #[test]
    fn minting_continues_after_a_manual_counter_bump() {
        let store = MemoryStorage::new();
        store.set_counter(CounterKind::Reminder, 41).unwrap();
        assert_eq!(mint_id(&store, CounterKind::Reminder).unwrap(), "rem42");
    }
}
