use super::ids::mint_id;
use super::write_gate;
use crate::errors::{AppError, AppResult};
use crate::models::Family;
use crate::storage::{CounterKind, Storage};
use std::sync::{Arc, Mutex};

/// Family operations.
pub struct FamilyLogic {
    store: Arc<dyn Storage>,
    gate: Arc<Mutex<()>>,
}

impl FamilyLogic {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self::with_gate(store, Arc::new(Mutex::new(())))
    }

    pub fn with_gate(store: Arc<dyn Storage>, gate: Arc<Mutex<()>>) -> Self {
        Self { store, gate }
    }

    /// Create a family with a freshly minted `fam<N>` id. Duplicate member
    /// names are collapsed.
    pub fn create(&self, name: &str, members: &[String]) -> AppResult<Family> {
        if name.trim().is_empty() {
            return Err(AppError::MissingField("name".into()));
        }

        let _g = write_gate(&self.gate)?;
        let id = mint_id(self.store.as_ref(), CounterKind::Family)?;
        let mut family = Family::new(id, name, Vec::new());
        for m in members {
            family.add_member(m.as_str());
        }
        self.store.create_family(&family)?;

        log::info!("created family {} ({} members)", family.id, family.members.len());
        Ok(family)
    }

    pub fn get(&self, id: &str) -> AppResult<Family> {
        self.store.get_family(id)
    }

    pub fn list(&self) -> AppResult<Vec<Family>> {
        self.store.list_families()
    }

    /// Reminders pointing at the family are left untouched.
    pub fn delete(&self, id: &str) -> AppResult<()> {
        let _g = write_gate(&self.gate)?;
        self.store.delete_family(id)?;
        log::info!("deleted family {}", id);
        Ok(())
    }

    /// Adding a member that is already present is a no-op.
    pub fn add_member(&self, id: &str, member: &str) -> AppResult<Family> {
        if member.trim().is_empty() {
            return Err(AppError::MissingField("member".into()));
        }

        let _g = write_gate(&self.gate)?;
        let mut family = self.store.get_family(id)?;
        if family.add_member(member) {
            self.store.create_family(&family)?;
            log::info!("added member '{}' to family {}", member, id);
        }
        Ok(family)
    }

    /// Removing an absent member is a no-op.
    pub fn remove_member(&self, id: &str, member: &str) -> AppResult<Family> {
        let _g = write_gate(&self.gate)?;
        let mut family = self.store.get_family(id)?;
        if family.remove_member(member) {
            self.store.create_family(&family)?;
            log::info!("removed member '{}' from family {}", member, id);
        }
        Ok(family)
    }
}
