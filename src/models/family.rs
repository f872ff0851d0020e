use serde::{Deserialize, Serialize};

/// A household: a name plus the members reminders can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl Family {
    pub fn new(id: impl Into<String>, name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            members,
        }
    }

    /// Member names are matched exactly (case-sensitive).
    pub fn has_member(&self, member: &str) -> bool {
        self.members.iter().any(|m| m == member)
    }

    /// Returns `false` when the member was already present.
    pub fn add_member(&mut self, member: impl Into<String>) -> bool {
        let member = member.into();
        if self.has_member(&member) {
            return false;
        }
        self.members.push(member);
        true
    }

    /// Removes the first matching member; returns `false` if absent.
    pub fn remove_member(&mut self, member: &str) -> bool {
        match self.members.iter().position(|m| m == member) {
            Some(idx) => {
                self.members.remove(idx);
                true
            }
            None => false,
        }
    }
}
