use serde::{Deserialize, Serialize};

use actionguard_core::RoleId;

use crate::action::{Action, ActionName};

/// A named bundle of actions a user may be a member of.
///
/// Roles are loaded by the host (typically from its relational store); the
/// checker treats them as read-only snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub actions: Vec<Action>,
}

impl Role {
    pub fn new(id: RoleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Whether this role grants the named action (exact string match).
    pub fn grants(&self, name: &ActionName) -> bool {
        self.actions.iter().any(|a| a.name == *name)
    }
}
