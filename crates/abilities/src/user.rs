//! User snapshot for ability decisions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use actionguard_core::UserId;

use crate::action::{Action, ActionName};
use crate::role::Role;

/// A user as seen by the ability checker.
///
/// # Invariants
/// - A user possesses an action iff it appears in `direct_actions` or in the
///   action set of any role in `roles`.
/// - This is a read-only snapshot: the checker never creates, mutates or
///   destroys users, roles or actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub direct_actions: Vec<Action>,
    pub roles: Vec<Role>,
}

impl User {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            direct_actions: Vec::new(),
            roles: Vec::new(),
        }
    }

    pub fn with_direct_action(mut self, action: Action) -> Self {
        self.direct_actions.push(action);
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    /// Whether the user possesses the named action, directly or via any role.
    pub fn possesses(&self, name: &ActionName) -> bool {
        self.direct_actions.iter().any(|a| a.name == *name)
            || self.roles.iter().any(|r| r.grants(name))
    }

    /// The user's effective action set: direct ∪ role-derived.
    ///
    /// Sorted for stable display; intended for hosts rendering permission
    /// screens, not for the hot path of a check.
    pub fn effective_actions(&self) -> BTreeSet<&str> {
        let mut set: BTreeSet<&str> = self
            .direct_actions
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        for role in &self.roles {
            set.extend(role.actions.iter().map(|a| a.name.as_str()));
        }
        set
    }
}
