use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use actionguard_core::ActionId;

/// Action name.
///
/// Actions are modeled as opaque strings (e.g. "delete_foo"). Possession
/// checks compare names by exact string equality; no wildcard or pattern
/// matching is applied at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionName(Cow<'static, str>);

impl ActionName {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ActionName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named permission a user can possess directly or via role.
///
/// The id and description belong to the host's store; the checker only ever
/// looks at the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    pub name: ActionName,
    pub description: Option<String>,
}

impl Action {
    pub fn new(id: ActionId, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id,
            name: ActionName::new(name),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
