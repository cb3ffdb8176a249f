//! Checker configuration.

use serde::{Deserialize, Serialize};

use actionguard_core::{DomainError, DomainResult, UserId};

/// Environment variable overriding the super-user id.
pub const SUPER_USER_ID_ENV: &str = "ACTIONGUARD_SUPER_USER_ID";

/// Configuration recognized by the ability checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityConfig {
    /// User id that passes every ability check unconditionally.
    pub super_user_id: UserId,
}

impl Default for AbilityConfig {
    fn default() -> Self {
        Self {
            super_user_id: UserId::new(1),
        }
    }
}

impl AbilityConfig {
    pub fn new(super_user_id: UserId) -> Self {
        Self { super_user_id }
    }

    /// Load configuration from the environment.
    ///
    /// Unset means default; a set-but-malformed value is an error rather
    /// than a silent fallback.
    pub fn from_env() -> DomainResult<Self> {
        match std::env::var(SUPER_USER_ID_ENV) {
            Ok(raw) => {
                let super_user_id = raw.parse::<UserId>().map_err(|e| {
                    DomainError::validation(format!("{SUPER_USER_ID_ENV}: {e}"))
                })?;
                Ok(Self { super_user_id })
            }
            Err(_) => Ok(Self::default()),
        }
    }
}
