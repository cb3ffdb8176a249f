//! Call-boundary subject and ambient-user resolution.
//!
//! Callers either hand over a concrete user or ask the checker to consult an
//! [`AmbientUserResolver`] (typically backed by the host's session layer).
//! A tagged union at the boundary avoids runtime type probing.

use crate::user::User;

/// Who an ability check is about.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    /// An explicitly supplied user.
    Explicit(&'a User),
    /// Resolve the user from ambient context (session, request extension).
    Ambient,
}

impl<'a> From<&'a User> for Subject<'a> {
    fn from(user: &'a User) -> Self {
        Subject::Explicit(user)
    }
}

/// External collaborator supplying the ambient authenticated user.
///
/// Returns an owned snapshot so session stores are free to materialize the
/// user per call. `None` means no user is authenticated.
pub trait AmbientUserResolver {
    fn current_user(&self) -> Option<User>;
}

/// Resolver for hosts with no ambient identity (background jobs, tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAmbientUser;

impl AmbientUserResolver for NoAmbientUser {
    fn current_user(&self) -> Option<User> {
        None
    }
}

/// Resolver returning a fixed user (tests, single-user tools).
#[derive(Debug, Clone)]
pub struct FixedUser(pub User);

impl AmbientUserResolver for FixedUser {
    fn current_user(&self) -> Option<User> {
        Some(self.0.clone())
    }
}
