//! `actionguard-abilities` — pure ability-resolution boundary.
//!
//! This crate is intentionally decoupled from HTTP, sessions and storage:
//! the host framework resolves users and loads role/action data, and this
//! crate answers one question — may this user perform these actions?

pub mod action;
pub mod checker;
pub mod config;
pub mod role;
pub mod subject;
pub mod user;

pub use action::{Action, ActionName};
pub use checker::{AbilityChecker, AbilityError, AbilityExplanation, explain_ability};
pub use config::AbilityConfig;
pub use role::Role;
pub use subject::{AmbientUserResolver, FixedUser, NoAmbientUser, Subject};
pub use user::User;
