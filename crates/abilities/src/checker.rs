use serde::Serialize;
use thiserror::Error;

use actionguard_core::UserId;

use crate::action::ActionName;
use crate::config::AbilityConfig;
use crate::subject::{AmbientUserResolver, Subject};
use crate::user::User;

/// Outcome of a failed ability evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbilityError {
    /// No explicit user supplied and no ambient user resolvable.
    #[error("no user available for ability check")]
    NoUser,

    /// User resolved but failed to possess all required actions.
    #[error("denied: missing actions {missing:?}")]
    Denied {
        /// Every required action the user does not possess.
        missing: Vec<String>,
    },
}

/// Ability checker: decides whether a user may perform a set of actions.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check over an in-memory snapshot)
///
/// The resolver supplies the ambient authenticated user when the caller
/// passes [`Subject::Ambient`]; it is the only collaborator consulted.
#[derive(Debug, Clone)]
pub struct AbilityChecker<R> {
    config: AbilityConfig,
    resolver: R,
}

impl<R: AmbientUserResolver> AbilityChecker<R> {
    pub fn new(config: AbilityConfig, resolver: R) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &AbilityConfig {
        &self.config
    }

    /// Require that the subject may perform every action in `required`.
    ///
    /// All-or-nothing: one missing action denies the whole call. An empty
    /// `required` list is vacuously granted. The configured super-user
    /// passes unconditionally, including for action names the host never
    /// registered.
    pub fn assert_ability(
        &self,
        subject: Subject<'_>,
        required: &[ActionName],
    ) -> Result<(), AbilityError> {
        let resolved;
        let user = match subject {
            Subject::Explicit(user) => user,
            Subject::Ambient => match self.resolver.current_user() {
                Some(user) => {
                    resolved = user;
                    &resolved
                }
                None => {
                    tracing::debug!(actions = ?names_of(required), "ability check failed: no user");
                    return Err(AbilityError::NoUser);
                }
            },
        };

        match evaluate(user, required, self.config.super_user_id) {
            Outcome::SuperUser => {
                tracing::debug!(
                    user_id = %user.id,
                    actions = ?names_of(required),
                    "ability granted (super-user)"
                );
                Ok(())
            }
            Outcome::Granted => {
                tracing::debug!(user_id = %user.id, actions = ?names_of(required), "ability granted");
                Ok(())
            }
            Outcome::Denied(missing) => {
                tracing::debug!(
                    user_id = %user.id,
                    actions = ?names_of(required),
                    missing = ?missing,
                    "ability denied"
                );
                Err(AbilityError::Denied { missing })
            }
        }
    }

    /// Boolean variant of [`Self::assert_ability`].
    ///
    /// Maps both [`AbilityError::NoUser`] and [`AbilityError::Denied`] to
    /// `false`; never panics, never leaks error detail.
    pub fn check_ability(&self, subject: Subject<'_>, required: &[ActionName]) -> bool {
        self.assert_ability(subject, required).is_ok()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared evaluation
// ─────────────────────────────────────────────────────────────────────────────

enum Outcome {
    SuperUser,
    Granted,
    Denied(Vec<String>),
}

/// One evaluation shared by both entry points and the explanation path.
fn evaluate(user: &User, required: &[ActionName], super_user_id: UserId) -> Outcome {
    if user.id == super_user_id {
        return Outcome::SuperUser;
    }

    let missing: Vec<String> = required
        .iter()
        .filter(|name| !user.possesses(name))
        .map(|name| name.as_str().to_string())
        .collect();

    if missing.is_empty() {
        Outcome::Granted
    } else {
        Outcome::Denied(missing)
    }
}

fn names_of(required: &[ActionName]) -> Vec<&str> {
    required.iter().map(|n| n.as_str()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Ability Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an ability decision.
///
/// Answers "why was this allowed/denied?" for audit screens and debugging.
/// Guaranteed to agree with [`AbilityChecker::assert_ability`] for the same
/// user, required list and configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AbilityExplanation {
    /// The actions that were being checked.
    pub required_actions: Vec<String>,

    /// Whether the ability was granted.
    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// The user whose grants were evaluated.
    pub user_id: UserId,

    /// The user's effective action set (direct ∪ role-derived), sorted.
    pub effective_actions: Vec<String>,

    /// True when the super-user override decided the outcome.
    pub super_user_override: bool,

    /// If denied, every required action the user does not possess.
    pub missing: Vec<String>,
}

/// Explain the decision [`AbilityChecker::assert_ability`] would make.
pub fn explain_ability(
    user: &User,
    required: &[ActionName],
    config: &AbilityConfig,
) -> AbilityExplanation {
    let required_actions: Vec<String> = required.iter().map(|n| n.as_str().to_string()).collect();
    let effective_actions: Vec<String> = user
        .effective_actions()
        .into_iter()
        .map(str::to_string)
        .collect();

    match evaluate(user, required, config.super_user_id) {
        Outcome::SuperUser => AbilityExplanation {
            required_actions,
            granted: true,
            reason: format!("user {} is the configured super-user", user.id),
            user_id: user.id,
            effective_actions,
            super_user_override: true,
            missing: Vec::new(),
        },
        Outcome::Granted => AbilityExplanation {
            required_actions,
            granted: true,
            reason: "user possesses every required action".to_string(),
            user_id: user.id,
            effective_actions,
            super_user_override: false,
            missing: Vec::new(),
        },
        Outcome::Denied(missing) => AbilityExplanation {
            required_actions,
            granted: false,
            reason: format!("user {} is missing actions {:?}", user.id, missing),
            user_id: user.id,
            effective_actions,
            super_user_override: false,
            missing,
        },
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::config::SUPER_USER_ID_ENV;
    use crate::role::Role;
    use crate::subject::{FixedUser, NoAmbientUser};
    use actionguard_core::{ActionId, RoleId};

    fn action(id: i64, name: &'static str) -> Action {
        Action::new(ActionId::new(id), name)
    }

    fn names(list: &[&'static str]) -> Vec<ActionName> {
        list.iter().map(|n| ActionName::new(*n)).collect()
    }

    fn checker() -> AbilityChecker<NoAmbientUser> {
        AbilityChecker::new(AbilityConfig::default(), NoAmbientUser)
    }

    #[test]
    fn direct_action_grants() {
        let user = User::new(UserId::new(7)).with_direct_action(action(1, "delete_foo"));

        assert!(checker().check_ability(Subject::Explicit(&user), &names(&["delete_foo"])));
    }

    #[test]
    fn role_path_grants_without_direct_actions() {
        let admin = Role::new(RoleId::new(1), "admin").with_action(action(1, "delete_foo"));
        let user = User::new(UserId::new(7)).with_role(admin);

        assert!(checker().check_ability(Subject::Explicit(&user), &names(&["delete_foo"])));
    }

    #[test]
    fn one_missing_action_denies_the_whole_list() {
        let user = User::new(UserId::new(7)).with_direct_action(action(1, "delete_foo"));

        let result =
            checker().assert_ability(Subject::Explicit(&user), &names(&["delete_foo", "edit_bar"]));

        assert_eq!(
            result,
            Err(AbilityError::Denied {
                missing: vec!["edit_bar".to_string()],
            })
        );
    }

    #[test]
    fn super_user_passes_any_list_including_unknown_names() {
        // Default super-user id is 1; no actions or roles at all.
        let user = User::new(UserId::new(1));

        assert!(checker().check_ability(
            Subject::Explicit(&user),
            &names(&["anything", "never_registered"])
        ));
    }

    #[test]
    fn configured_super_user_id_is_honored() {
        let config = AbilityConfig::new(UserId::new(99));
        let checker = AbilityChecker::new(config, NoAmbientUser);

        let elevated = User::new(UserId::new(99));
        let ordinary = User::new(UserId::new(1));

        assert!(checker.check_ability(Subject::Explicit(&elevated), &names(&["anything"])));
        assert!(!checker.check_ability(Subject::Explicit(&ordinary), &names(&["anything"])));
    }

    #[test]
    fn ambient_subject_without_resolver_user_is_no_user() {
        let result = checker().assert_ability(Subject::Ambient, &names(&["delete_foo"]));
        assert_eq!(result, Err(AbilityError::NoUser));
    }

    #[test]
    fn ambient_subject_uses_resolved_user() {
        let user = User::new(UserId::new(7)).with_direct_action(action(1, "delete_foo"));
        let checker = AbilityChecker::new(AbilityConfig::default(), FixedUser(user));

        assert!(checker.check_ability(Subject::Ambient, &names(&["delete_foo"])));
        assert!(!checker.check_ability(Subject::Ambient, &names(&["edit_bar"])));
    }

    #[test]
    fn check_ability_maps_both_errors_to_false() {
        let user = User::new(UserId::new(7));

        // Denied
        assert!(!checker().check_ability(Subject::Explicit(&user), &names(&["delete_foo"])));
        // NoUser
        assert!(!checker().check_ability(Subject::Ambient, &names(&["delete_foo"])));
    }

    #[test]
    fn empty_required_list_is_vacuously_granted() {
        let user = User::new(UserId::new(7));

        assert!(checker().assert_ability(Subject::Explicit(&user), &[]).is_ok());
    }

    #[test]
    fn repeated_evaluation_is_idempotent() {
        let user = User::new(UserId::new(7)).with_direct_action(action(1, "delete_foo"));
        let required = names(&["delete_foo", "edit_bar"]);
        let checker = checker();

        let first = checker.assert_ability(Subject::Explicit(&user), &required);
        let second = checker.assert_ability(Subject::Explicit(&user), &required);
        assert_eq!(first, second);
    }

    #[test]
    fn explanation_agrees_with_assert_on_grant_and_deny() {
        let staff = Role::new(RoleId::new(1), "staff").with_action(action(1, "edit_bar"));
        let user = User::new(UserId::new(7))
            .with_direct_action(action(2, "delete_foo"))
            .with_role(staff);
        let config = AbilityConfig::default();
        let checker = AbilityChecker::new(config, NoAmbientUser);

        let granted = names(&["delete_foo", "edit_bar"]);
        let explanation = explain_ability(&user, &granted, &config);
        assert!(explanation.granted);
        assert!(!explanation.super_user_override);
        assert!(explanation.missing.is_empty());
        assert_eq!(explanation.effective_actions, vec!["delete_foo", "edit_bar"]);
        assert!(checker.assert_ability(Subject::Explicit(&user), &granted).is_ok());

        let denied = names(&["delete_foo", "manage_roles"]);
        let explanation = explain_ability(&user, &denied, &config);
        assert!(!explanation.granted);
        assert_eq!(explanation.missing, vec!["manage_roles"]);
        assert_eq!(
            checker.assert_ability(Subject::Explicit(&user), &denied),
            Err(AbilityError::Denied {
                missing: explanation.missing.clone(),
            })
        );
    }

    #[test]
    fn explanation_serializes_for_audit_sinks() {
        let user = User::new(UserId::new(1));
        let explanation = explain_ability(&user, &names(&["anything"]), &AbilityConfig::default());

        let value = serde_json::to_value(&explanation).unwrap();
        assert_eq!(value["granted"], serde_json::json!(true));
        assert_eq!(value["super_user_override"], serde_json::json!(true));
        assert_eq!(value["user_id"], serde_json::json!(1));
    }

    #[test]
    fn config_from_env_override_default_and_malformed() {
        // Single test owns the env var to avoid cross-test interference.
        unsafe { std::env::remove_var(SUPER_USER_ID_ENV) };
        assert_eq!(
            AbilityConfig::from_env().unwrap(),
            AbilityConfig::new(UserId::new(1))
        );

        unsafe { std::env::set_var(SUPER_USER_ID_ENV, "99") };
        assert_eq!(
            AbilityConfig::from_env().unwrap(),
            AbilityConfig::new(UserId::new(99))
        );

        unsafe { std::env::set_var(SUPER_USER_ID_ENV, "not-a-number") };
        assert!(AbilityConfig::from_env().is_err());

        unsafe { std::env::remove_var(SUPER_USER_ID_ENV) };
    }

    mod laws {
        use super::*;
        use proptest::prelude::*;

        const POOL: [&str; 8] = [
            "add_issue",
            "edit_issue",
            "delete_foo",
            "edit_bar",
            "view_baz",
            "manage_roles",
            "export_csv",
            "move_issue",
        ];

        /// Build a user holding `granted` pool entries, alternating between
        /// direct grants and a role grant so both possession paths are
        /// exercised.
        fn user_with(granted: &std::collections::BTreeSet<usize>) -> User {
            let mut user = User::new(UserId::new(42));
            let mut role = Role::new(RoleId::new(1), "staff");
            for (i, idx) in granted.iter().enumerate() {
                let act = Action::new(ActionId::new(*idx as i64), POOL[*idx]);
                if i % 2 == 0 {
                    user.direct_actions.push(act);
                } else {
                    role.actions.push(act);
                }
            }
            user.with_role(role)
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: for a non-super user, the check grants iff the
            /// required set is a subset of the effective set (all-or-nothing).
            #[test]
            fn grant_iff_required_subset_of_effective(
                granted in prop::collection::btree_set(0usize..POOL.len(), 0..POOL.len()),
                required in prop::collection::vec(0usize..POOL.len(), 0..6),
            ) {
                let user = user_with(&granted);
                let checker = AbilityChecker::new(AbilityConfig::default(), NoAmbientUser);

                let required_names: Vec<ActionName> =
                    required.iter().map(|i| ActionName::new(POOL[*i])).collect();
                let expected = required.iter().all(|i| granted.contains(i));

                prop_assert_eq!(
                    checker.check_ability(Subject::Explicit(&user), &required_names),
                    expected
                );
            }

            /// Property: the super-user passes for any required list.
            #[test]
            fn super_user_grants_any_required_list(
                required in prop::collection::vec("[a-z_]{1,12}", 1..6),
            ) {
                let user = User::new(UserId::new(1));
                let checker = AbilityChecker::new(AbilityConfig::default(), NoAmbientUser);

                let required_names: Vec<ActionName> =
                    required.into_iter().map(ActionName::new).collect();

                prop_assert!(checker.check_ability(Subject::Explicit(&user), &required_names));
            }
        }
    }
}
