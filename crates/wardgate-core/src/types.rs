use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::role::Role;

/// The authenticated user of the current session.
///
/// `name` is accepted on input so legacy blobs
/// (`{"name": ..., "role": "Hospital Staff"}`) still hydrate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(alias = "name")]
    pub display_name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticated_at: Option<DateTime<Utc>>,
}

impl Identity {
    #[must_use]
    pub fn new(display_name: impl Into<String>, role: Role, authenticated_at: DateTime<Utc>) -> Self {
        Self {
            display_name: display_name.into(),
            role,
            authenticated_at: Some(authenticated_at),
        }
    }

    /// ## Summary
    /// Returns `true` if this identity was authenticated more than `max_age` before `now`.
    ///
    /// Identities without a timestamp (legacy blobs) count as expired.
    #[must_use]
    pub fn is_older_than(&self, max_age: chrono::Duration, now: DateTime<Utc>) -> bool {
        self.authenticated_at
            .is_none_or(|at| now.signed_duration_since(at) > max_age)
    }
}

/// Load lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Hydrating,
    Ready,
}

/// The set of roles allowed to view a destination. Empty means any
/// authenticated identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionRequirement {
    roles: BTreeSet<Role>,
}

impl PermissionRequirement {
    #[must_use]
    pub const fn any_authenticated() -> Self {
        Self {
            roles: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        roles.into_iter().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    #[must_use]
    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

impl FromIterator<Role> for PermissionRequirement {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self {
            roles: iter.into_iter().collect(),
        }
    }
}

/// Outcome of evaluating a session against a requirement. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationDecision {
    Allow,
    RedirectToLogin,
    RedirectToUnauthorized,
}
