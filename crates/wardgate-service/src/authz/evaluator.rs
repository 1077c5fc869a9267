use wardgate_core::{AuthorizationDecision, PermissionRequirement, Role};

use crate::guard::routes::{RouteAccess, RouteEntry, RouteTable};
use crate::session::Session;

/// ## Summary
/// Decide whether `session` may view a destination guarded by `requirement`.
///
/// No identity means a login is needed. An empty requirement admits any
/// identity; otherwise the identity's role must be listed.
#[must_use]
pub fn evaluate(session: &Session, requirement: &PermissionRequirement) -> AuthorizationDecision {
    let Some(identity) = session.identity() else {
        return AuthorizationDecision::RedirectToLogin;
    };

    if requirement.is_empty() || requirement.contains(identity.role) {
        AuthorizationDecision::Allow
    } else {
        AuthorizationDecision::RedirectToUnauthorized
    }
}

/// Guarded destinations `role` may open, in route table order.
///
/// Drives the navigation menu, so screens never branch on role names.
pub fn allowed_destinations(role: Role, routes: &RouteTable) -> impl Iterator<Item = &RouteEntry> {
    routes.entries().filter(move |entry| match &entry.access {
        RouteAccess::Public => false,
        RouteAccess::Guarded(requirement) => {
            requirement.is_empty() || requirement.contains(role)
        }
    })
}
