//! Route guard.
//!
//! ## Summary
//! Turns authorization decisions into navigation. The guard only reads the
//! session (through a `watch` receiver); it never changes it.
//!
//! ## Module Organization
//!
//! - `routes`: the route table and view identifiers
//! - `navigator`: the routing collaborator the guard drives

pub mod navigator;
pub mod routes;

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::authz::evaluate;
use crate::session::Session;
use navigator::Navigator;
use routes::{RouteAccess, RouteTable, View};
use wardgate_core::AuthorizationDecision;
use wardgate_core::constants::{DASHBOARD_PATH, LOGIN_PATH, ROOT_PATH, UNAUTHORIZED_PATH};

pub use navigator::RecordingNavigator;

/// Where a single navigation attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// The session is still hydrating; show a placeholder.
    Pending,
    Resolved(AuthorizationDecision),
}

/// What the guard decided for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Public(View),
    Guarded { view: View, state: GuardState },
    /// No route matches; the host falls back to `/`.
    Unknown,
}

impl GuardOutcome {
    /// `None` for public and unknown paths, which are never evaluated.
    #[must_use]
    pub const fn state(&self) -> Option<GuardState> {
        match self {
            Self::Guarded { state, .. } => Some(*state),
            Self::Public(_) | Self::Unknown => None,
        }
    }
}

pub struct RouteGuard {
    session: watch::Receiver<Session>,
    routes: Arc<RouteTable>,
    return_to: Mutex<Option<String>>,
}

impl RouteGuard {
    #[must_use]
    pub const fn new(session: watch::Receiver<Session>, routes: Arc<RouteTable>) -> Self {
        Self {
            session,
            routes,
            return_to: Mutex::new(None),
        }
    }

    #[must_use]
    pub const fn routes(&self) -> &Arc<RouteTable> {
        &self.routes
    }

    /// Current session as seen by the guard.
    #[must_use]
    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    /// The current session as seen by a client presenting `presented`.
    /// See [`Session::presented_with`].
    #[must_use]
    pub fn session_for(&self, presented: Option<&str>) -> Session {
        self.session.borrow().presented_with(presented)
    }

    /// ## Summary
    /// Decide what to do with a request for `path` right now.
    ///
    /// A guarded path stays `Pending` while the session hydrates and is never
    /// evaluated until it is `Ready`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> GuardOutcome {
        self.resolve_for(path, &self.session.borrow())
    }

    /// [`Self::resolve`] against an explicit session snapshot.
    #[must_use]
    pub fn resolve_for(&self, path: &str, session: &Session) -> GuardOutcome {
        let Some(entry) = self.routes.lookup(path) else {
            return GuardOutcome::Unknown;
        };

        let requirement = match &entry.access {
            RouteAccess::Public => return GuardOutcome::Public(entry.view),
            RouteAccess::Guarded(requirement) => requirement,
        };

        let state = if session.is_ready() {
            GuardState::Resolved(evaluate(session, requirement))
        } else {
            GuardState::Pending
        };

        GuardOutcome::Guarded {
            view: entry.view,
            state,
        }
    }

    /// Like [`Self::resolve`], but waits for hydration to finish first.
    pub async fn resolve_when_ready(&self, path: &str) -> GuardOutcome {
        let mut session = self.session.clone();
        if let Err(e) = session.wait_for(Session::is_ready).await {
            tracing::warn!(error = %e, "Session store dropped before hydration finished");
        }
        self.resolve(path)
    }

    /// ## Summary
    /// Resolve `path` against the current session and drive `navigator`.
    pub fn navigate<N: Navigator + ?Sized>(&self, path: &str, navigator: &mut N) -> GuardOutcome {
        let session = self.session();
        self.navigate_for(path, &session, navigator)
    }

    /// ## Summary
    /// Resolve `target` against `session` and drive `navigator` accordingly.
    ///
    /// `target` is the requested path, optionally with its query. Routes are
    /// matched on the path alone. A redirect to login records the whole
    /// `target` as the return-to continuation and hands it to the navigator.
    #[tracing::instrument(skip(self, session, navigator))]
    pub fn navigate_for<N: Navigator + ?Sized>(
        &self,
        target: &str,
        session: &Session,
        navigator: &mut N,
    ) -> GuardOutcome {
        let path = target.split(['?', '#']).next().unwrap_or(target);
        let outcome = self.resolve_for(path, session);

        match &outcome {
            GuardOutcome::Unknown => {
                tracing::debug!("Unknown path, falling back to root");
                navigator.redirect_to(ROOT_PATH, None);
            }
            GuardOutcome::Public(_)
            | GuardOutcome::Guarded {
                state: GuardState::Resolved(AuthorizationDecision::Allow),
                ..
            } => navigator.navigate_to(target),
            GuardOutcome::Guarded {
                state: GuardState::Pending,
                ..
            } => navigator.show_placeholder(),
            GuardOutcome::Guarded {
                state: GuardState::Resolved(AuthorizationDecision::RedirectToLogin),
                ..
            } => {
                tracing::debug!("No identity, redirecting to login");
                self.record_return_to(target);
                navigator.redirect_to(LOGIN_PATH, Some(target));
            }
            GuardOutcome::Guarded {
                state: GuardState::Resolved(AuthorizationDecision::RedirectToUnauthorized),
                ..
            } => {
                tracing::info!("Role not permitted, redirecting to unauthorized");
                navigator.redirect_to(UNAUTHORIZED_PATH, None);
            }
        }

        outcome
    }

    /// ## Summary
    /// Where to go after a successful login.
    ///
    /// Prefers `explicit` when it is a safe local path, then the recorded
    /// continuation, then the dashboard. The recorded continuation is consumed.
    #[must_use]
    pub fn post_login_destination(&self, explicit: Option<&str>) -> String {
        let recorded = self
            .return_to
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        explicit
            .filter(|path| is_safe_return_path(path))
            .map(ToString::to_string)
            .or_else(|| recorded.filter(|path| is_safe_return_path(path)))
            .unwrap_or_else(|| DASHBOARD_PATH.to_string())
    }

    /// The continuation recorded by the last redirect to login, if any.
    #[must_use]
    pub fn recorded_return_to(&self) -> Option<String> {
        self.return_to
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record_return_to(&self, path: &str) {
        if is_safe_return_path(path) {
            *self.return_to.lock().unwrap_or_else(PoisonError::into_inner) = Some(path.to_string());
        }
    }
}

/// Local absolute paths only: no scheme, no protocol-relative `//host`, and
/// never the login page itself.
#[must_use]
pub fn is_safe_return_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains("://")
        && !path.contains('\\')
        && !is_login_path(path)
}

fn is_login_path(target: &str) -> bool {
    let path = target.split(['?', '#']).next().unwrap_or(target);
    let trimmed = path.trim_end_matches('/');
    trimmed == LOGIN_PATH
}
