//! Session state and its store.
//!
//! ## Module Organization
//!
//! - `store`: the [`SessionStore`], owner of the current session
//! - `token`: opaque bearer tokens

pub mod store;
pub mod token;

pub use store::{Attempt, SessionStore};
pub use token::SessionToken;

use wardgate_core::{Identity, Lifecycle};

/// Snapshot of the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    lifecycle: Lifecycle,
    identity: Option<Identity>,
    token: Option<SessionToken>,
}

impl Session {
    /// Initial state, before hydration has finished.
    #[must_use]
    pub const fn hydrating() -> Self {
        Self {
            lifecycle: Lifecycle::Hydrating,
            identity: None,
            token: None,
        }
    }

    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            lifecycle: Lifecycle::Ready,
            identity: None,
            token: None,
        }
    }

    #[must_use]
    pub const fn authenticated(identity: Identity, token: Option<SessionToken>) -> Self {
        Self {
            lifecycle: Lifecycle::Ready,
            identity: Some(identity),
            token,
        }
    }

    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Ready)
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Bearer token to pass to downstream collaborators, if any.
    #[must_use]
    pub const fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    /// ## Summary
    /// The session as seen by a client presenting `presented`.
    ///
    /// Only a client holding the session's own token sees its identity.
    /// Everyone else sees an anonymous session in the same lifecycle, so a
    /// hydrating session stays hydrating. Identities restored without a token
    /// are visible to nobody.
    #[must_use]
    pub fn presented_with(&self, presented: Option<&str>) -> Self {
        let owns = match (&self.token, presented) {
            (Some(token), Some(presented)) => token.matches(presented),
            _ => false,
        };

        if owns {
            self.clone()
        } else {
            Self {
                lifecycle: self.lifecycle,
                identity: None,
                token: None,
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::hydrating()
    }
}
