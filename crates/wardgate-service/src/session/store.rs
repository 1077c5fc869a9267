//! The session store.
//!
//! Holds the current [`Session`] in a `watch` channel so that every consumer
//! sees a change as soon as it is published. Mutations are numbered: each
//! hydrate, login or logout takes an [`Attempt`] up front, and its result is
//! applied only if no later attempt has been applied already. Applying
//! (persist + publish) is serialized by a mutex that also records the last
//! applied attempt.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{Mutex, watch};

use wardgate_core::Identity;
use wardgate_core::constants::{IDENTITY_STORAGE_KEY, TOKEN_STORAGE_KEY};

use super::{Session, SessionToken};
use crate::error::{ServiceError, ServiceResult};
use crate::storage::{KeyValueStore, StorageError};

/// Sequence number of a session mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Attempt(u64);

/// Reasons a persisted session is not restored. Never surfaced to callers.
#[derive(Error, Debug)]
enum HydrationError {
    #[error("persisted identity is unreadable: {0}")]
    Unreadable(#[from] StorageError),

    #[error("persisted identity is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("persisted identity has expired")]
    Expired,
}

pub struct SessionStore {
    state: watch::Sender<Session>,
    storage: Arc<dyn KeyValueStore>,
    max_age: Option<chrono::Duration>,
    next_attempt: AtomicU64,
    applied: Mutex<u64>,
}

impl SessionStore {
    /// Create a store in the `Hydrating` state. Call [`Self::hydrate`] once at startup.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let (state, _rx) = watch::channel(Session::hydrating());
        Self {
            state,
            storage,
            max_age: None,
            next_attempt: AtomicU64::new(1),
            applied: Mutex::new(0),
        }
    }

    /// Sessions authenticated longer ago than `max_age` are dropped on
    /// hydration and by [`Self::expire_if_stale`].
    #[must_use]
    pub const fn with_max_age(mut self, max_age: Option<chrono::Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver that observes every published session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Resolves once the session is `Ready`.
    pub async fn wait_ready(&self) -> Session {
        let mut rx = self.subscribe();
        let ready = rx
            .wait_for(Session::is_ready)
            .await
            .map(|session| (*session).clone());
        // The sender lives in `self`, so the channel cannot be closed here.
        ready.unwrap_or_else(|_closed| self.snapshot())
    }

    /// Reserve the next attempt number. Take it before any suspension point so
    /// that attempts are ordered by when they started.
    pub fn begin_attempt(&self) -> Attempt {
        Attempt(self.next_attempt.fetch_add(1, Ordering::SeqCst))
    }

    /// ## Summary
    /// Restore the persisted identity, if any, and move to `Ready`.
    ///
    /// Missing, unreadable, corrupt or expired data all hydrate to an anonymous
    /// session; corrupt and expired blobs are removed.
    pub async fn hydrate(&self) -> Session {
        self.hydrate_at(Utc::now()).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn hydrate_at(&self, now: DateTime<Utc>) -> Session {
        let attempt = self.begin_attempt();
        let mut applied = self.applied.lock().await;
        if attempt.0 <= *applied {
            tracing::debug!(attempt = attempt.0, "Hydration superseded, keeping current session");
            return self.snapshot();
        }

        let session = match self.load_persisted(now).await {
            Ok(Some((identity, token))) => {
                tracing::info!(
                    role = %identity.role,
                    token = ?token,
                    "Session restored from storage"
                );
                Session::authenticated(identity, token)
            }
            Ok(None) => {
                tracing::debug!("No persisted session");
                Session::anonymous()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding persisted session");
                if !matches!(e, HydrationError::Unreadable(_)) {
                    self.remove_persisted().await;
                }
                Session::anonymous()
            }
        };

        *applied = attempt.0;
        self.state.send_replace(session.clone());
        session
    }

    async fn load_persisted(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<(Identity, Option<SessionToken>)>, HydrationError> {
        let Some(blob) = self.storage.get(IDENTITY_STORAGE_KEY).await? else {
            return Ok(None);
        };
        let identity: Identity = serde_json::from_slice(&blob)?;

        if let Some(max_age) = self.max_age {
            if identity.is_older_than(max_age, now) {
                return Err(HydrationError::Expired);
            }
        }

        let token = match self.storage.get(TOKEN_STORAGE_KEY).await {
            Ok(Some(bytes)) => String::from_utf8(bytes).ok().map(SessionToken::from_opaque),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted token");
                None
            }
        };

        Ok(Some((identity, token)))
    }

    /// ## Summary
    /// Persist `identity` and `token` and publish them as the current session.
    ///
    /// ## Errors
    /// - `Superseded` if a later attempt has already been applied; nothing changes.
    /// - `StorageError` if persisting fails; nothing is published.
    #[tracing::instrument(skip(self, identity, token), fields(attempt = attempt.0, role = %identity.role))]
    pub async fn commit(
        &self,
        attempt: Attempt,
        identity: Identity,
        token: SessionToken,
    ) -> ServiceResult<()> {
        let mut applied = self.applied.lock().await;
        if attempt.0 <= *applied {
            tracing::debug!(last_applied = *applied, "Commit superseded");
            return Err(ServiceError::Superseded);
        }

        let blob = serde_json::to_vec(&identity).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialize identity");
            ServiceError::InvariantViolation("identity must serialize")
        })?;

        // Token first: an identity blob without its token still hydrates, a
        // token without an identity is ignored.
        self.storage
            .set(TOKEN_STORAGE_KEY, token.expose().as_bytes().to_vec())
            .await?;
        if let Err(e) = self.storage.set(IDENTITY_STORAGE_KEY, blob).await {
            self.restore_persisted_token().await;
            return Err(e.into());
        }

        *applied = attempt.0;
        tracing::info!(token = %token, "Session committed");
        self.state
            .send_replace(Session::authenticated(identity, Some(token)));
        Ok(())
    }

    /// ## Summary
    /// Drop the current identity, remove persisted data and publish an
    /// anonymous session.
    ///
    /// Never fails: storage errors are logged. Calling it repeatedly leaves the
    /// same anonymous state.
    #[tracing::instrument(skip(self))]
    pub async fn clear(&self) {
        self.clear_if(|_| true).await;
    }

    /// ## Summary
    /// Clear the session if its identity is older than the configured maximum
    /// age. Returns `true` if it was cleared.
    ///
    /// Staleness is judged on the session current when the clear is applied,
    /// so a login that lands first is kept.
    pub async fn expire_if_stale(&self, now: DateTime<Utc>) -> bool {
        let Some(max_age) = self.max_age else {
            return false;
        };

        let expired = self
            .clear_if(|session| {
                session
                    .identity()
                    .is_some_and(|identity| identity.is_older_than(max_age, now))
            })
            .await;
        if expired {
            tracing::info!("Session expired");
        }
        expired
    }

    /// Clears under the apply lock when `should_clear` holds for the session
    /// current at that point. Returns whether it cleared.
    async fn clear_if(&self, should_clear: impl FnOnce(&Session) -> bool) -> bool {
        let attempt = self.begin_attempt();
        let mut applied = self.applied.lock().await;
        if attempt.0 <= *applied {
            tracing::debug!(attempt = attempt.0, "Clear superseded");
            return false;
        }
        if !should_clear(&*self.state.borrow()) {
            return false;
        }

        self.remove_persisted().await;

        *applied = attempt.0;
        self.state.send_replace(Session::anonymous());
        tracing::info!("Session cleared");
        true
    }

    /// Puts the token of the published session back after a failed commit,
    /// so storage never pairs the old identity with the new token.
    async fn restore_persisted_token(&self) {
        let previous = self.state.borrow().token().cloned();
        let restored = match previous {
            Some(token) => {
                self.storage
                    .set(TOKEN_STORAGE_KEY, token.expose().as_bytes().to_vec())
                    .await
            }
            None => self.storage.remove(TOKEN_STORAGE_KEY).await,
        };
        if let Err(e) = restored {
            tracing::error!(error = %e, "Failed to restore persisted token after a failed commit");
        }
    }

    async fn remove_persisted(&self) {
        for key in [IDENTITY_STORAGE_KEY, TOKEN_STORAGE_KEY] {
            if let Err(e) = self.storage.remove(key).await {
                tracing::warn!(error = %e, key, "Failed to remove persisted session data");
            }
        }
    }
}
