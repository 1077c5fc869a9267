//! The auth service: the only writer of the session store.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use super::credentials::CredentialVerifier;
use crate::error::{ServiceError, ServiceResult};
use crate::session::{SessionStore, SessionToken};
use wardgate_core::util::validation::{is_valid_email, missing_fields};
use wardgate_core::{Identity, Role};

/// A successful login: the committed identity and the token its client must
/// present from now on.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub identity: Identity,
    pub token: SessionToken,
}

pub struct AuthService {
    session: Arc<SessionStore>,
    verifier: Arc<dyn CredentialVerifier>,
    verify_timeout: Duration,
}

impl AuthService {
    #[must_use]
    pub fn new(
        session: Arc<SessionStore>,
        verifier: Arc<dyn CredentialVerifier>,
        verify_timeout: Duration,
    ) -> Self {
        Self {
            session,
            verifier,
            verify_timeout,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// ## Summary
    /// Validate the login form, verify credentials for the claimed role and
    /// commit the resulting identity.
    ///
    /// ## Errors
    /// - `MissingFields` if any field is empty
    /// - `InvalidRole` if `claimed_role` is not a known role
    /// - `InvalidEmail` if `email` is not shaped like an address
    /// - `InvalidCredentials` if verification fails
    /// - `Timeout` if verification takes longer than the configured limit
    /// - `Superseded` if a later login or logout finished first
    ///
    /// The session store is untouched on every error.
    #[tracing::instrument(skip(self, password), fields(role = %claimed_role))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        claimed_role: &str,
    ) -> ServiceResult<SignedIn> {
        let missing = missing_fields(email, password, claimed_role);
        if !missing.is_empty() {
            return Err(ServiceError::MissingFields(missing));
        }

        let role: Role = claimed_role
            .parse()
            .map_err(|_err| ServiceError::InvalidRole(claimed_role.to_string()))?;

        let email = email.trim();
        if !is_valid_email(email) {
            return Err(ServiceError::InvalidEmail);
        }

        let attempt = self.session.begin_attempt();

        let verification = self.verifier.verify(email, password, role);
        let identity = match tokio::time::timeout(self.verify_timeout, verification).await {
            Ok(Ok(identity)) => identity,
            Ok(Err(e)) => {
                tracing::info!(error = %e, "Login rejected");
                return Err(e);
            }
            Err(_elapsed) => {
                tracing::warn!(timeout = ?self.verify_timeout, "Credential verification timed out");
                return Err(ServiceError::Timeout);
            }
        };

        if identity.role != role {
            tracing::error!(
                verified_role = %identity.role,
                "Verifier returned an identity for a different role"
            );
            return Err(ServiceError::InvalidCredentials);
        }

        let token = SessionToken::generate();
        self.session
            .commit(attempt, identity.clone(), token.clone())
            .await?;

        tracing::info!(display_name = %identity.display_name, "Login succeeded");
        Ok(SignedIn { identity, token })
    }

    /// Clears the session. Always succeeds.
    #[tracing::instrument(skip(self))]
    pub async fn logout(&self) {
        self.session.clear().await;
    }

    /// Clears the session if it outlived the configured maximum age.
    pub async fn expire_stale_session(&self) -> bool {
        self.session.expire_if_stale(Utc::now()).await
    }
}
