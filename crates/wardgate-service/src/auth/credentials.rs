//! Credential verification.
//!
//! The auth service never checks passwords itself; it asks a
//! [`CredentialVerifier`]. [`DirectoryVerifier`] is the configured user
//! directory. Tests and other deployments plug in their own.

use std::future::Future;
use std::pin::Pin;

use chrono::Utc;

use super::password::{hash_password, validate_hash, verify_password};
use crate::error::{ServiceError, ServiceResult};
use wardgate_core::Identity;
use wardgate_core::Role;
use wardgate_core::config::AccountConfig;

pub type VerifyFuture<'a> = Pin<Box<dyn Future<Output = ServiceResult<Identity>> + Send + 'a>>;

pub trait CredentialVerifier: Send + Sync {
    /// Check `email` and `password` against the account registered for `role`.
    ///
    /// Must fail with `InvalidCredentials` for any mismatch, without saying
    /// which part was wrong.
    fn verify<'a>(&'a self, email: &'a str, password: &'a str, role: Role) -> VerifyFuture<'a>;
}

#[derive(Clone)]
struct DirectoryAccount {
    email: String,
    password_hash: String,
    role: Role,
    display_name: String,
}

/// In-memory user directory loaded from configuration.
pub struct DirectoryVerifier {
    accounts: Vec<DirectoryAccount>,
    /// Verified against when no account matches, so unknown emails cost the
    /// same as wrong passwords.
    decoy_hash: String,
}

impl DirectoryVerifier {
    /// ## Summary
    /// Builds the directory from configured accounts.
    ///
    /// ## Errors
    /// Returns `InvalidConfiguration` if a hash is malformed or an
    /// (email, role) pair is registered twice.
    pub fn from_accounts(accounts: &[AccountConfig]) -> ServiceResult<Self> {
        let mut entries: Vec<DirectoryAccount> = Vec::with_capacity(accounts.len());

        for account in accounts {
            validate_hash(&account.password_hash)?;

            let duplicate = entries.iter().any(|existing| {
                existing.role == account.role
                    && existing.email.eq_ignore_ascii_case(account.email.trim())
            });
            if duplicate {
                return Err(ServiceError::InvalidConfiguration(format!(
                    "Account {} is registered twice for role {}",
                    account.email, account.role
                )));
            }

            entries.push(DirectoryAccount {
                email: account.email.trim().to_string(),
                password_hash: account.password_hash.clone(),
                role: account.role,
                display_name: account
                    .display_name
                    .clone()
                    .unwrap_or_else(|| account.role.label().to_string()),
            });
        }

        tracing::info!(account_count = entries.len(), "Credential directory loaded");

        Ok(Self {
            accounts: entries,
            decoy_hash: hash_password("decoy-password-never-matches")?,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl CredentialVerifier for DirectoryVerifier {
    #[tracing::instrument(skip(self, password))]
    fn verify<'a>(&'a self, email: &'a str, password: &'a str, role: Role) -> VerifyFuture<'a> {
        Box::pin(async move {
            let account = self
                .accounts
                .iter()
                .find(|account| account.role == role && account.email.eq_ignore_ascii_case(email))
                .cloned();

            let hash = account
                .as_ref()
                .map_or_else(|| self.decoy_hash.clone(), |a| a.password_hash.clone());
            let password = password.to_string();

            // Argon2 verification blocks; run it on the blocking pool.
            let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Password verification task failed");
                    ServiceError::InvariantViolation("password verification task panicked")
                })?;

            match (account, verified) {
                (Some(account), Ok(())) => Ok(Identity::new(account.display_name, role, Utc::now())),
                (_, Err(ServiceError::InvalidConfiguration(msg))) => {
                    Err(ServiceError::InvalidConfiguration(msg))
                }
                _ => Err(ServiceError::InvalidCredentials),
            }
        })
    }
}
