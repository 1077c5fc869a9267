use thiserror::Error;

use wardgate_core::util::validation::LoginField;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Casbin error: {0}")]
    CasbinError(#[from] casbin::Error),

    #[error(transparent)]
    StorageError(#[from] crate::storage::StorageError),

    #[error(transparent)]
    CoreError(#[from] wardgate_core::error::CoreError),

    #[error("Missing required fields: {0:?}")]
    MissingFields(Vec<LoginField>),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Invalid role selected: {0}")]
    InvalidRole(String),

    /// Deliberately says nothing about which part of the credentials was wrong.
    #[error("Invalid credentials or role mismatch")]
    InvalidCredentials,

    #[error("Credential verification timed out")]
    Timeout,

    #[error("Superseded by a newer session attempt")]
    Superseded,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
