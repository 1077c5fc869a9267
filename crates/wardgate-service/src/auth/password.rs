use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use crate::error::{ServiceError, ServiceResult};
use wardgate_core::error::CoreError;
use wardgate_core::util::validation::{is_valid_password, password_validation_message};

/// ## Summary
/// Hashes a password using Argon2id with a random salt.
///
/// ## Errors
/// Returns `ValidationError` if the password is too short, or an error if
/// hashing fails.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    if !is_valid_password(password) {
        return Err(CoreError::ValidationError(password_validation_message()).into());
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::InvalidConfiguration(format!("Failed to hash password: {e}")))?;

    Ok(password_hash.to_string())
}

/// ## Summary
/// Checks that `password_hash` is a well-formed PHC string.
///
/// ## Errors
/// Returns `InvalidConfiguration` if the hash cannot be parsed.
pub fn validate_hash(password_hash: &str) -> ServiceResult<()> {
    PasswordHash::new(password_hash)
        .map(|_parsed| ())
        .map_err(|e| ServiceError::InvalidConfiguration(format!("Invalid password hash: {e}")))
}

/// ## Summary
/// Verifies a password against a stored Argon2 hash.
///
/// ## Errors
/// Returns `InvalidCredentials` if the password does not match, or
/// `InvalidConfiguration` if the hash format is invalid.
pub fn verify_password(password: &str, password_hash: &str) -> ServiceResult<()> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| ServiceError::InvalidConfiguration(format!("Invalid password hash: {e}")))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|err| {
            tracing::trace!("Password verification failed: {}", err);
            ServiceError::InvalidCredentials
        })
}
