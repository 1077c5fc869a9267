//! Login form field checks.
//!
//! ## Summary
//! Shape checks only. Whether the credentials are correct is decided by the
//! credential verifier, never here.

use serde::Serialize;

use crate::constants::MIN_PASSWORD_LENGTH;

/// A login form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginField {
    Email,
    Password,
    Role,
}

impl LoginField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::Role => "role",
        }
    }

    #[must_use]
    pub const fn required_message(self) -> &'static str {
        match self {
            Self::Email => "Email is required",
            Self::Password => "Password is required",
            Self::Role => "Role is required",
        }
    }
}

impl std::fmt::Display for LoginField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns every empty field, in form order.
#[must_use]
pub fn missing_fields(email: &str, password: &str, role: &str) -> Vec<LoginField> {
    [
        (LoginField::Email, email),
        (LoginField::Password, password),
        (LoginField::Role, role),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect()
}

/// Checks `local@domain.tld` shape: no whitespace, exactly one `@`, and a dot
/// inside the domain with text on both sides.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .rsplit_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

#[must_use]
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

#[must_use]
pub fn password_validation_message() -> String {
    format!("Password must be at least {MIN_PASSWORD_LENGTH} characters long")
}
