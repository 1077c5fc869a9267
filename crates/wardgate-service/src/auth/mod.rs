//! Authentication flow.
//!
//! ## Module Organization
//!
//! - `credentials`: the [`CredentialVerifier`] seam and the configured user directory
//! - `password`: Password hashing and verification with Argon2
//! - `service`: [`AuthService`], which turns a login form into a committed session

pub mod credentials;
pub mod password;
pub mod service;

pub use credentials::{CredentialVerifier, DirectoryVerifier, VerifyFuture};
pub use service::{AuthService, SignedIn};
