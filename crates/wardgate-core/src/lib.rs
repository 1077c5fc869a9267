//! Core types for wardgate: the role table, identities, authorization
//! decisions, capability descriptors and configuration.

pub mod capability;
pub mod config;
pub mod constants;
pub mod error;
pub mod role;
pub mod types;
pub mod util;

pub use role::Role;
pub use types::{AuthorizationDecision, Identity, Lifecycle, PermissionRequirement};
