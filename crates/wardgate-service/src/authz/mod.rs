//! Authorization.
//!
//! ## Module Organization
//!
//! - `evaluator`: the pure session/requirement decision function
//! - `policy`: Casbin enforcer for per-role dashboard actions

pub mod evaluator;
pub mod policy;

pub use evaluator::{allowed_destinations, evaluate};
pub use policy::CapabilityPolicy;
