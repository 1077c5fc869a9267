//! Session, authentication and authorization services for wardgate.
//!
//! ## Module Organization
//!
//! - `auth`: login, logout and credential verification
//! - `authz`: permission evaluation and the capability policy
//! - `guard`: the route guard and route table
//! - `session`: the session store and bearer tokens
//! - `storage`: key-value persistence backends

pub mod auth;
pub mod authz;
pub mod error;
pub mod guard;
pub mod session;
pub mod storage;
