//! Salvo host for wardgate: guarded views, the login API and the
//! composition of session, auth and guard services.

pub mod app;
pub mod cookies;
pub mod error;
pub mod middleware;
pub mod state;
