//! wardgate - integration test support.
//!
//! This crate re-exports the workspace crates so integration tests can use
//! `wardgate_test::component::` paths.

#![allow(ambiguous_glob_reexports)]

pub mod component {
    pub use wardgate_core::*;
    pub use wardgate_service::*;

    pub mod app {
        pub use wardgate_app::*;
    }
}
