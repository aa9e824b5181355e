//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Why manual mocks instead of mockall?
//! - mockall has lifetime issues with traits containing `&str` and slice parameters
//! - The in-memory repositories enforce the same version checks as Postgres
//! - Recorded calls make prompt assertions straightforward

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
