//! SeaORM entity models
//!
//! Table mappings for the PostgreSQL schema in `migrations/`.
//! Domain conversions live in the postgres adapters.

pub mod bots;
pub mod page_contacts;
pub mod page_facts;
pub mod pages;
pub mod questions;
pub mod user_credits;
