//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `patch.rs`: create/partial-update payloads
//! - `repo.rs`: pool-backed repository

pub mod models;
pub mod patch;
pub mod repo;
pub mod schema;

pub use models::Quote;
pub use patch::{QuoteCreate, QuotePatch};
pub use repo::QuoteRepo;
pub use schema::SQLITE_INIT;
