//! ESTARIA Database — SurrealDB connection management and repository
//! implementations.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Bootstrap seeding ([`run_seed`])
//! - Repository implementations for the `estaria-core` traits
//! - Error types ([`DbError`])

mod connection;
mod error;
mod schema;
mod seed;

pub mod repository;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
pub use seed::run_seed;
