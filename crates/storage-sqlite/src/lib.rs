//! SQLite storage implementation for Nestfund.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `nestfund-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for users, session tokens, and savings
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. The `core` crate is database-agnostic and works with traits.
//! Writes are funneled through a single writer actor so read-modify-write
//! sequences (contributions in particular) serialize.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod auth_tokens;
pub mod savings;
pub mod users;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool, WriteHandle};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from nestfund-core for convenience
pub use nestfund_core::errors::{DatabaseError, Error, Result};
