//! Nestfund Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for Nestfund, a personal
//! savings-goal tracker. It is database-agnostic and defines traits that
//! are implemented by the `storage-sqlite` crate.

pub mod auth;
pub mod errors;
pub mod savings;
pub mod users;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
