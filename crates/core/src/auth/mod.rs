//! Auth module - session token models and the token store boundary.
//!
//! Token issuance and verification live in the server; this module only
//! defines the persisted shape of a session token and the repository seam.

mod auth_model;
mod auth_traits;

pub use auth_model::{AuthToken, NewAuthToken};
pub use auth_traits::AuthTokenRepositoryTrait;
