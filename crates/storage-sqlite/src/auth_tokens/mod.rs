//! SQLite storage implementation for session tokens.

mod model;
mod repository;

pub use model::{AuthTokenDB, NewAuthTokenDB};
pub use repository::AuthTokenRepository;
