//! User domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain model representing a registered user.
///
/// The password hash is never serialized into API responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    /// First given name, used to derive stored image filenames.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// Input model for creating a new user.
///
/// The password is hashed before it reaches this type.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
