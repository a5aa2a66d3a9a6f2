//! Database models for session tokens.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Database model for issued bearer tokens
#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::auth_tokens)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenDB {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
    pub created_at: NaiveDateTime,
}

/// Database model for persisting a freshly issued token
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::auth_tokens)]
pub struct NewAuthTokenDB {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
}

// Conversion to domain models
impl From<AuthTokenDB> for nestfund_core::auth::AuthToken {
    fn from(db: AuthTokenDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            token_hash: db.token_hash,
            created_at: db.created_at,
        }
    }
}

impl From<nestfund_core::auth::NewAuthToken> for NewAuthTokenDB {
    fn from(domain: nestfund_core::auth::NewAuthToken) -> Self {
        Self {
            id: domain.id,
            user_id: domain.user_id,
            token_hash: domain.token_hash,
        }
    }
}
