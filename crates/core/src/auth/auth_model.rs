use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One issued bearer token. Only a digest of the secret half is stored;
/// deleting the row revokes exactly this session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
    pub created_at: NaiveDateTime,
}

/// Input model for persisting a freshly issued token.
#[derive(Debug, Clone)]
pub struct NewAuthToken {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
}
