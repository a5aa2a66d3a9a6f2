use crate::auth::auth_model::{AuthToken, NewAuthToken};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for session token repository operations
#[async_trait]
pub trait AuthTokenRepositoryTrait: Send + Sync {
    fn find_token(&self, token_id: &str) -> Result<Option<AuthToken>>;
    async fn insert_token(&self, new_token: NewAuthToken) -> Result<AuthToken>;
    async fn delete_token(&self, token_id: &str) -> Result<usize>;
}
