use nestfund_core::auth::{AuthToken, AuthTokenRepositoryTrait, NewAuthToken};
use nestfund_core::Result;

use super::model::{AuthTokenDB, NewAuthTokenDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::auth_tokens;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use std::sync::Arc;

pub struct AuthTokenRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AuthTokenRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        AuthTokenRepository { pool, writer }
    }
}

#[async_trait]
impl AuthTokenRepositoryTrait for AuthTokenRepository {
    fn find_token(&self, token_id: &str) -> Result<Option<AuthToken>> {
        let mut conn = get_connection(&self.pool)?;
        let token_db = auth_tokens::table
            .find(token_id)
            .first::<AuthTokenDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(token_db.map(AuthToken::from))
    }

    async fn insert_token(&self, new_token: NewAuthToken) -> Result<AuthToken> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AuthToken> {
                let new_token_db: NewAuthTokenDB = new_token.into();
                let result_db = diesel::insert_into(auth_tokens::table)
                    .values(&new_token_db)
                    .returning(AuthTokenDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(AuthToken::from(result_db))
            })
            .await
    }

    async fn delete_token(&self, token_id: &str) -> Result<usize> {
        let token_id = token_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(auth_tokens::table.find(token_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
