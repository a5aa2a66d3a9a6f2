use nestfund_core::users::{NewUser, User, UserRepositoryTrait};
use nestfund_core::Result;

use super::model::{NewUserDB, UserDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::users;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use std::sync::Arc;
use uuid::Uuid;

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        UserRepository { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn get_by_id(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        let user_db = users::table
            .find(user_id)
            .first::<UserDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(User::from(user_db))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let user_db = users::table
            .filter(users::email.eq(email))
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(user_db.map(User::from))
    }

    fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let user_db = users::table
            .filter(users::name.eq(name))
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(user_db.map(User::from))
    }

    async fn insert_new_user(&self, new_user: NewUser) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let mut new_user_db: NewUserDB = new_user.into();
                new_user_db.id = Some(Uuid::new_v4().to_string());

                let result_db = diesel::insert_into(users::table)
                    .values(&new_user_db)
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(User::from(result_db))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, write_actor::spawn_writer};
    use nestfund_core::errors::DatabaseError;
    use nestfund_core::Error;
    use tempfile::tempdir;

    async fn create_test_repository() -> (UserRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let pool = create_pool(&db_path_str).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        (UserRepository::new(pool, writer), temp_dir)
    }

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            id: None,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "argon2-hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_lookups_find_it() {
        let (repo, _tmp) = create_test_repository().await;

        let user = repo
            .insert_new_user(new_user("Alice Doe", "alice@example.com"))
            .await
            .expect("insert failed");
        assert!(!user.id.is_empty());

        let by_id = repo.get_by_id(&user.id).expect("get_by_id failed");
        assert_eq!(by_id.email, "alice@example.com");

        let by_email = repo.find_by_email("alice@example.com").unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(user.id.clone()));

        let by_name = repo.find_by_name("Alice Doe").unwrap();
        assert_eq!(by_name.map(|u| u.id), Some(user.id));

        assert!(repo.find_by_email("nobody@example.com").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_unique_violation() {
        let (repo, _tmp) = create_test_repository().await;

        repo.insert_new_user(new_user("Alice Doe", "alice@example.com"))
            .await
            .unwrap();
        let result = repo
            .insert_new_user(new_user("Other Alice", "alice@example.com"))
            .await;
        assert!(matches!(
            result,
            Err(Error::Database(DatabaseError::UniqueViolation(_)))
        ));
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let (repo, _tmp) = create_test_repository().await;
        let result = repo.get_by_id("missing");
        assert!(matches!(
            result,
            Err(Error::Database(DatabaseError::NotFound(_)))
        ));
    }
}
