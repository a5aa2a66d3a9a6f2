use nestfund_core::savings::{
    NewSaving, Saving, SavingRepositoryTrait, SavingStatus, SavingWithOwner,
};
use nestfund_core::users::User;
use nestfund_core::Result;

use super::model::{NewSavingDB, SavingDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{savings, users};
use crate::users::UserDB;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use std::sync::Arc;
use uuid::Uuid;

pub struct SavingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SavingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SavingRepository { pool, writer }
    }
}

fn into_domain(rows: Vec<SavingDB>) -> Result<Vec<Saving>> {
    rows.into_iter().map(Saving::try_from).collect()
}

#[async_trait]
impl SavingRepositoryTrait for SavingRepository {
    fn load_savings(&self) -> Result<Vec<Saving>> {
        let mut conn = get_connection(&self.pool)?;
        let savings_db = savings::table
            .order(savings::created_at.asc())
            .load::<SavingDB>(&mut conn)
            .map_err(StorageError::from)?;
        into_domain(savings_db)
    }

    fn load_by_status(&self, status: SavingStatus, owner_id: &str) -> Result<Vec<Saving>> {
        let mut conn = get_connection(&self.pool)?;
        let savings_db = savings::table
            .filter(savings::status.eq(status.as_str()))
            .filter(savings::user_id.eq(owner_id))
            .order(savings::created_at.asc())
            .load::<SavingDB>(&mut conn)
            .map_err(StorageError::from)?;
        into_domain(savings_db)
    }

    fn get_by_id(&self, saving_id: &str) -> Result<Saving> {
        let mut conn = get_connection(&self.pool)?;
        let saving_db = savings::table
            .find(saving_id)
            .first::<SavingDB>(&mut conn)
            .map_err(StorageError::from)?;
        Saving::try_from(saving_db)
    }

    fn get_with_owner(&self, saving_id: &str) -> Result<SavingWithOwner> {
        let mut conn = get_connection(&self.pool)?;
        let (saving_db, user_db) = savings::table
            .inner_join(users::table)
            .filter(savings::id.eq(saving_id))
            .select((SavingDB::as_select(), UserDB::as_select()))
            .first::<(SavingDB, UserDB)>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(SavingWithOwner {
            saving: Saving::try_from(saving_db)?,
            user: User::from(user_db),
        })
    }

    async fn insert_new_saving(&self, new_saving: NewSaving) -> Result<Saving> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Saving> {
                let mut new_saving_db: NewSavingDB = new_saving.into();
                new_saving_db.id = Some(Uuid::new_v4().to_string());

                let result_db = diesel::insert_into(savings::table)
                    .values(&new_saving_db)
                    .returning(SavingDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Saving::try_from(result_db)
            })
            .await
    }

    async fn add_contribution(&self, saving_id: &str, amount: i64) -> Result<Saving> {
        let saving_id = saving_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Saving> {
                // Read and update inside the same writer transaction, so
                // concurrent contributions serialize.
                let saving_db = savings::table
                    .find(&saving_id)
                    .first::<SavingDB>(conn)
                    .map_err(StorageError::from)?;
                let mut saving = Saving::try_from(saving_db)?;
                saving.apply_contribution(amount);

                let result_db = diesel::update(savings::table.find(&saving_id))
                    .set((
                        savings::current_savings.eq(saving.current_savings),
                        savings::remaining_amount.eq(saving.remaining_amount),
                        savings::remaining_days.eq(saving.remaining_days),
                        savings::status.eq(saving.status.as_str()),
                        savings::updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .returning(SavingDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Saving::try_from(result_db)
            })
            .await
    }

    async fn delete_saving(&self, saving_id: &str) -> Result<usize> {
        let saving_id = saving_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(savings::table.find(saving_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, get_connection, run_migrations, write_actor::spawn_writer};
    use chrono::NaiveDate;
    use diesel::RunQueryDsl;
    use nestfund_core::errors::DatabaseError;
    use nestfund_core::savings::SavingFrequency;
    use nestfund_core::Error;
    use tempfile::tempdir;

    /// Returns the repository, the pool (for fixtures), and the temp dir
    /// (kept alive so the database file is not removed mid-test).
    async fn create_test_repository() -> (SavingRepository, Arc<DbPool>, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let pool = create_pool(&db_path_str).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");

        // spawn_writer expects DbPool, not Arc<DbPool>
        let writer = spawn_writer((*pool).clone());

        let repo = SavingRepository::new(Arc::clone(&pool), writer);
        (repo, pool, temp_dir)
    }

    fn create_test_user(pool: &Arc<DbPool>, user_id: &str, name: &str) {
        let mut conn = get_connection(pool).expect("Failed to get connection");
        diesel::sql_query(format!(
            "INSERT INTO users (id, name, email, password_hash) \
             VALUES ('{user_id}', '{name}', '{name}@example.com', 'hash')"
        ))
        .execute(&mut conn)
        .expect("Failed to insert test user");
    }

    fn new_saving(user_id: &str, name: &str, target: i64) -> NewSaving {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        NewSaving {
            id: None,
            user_id: user_id.to_string(),
            name: name.to_string(),
            target_amount: target,
            saving_frequency: SavingFrequency::Weekly,
            nominal_per_frequency: 100,
            current_savings: 0,
            remaining_amount: target,
            remaining_days: (end - start).num_days(),
            start_date: start,
            end_date: end,
            status: SavingStatus::InProgress,
            image: "alice-1735689600.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_load_savings() {
        let (repo, pool, _tmp) = create_test_repository().await;
        create_test_user(&pool, "user-1", "alice");

        let inserted = repo
            .insert_new_saving(new_saving("user-1", "Laptop", 1000))
            .await
            .expect("insert failed");
        assert!(!inserted.id.is_empty());
        assert_eq!(inserted.current_savings, 0);
        assert_eq!(inserted.remaining_amount, 1000);
        assert_eq!(inserted.status, SavingStatus::InProgress);

        let all = repo.load_savings().expect("load failed");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Laptop");

        let fetched = repo.get_by_id(&inserted.id).expect("get failed");
        assert_eq!(fetched, inserted);
    }

    #[tokio::test]
    async fn test_contribution_updates_derived_fields() {
        let (repo, pool, _tmp) = create_test_repository().await;
        create_test_user(&pool, "user-1", "alice");

        let saving = repo
            .insert_new_saving(new_saving("user-1", "Laptop", 1000))
            .await
            .unwrap();

        let after_first = repo.add_contribution(&saving.id, 400).await.unwrap();
        assert_eq!(after_first.current_savings, 400);
        assert_eq!(after_first.remaining_amount, 600);
        assert_eq!(after_first.status, SavingStatus::InProgress);

        let after_second = repo.add_contribution(&saving.id, 700).await.unwrap();
        assert_eq!(after_second.current_savings, 1100);
        assert_eq!(after_second.remaining_amount, 0);
        assert_eq!(after_second.status, SavingStatus::Achieved);
        assert_eq!(after_second.remaining_days, 0);

        // The update is persisted, not just returned.
        let reloaded = repo.get_by_id(&saving.id).unwrap();
        assert_eq!(reloaded.current_savings, 1100);
        assert_eq!(reloaded.status, SavingStatus::Achieved);
    }

    #[tokio::test]
    async fn test_contribution_to_unknown_saving_is_not_found() {
        let (repo, _pool, _tmp) = create_test_repository().await;
        let result = repo.add_contribution("missing", 100).await;
        assert!(matches!(
            result,
            Err(Error::Database(DatabaseError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_load_by_status_is_scoped_to_owner() {
        let (repo, pool, _tmp) = create_test_repository().await;
        create_test_user(&pool, "user-1", "alice");
        create_test_user(&pool, "user-2", "bob");

        let mine = repo
            .insert_new_saving(new_saving("user-1", "Laptop", 1000))
            .await
            .unwrap();
        repo.insert_new_saving(new_saving("user-2", "Bike", 500))
            .await
            .unwrap();

        let in_progress = repo
            .load_by_status(SavingStatus::InProgress, "user-1")
            .unwrap();
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].id, mine.id);

        let achieved = repo.load_by_status(SavingStatus::Achieved, "user-1").unwrap();
        assert!(achieved.is_empty());

        repo.add_contribution(&mine.id, 1000).await.unwrap();
        let achieved = repo.load_by_status(SavingStatus::Achieved, "user-1").unwrap();
        assert_eq!(achieved.len(), 1);
    }

    #[tokio::test]
    async fn test_get_with_owner_joins_the_user() {
        let (repo, pool, _tmp) = create_test_repository().await;
        create_test_user(&pool, "user-1", "alice");

        let saving = repo
            .insert_new_saving(new_saving("user-1", "Laptop", 1000))
            .await
            .unwrap();

        let detail = repo.get_with_owner(&saving.id).unwrap();
        assert_eq!(detail.saving.id, saving.id);
        assert_eq!(detail.user.id, "user-1");
        assert_eq!(detail.user.name, "alice");
    }

    #[tokio::test]
    async fn test_delete_saving_reports_row_count() {
        let (repo, pool, _tmp) = create_test_repository().await;
        create_test_user(&pool, "user-1", "alice");

        let saving = repo
            .insert_new_saving(new_saving("user-1", "Laptop", 1000))
            .await
            .unwrap();

        assert_eq!(repo.delete_saving(&saving.id).await.unwrap(), 1);
        assert_eq!(repo.delete_saving(&saving.id).await.unwrap(), 0);
        assert!(repo.load_savings().unwrap().is_empty());
    }
}
