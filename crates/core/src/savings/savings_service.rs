use chrono::Utc;
use log::debug;
use std::sync::Arc;

use super::savings_model::{
    remaining_days_between, ImageUpload, NewSaving, Saving, SavingDraft, SavingStatus,
    SavingWithOwner,
};
use super::savings_traits::{ImageStoreTrait, SavingRepositoryTrait, SavingServiceTrait};
use crate::errors::{Error, Result, ValidationError};
use crate::users::User;

const ACCEPTED_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
const MIN_NAME_LEN: usize = 3;

/// Service for managing savings goals.
///
/// All mutation of a goal flows through here; the repository serializes
/// writes, so the derived-field invariants hold under concurrent callers.
pub struct SavingService {
    repository: Arc<dyn SavingRepositoryTrait>,
    image_store: Arc<dyn ImageStoreTrait>,
}

impl SavingService {
    pub fn new(
        repository: Arc<dyn SavingRepositoryTrait>,
        image_store: Arc<dyn ImageStoreTrait>,
    ) -> Self {
        Self {
            repository,
            image_store,
        }
    }

    /// Reports the first violated rule, in declaration order.
    fn validate_draft(draft: &SavingDraft) -> Result<()> {
        if draft.name.trim().chars().count() < MIN_NAME_LEN {
            return Err(ValidationError::InvalidInput(
                "The name must be at least 3 characters".to_string(),
            )
            .into());
        }
        if draft.target_amount < 1 {
            return Err(ValidationError::InvalidInput(
                "The target amount must be at least 1".to_string(),
            )
            .into());
        }
        if draft.nominal_per_frequency < 1 {
            return Err(ValidationError::InvalidInput(
                "The nominal per frequency must be at least 1".to_string(),
            )
            .into());
        }
        if draft.end_date < draft.start_date {
            return Err(ValidationError::InvalidInput(
                "The end date must be on or after the start date".to_string(),
            )
            .into());
        }
        Ok(())
    }

    fn validate_upload(upload: &ImageUpload) -> Result<String> {
        let ext = upload.extension().ok_or_else(|| {
            ValidationError::InvalidInput("The image must have a file extension".to_string())
        })?;
        if !ACCEPTED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ValidationError::InvalidInput(
                "The image must be a file of type: jpg, jpeg, png".to_string(),
            )
            .into());
        }
        Ok(ext)
    }
}

#[async_trait::async_trait]
impl SavingServiceTrait for SavingService {
    fn get_savings(&self) -> Result<Vec<Saving>> {
        self.repository.load_savings()
    }

    fn get_savings_by_status(&self, caller: &User, status: SavingStatus) -> Result<Vec<Saving>> {
        self.repository.load_by_status(status, &caller.id)
    }

    fn get_saving(&self, saving_id: &str) -> Result<SavingWithOwner> {
        self.repository.get_with_owner(saving_id)
    }

    async fn create_saving(
        &self,
        caller: &User,
        draft: SavingDraft,
        upload: ImageUpload,
    ) -> Result<Saving> {
        Self::validate_draft(&draft)?;
        let ext = Self::validate_upload(&upload)?;

        let filename = format!(
            "{}-{}.{}",
            caller.first_name().to_lowercase(),
            Utc::now().timestamp(),
            ext
        );
        let stored = self.image_store.save(&filename, &upload.bytes)?;

        let new_saving = NewSaving {
            id: None,
            user_id: caller.id.clone(),
            name: draft.name.trim().to_string(),
            target_amount: draft.target_amount,
            saving_frequency: draft.saving_frequency,
            nominal_per_frequency: draft.nominal_per_frequency,
            current_savings: 0,
            remaining_amount: draft.target_amount,
            remaining_days: remaining_days_between(draft.start_date, draft.end_date),
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: SavingStatus::InProgress,
            image: stored,
        };
        debug!(
            "Creating saving '{}' for user {}",
            new_saving.name, caller.id
        );
        self.repository.insert_new_saving(new_saving).await
    }

    async fn add_contribution(
        &self,
        caller: &User,
        saving_id: &str,
        amount: i64,
    ) -> Result<Saving> {
        if amount < 1 {
            return Err(ValidationError::InvalidInput(
                "The amount must be at least 1".to_string(),
            )
            .into());
        }
        let saving = self.repository.get_by_id(saving_id)?;
        if saving.user_id != caller.id {
            return Err(Error::Forbidden(
                "You are not authorized to update this saving".to_string(),
            ));
        }
        debug!("Adding contribution of {} to saving {}", amount, saving_id);
        self.repository.add_contribution(saving_id, amount).await
    }

    async fn delete_saving(&self, caller: &User, saving_id: &str) -> Result<()> {
        let saving = self.repository.get_by_id(saving_id)?;
        if saving.user_id != caller.id {
            return Err(Error::Forbidden(
                "You are not authorized to delete this saving".to_string(),
            ));
        }
        self.repository.delete_saving(saving_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DatabaseError;
    use crate::savings::SavingFrequency;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct InMemorySavingRepository {
        savings: Mutex<HashMap<String, Saving>>,
        owner: User,
    }

    impl InMemorySavingRepository {
        fn new(owner: User) -> Self {
            Self {
                savings: Mutex::new(HashMap::new()),
                owner,
            }
        }
    }

    #[async_trait::async_trait]
    impl SavingRepositoryTrait for InMemorySavingRepository {
        fn load_savings(&self) -> Result<Vec<Saving>> {
            Ok(self.savings.lock().unwrap().values().cloned().collect())
        }

        fn load_by_status(&self, status: SavingStatus, owner_id: &str) -> Result<Vec<Saving>> {
            Ok(self
                .savings
                .lock()
                .unwrap()
                .values()
                .filter(|s| s.status == status && s.user_id == owner_id)
                .cloned()
                .collect())
        }

        fn get_by_id(&self, saving_id: &str) -> Result<Saving> {
            self.savings
                .lock()
                .unwrap()
                .get(saving_id)
                .cloned()
                .ok_or_else(|| DatabaseError::NotFound(saving_id.to_string()).into())
        }

        fn get_with_owner(&self, saving_id: &str) -> Result<SavingWithOwner> {
            Ok(SavingWithOwner {
                saving: self.get_by_id(saving_id)?,
                user: self.owner.clone(),
            })
        }

        async fn insert_new_saving(&self, new_saving: NewSaving) -> Result<Saving> {
            let now = chrono::Utc::now().naive_utc();
            let saving = Saving {
                id: new_saving.id.unwrap_or_else(|| "s-1".to_string()),
                user_id: new_saving.user_id,
                name: new_saving.name,
                target_amount: new_saving.target_amount,
                saving_frequency: new_saving.saving_frequency,
                nominal_per_frequency: new_saving.nominal_per_frequency,
                current_savings: new_saving.current_savings,
                remaining_amount: new_saving.remaining_amount,
                remaining_days: new_saving.remaining_days,
                start_date: new_saving.start_date,
                end_date: new_saving.end_date,
                status: new_saving.status,
                image: new_saving.image,
                created_at: now,
                updated_at: now,
            };
            self.savings
                .lock()
                .unwrap()
                .insert(saving.id.clone(), saving.clone());
            Ok(saving)
        }

        async fn add_contribution(&self, saving_id: &str, amount: i64) -> Result<Saving> {
            let mut savings = self.savings.lock().unwrap();
            let saving = savings
                .get_mut(saving_id)
                .ok_or_else(|| DatabaseError::NotFound(saving_id.to_string()))?;
            saving.apply_contribution(amount);
            Ok(saving.clone())
        }

        async fn delete_saving(&self, saving_id: &str) -> Result<usize> {
            Ok(self
                .savings
                .lock()
                .unwrap()
                .remove(saving_id)
                .map(|_| 1)
                .unwrap_or(0))
        }
    }

    struct NullImageStore;

    impl ImageStoreTrait for NullImageStore {
        fn save(&self, filename: &str, _bytes: &[u8]) -> Result<String> {
            Ok(filename.to_string())
        }
    }

    fn owner() -> User {
        let now = chrono::Utc::now().naive_utc();
        User {
            id: "user-1".to_string(),
            name: "Alice Doe".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn stranger() -> User {
        let now = chrono::Utc::now().naive_utc();
        User {
            id: "user-2".to_string(),
            name: "Mallory".to_string(),
            email: "mallory@example.com".to_string(),
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn service_for(owner: User) -> SavingService {
        SavingService::new(
            Arc::new(InMemorySavingRepository::new(owner)),
            Arc::new(NullImageStore),
        )
    }

    fn draft(target: i64) -> SavingDraft {
        SavingDraft {
            name: "Vacation".to_string(),
            target_amount: target,
            saving_frequency: SavingFrequency::Weekly,
            nominal_per_frequency: 100,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
        }
    }

    fn upload() -> ImageUpload {
        ImageUpload {
            filename: "goal.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    #[tokio::test]
    async fn create_sets_defaults_and_derived_fields() {
        let service = service_for(owner());
        let saving = service
            .create_saving(&owner(), draft(1000), upload())
            .await
            .unwrap();

        assert_eq!(saving.current_savings, 0);
        assert_eq!(saving.remaining_amount, 1000);
        assert_eq!(saving.remaining_days, 10);
        assert_eq!(saving.status, SavingStatus::InProgress);
        assert!(saving.image.starts_with("alice-"));
        assert!(saving.image.ends_with(".png"));
    }

    #[tokio::test]
    async fn create_reports_first_violated_rule() {
        let service = service_for(owner());

        let mut d = draft(1000);
        d.name = "ab".to_string();
        d.target_amount = 0;
        let err = service
            .create_saving(&owner(), d, upload())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("name"), "{err}");

        let mut d = draft(0);
        d.nominal_per_frequency = 0;
        let err = service
            .create_saving(&owner(), d, upload())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("target amount"), "{err}");
    }

    #[tokio::test]
    async fn create_rejects_end_date_before_start_date() {
        let service = service_for(owner());
        let mut d = draft(1000);
        d.end_date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let err = service
            .create_saving(&owner(), d, upload())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_unsupported_image_type() {
        let service = service_for(owner());
        let mut up = upload();
        up.filename = "goal.gif".to_string();
        let err = service
            .create_saving(&owner(), draft(1000), up)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn contribution_scenario_reaches_achieved() {
        let service = service_for(owner());
        let saving = service
            .create_saving(&owner(), draft(1000), upload())
            .await
            .unwrap();

        let saving = service
            .add_contribution(&owner(), &saving.id, 400)
            .await
            .unwrap();
        assert_eq!(saving.current_savings, 400);
        assert_eq!(saving.remaining_amount, 600);
        assert_eq!(saving.status, SavingStatus::InProgress);

        let saving = service
            .add_contribution(&owner(), &saving.id, 700)
            .await
            .unwrap();
        assert_eq!(saving.current_savings, 1100);
        assert_eq!(saving.remaining_amount, 0);
        assert_eq!(saving.status, SavingStatus::Achieved);
        assert_eq!(saving.remaining_days, 0);
    }

    #[tokio::test]
    async fn contribution_rejects_non_positive_amount() {
        let service = service_for(owner());
        let saving = service
            .create_saving(&owner(), draft(1000), upload())
            .await
            .unwrap();
        for amount in [0, -5] {
            let err = service
                .add_contribution(&owner(), &saving.id, amount)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
    }

    #[tokio::test]
    async fn contribution_by_non_owner_is_forbidden_and_leaves_goal_unchanged() {
        let service = service_for(owner());
        let saving = service
            .create_saving(&owner(), draft(1000), upload())
            .await
            .unwrap();

        let err = service
            .add_contribution(&stranger(), &saving.id, 400)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));

        let after = service.get_saving(&saving.id).unwrap().saving;
        assert_eq!(after.current_savings, 0);
        assert_eq!(after.remaining_amount, 1000);
        assert_eq!(after.status, SavingStatus::InProgress);
    }

    #[tokio::test]
    async fn contribution_to_unknown_goal_is_not_found() {
        let service = service_for(owner());
        let err = service
            .add_contribution(&owner(), "missing", 100)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_by_non_owner_is_forbidden() {
        let service = service_for(owner());
        let saving = service
            .create_saving(&owner(), draft(1000), upload())
            .await
            .unwrap();
        let err = service
            .delete_saving(&stranger(), &saving.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
        assert!(service.get_saving(&saving.id).is_ok());
    }

    #[tokio::test]
    async fn status_filter_is_scoped_to_caller() {
        let service = service_for(owner());
        let saving = service
            .create_saving(&owner(), draft(1000), upload())
            .await
            .unwrap();
        service
            .add_contribution(&owner(), &saving.id, 1000)
            .await
            .unwrap();

        let achieved = service
            .get_savings_by_status(&owner(), SavingStatus::Achieved)
            .unwrap();
        assert_eq!(achieved.len(), 1);

        let for_stranger = service
            .get_savings_by_status(&stranger(), SavingStatus::Achieved)
            .unwrap();
        assert!(for_stranger.is_empty());
    }
}
