use crate::errors::Result;
use crate::savings::savings_model::{
    ImageUpload, NewSaving, Saving, SavingDraft, SavingStatus, SavingWithOwner,
};
use crate::users::User;
use async_trait::async_trait;

/// Trait for saving repository operations
#[async_trait]
pub trait SavingRepositoryTrait: Send + Sync {
    fn load_savings(&self) -> Result<Vec<Saving>>;
    fn load_by_status(&self, status: SavingStatus, owner_id: &str) -> Result<Vec<Saving>>;
    fn get_by_id(&self, saving_id: &str) -> Result<Saving>;
    fn get_with_owner(&self, saving_id: &str) -> Result<SavingWithOwner>;
    async fn insert_new_saving(&self, new_saving: NewSaving) -> Result<Saving>;
    /// Applies the contribution as one serialized read-modify-write.
    async fn add_contribution(&self, saving_id: &str, amount: i64) -> Result<Saving>;
    async fn delete_saving(&self, saving_id: &str) -> Result<usize>;
}

/// Trait for saving service operations
#[async_trait]
pub trait SavingServiceTrait: Send + Sync {
    fn get_savings(&self) -> Result<Vec<Saving>>;
    fn get_savings_by_status(&self, caller: &User, status: SavingStatus) -> Result<Vec<Saving>>;
    fn get_saving(&self, saving_id: &str) -> Result<SavingWithOwner>;
    async fn create_saving(
        &self,
        caller: &User,
        draft: SavingDraft,
        upload: ImageUpload,
    ) -> Result<Saving>;
    async fn add_contribution(&self, caller: &User, saving_id: &str, amount: i64)
        -> Result<Saving>;
    async fn delete_saving(&self, caller: &User, saving_id: &str) -> Result<()>;
}

/// Seam for persisting uploaded goal images.
pub trait ImageStoreTrait: Send + Sync {
    /// Stores `bytes` under `filename` and returns the stored reference.
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<String>;
}
