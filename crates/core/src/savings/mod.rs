//! Savings module - the goal ledger: domain models, service, and traits.

mod savings_model;
mod savings_service;
mod savings_traits;

pub use savings_model::{
    remaining_days_between, ImageUpload, NewSaving, Saving, SavingDraft, SavingFrequency,
    SavingStatus, SavingWithOwner,
};
pub use savings_service::SavingService;
pub use savings_traits::{ImageStoreTrait, SavingRepositoryTrait, SavingServiceTrait};
