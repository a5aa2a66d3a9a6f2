//! Savings ledger domain models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, ValidationError};
use crate::users::User;

/// Suggested contribution cadence. Informational only: nothing schedules
/// or enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl SavingFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            SavingFrequency::Daily => "daily",
            SavingFrequency::Weekly => "weekly",
            SavingFrequency::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for SavingFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(SavingFrequency::Daily),
            "weekly" => Ok(SavingFrequency::Weekly),
            "monthly" => Ok(SavingFrequency::Monthly),
            other => Err(ValidationError::InvalidInput(format!(
                "The saving frequency must be one of daily, weekly, monthly (got '{other}')"
            ))
            .into()),
        }
    }
}

/// Lifecycle state of a goal. `Achieved` is terminal: no operation moves a
/// goal back to `InProgress` and nothing decreases `current_savings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingStatus {
    InProgress,
    Achieved,
}

impl SavingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SavingStatus::InProgress => "in_progress",
            SavingStatus::Achieved => "achieved",
        }
    }
}

impl std::str::FromStr for SavingStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(SavingStatus::InProgress),
            "achieved" => Ok(SavingStatus::Achieved),
            other => Err(ValidationError::InvalidInput(format!(
                "The status must be one of in_progress, achieved (got '{other}')"
            ))
            .into()),
        }
    }
}

impl std::fmt::Display for SavingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain model representing a savings goal.
///
/// Amounts are integers in the smallest currency unit. Derived fields
/// (`remaining_amount`, `remaining_days`, `status`) are maintained by
/// [`Saving::apply_contribution`] and never mutated elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Saving {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount: i64,
    pub saving_frequency: SavingFrequency,
    pub nominal_per_frequency: i64,
    pub current_savings: i64,
    pub remaining_amount: i64,
    pub remaining_days: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: SavingStatus,
    pub image: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Saving {
    pub fn is_achieved(&self) -> bool {
        self.status == SavingStatus::Achieved
    }

    /// Applies one contribution and recomputes the derived fields.
    ///
    /// `current_savings` has no upper clamp and may exceed the target;
    /// only `remaining_amount` floors at zero. Additions saturate at
    /// `i64::MAX` so an oversized amount cannot wrap the balance
    /// negative. Reaching the target flips the status to `achieved` and
    /// zeroes `remaining_days`.
    pub fn apply_contribution(&mut self, amount: i64) {
        self.current_savings = self.current_savings.saturating_add(amount);
        self.remaining_amount = self
            .target_amount
            .saturating_sub(self.current_savings)
            .max(0);
        if self.current_savings >= self.target_amount {
            self.status = SavingStatus::Achieved;
            self.remaining_days = 0;
        }
    }
}

/// Whole-day span between the two dates, as stored in `remaining_days`
/// at creation time.
pub fn remaining_days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Creation input before the image is attached and derived fields are set.
#[derive(Debug, Clone)]
pub struct SavingDraft {
    pub name: String,
    pub target_amount: i64,
    pub saving_frequency: SavingFrequency,
    pub nominal_per_frequency: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Fully validated insert model handed to the repository.
#[derive(Debug, Clone)]
pub struct NewSaving {
    pub id: Option<String>,
    pub user_id: String,
    pub name: String,
    pub target_amount: i64,
    pub saving_frequency: SavingFrequency,
    pub nominal_per_frequency: i64,
    pub current_savings: i64,
    pub remaining_amount: i64,
    pub remaining_days: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: SavingStatus,
    pub image: String,
}

/// Detail view: a goal together with its owner.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingWithOwner {
    #[serde(flatten)]
    pub saving: Saving,
    pub user: User,
}

/// An uploaded goal image as received at the HTTP boundary.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// File extension of the original upload, lowercased.
    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}
