//! Database models for savings goals.
//!
//! Enum fields are stored as text; conversion back to the domain enums is
//! fallible, so the row-to-domain direction is `TryFrom`.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use nestfund_core::savings::{NewSaving, Saving};

/// Database model for savings goals
#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::savings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SavingDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount: i64,
    pub saving_frequency: String,
    pub nominal_per_frequency: i64,
    pub current_savings: i64,
    pub remaining_amount: i64,
    pub remaining_days: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub image: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for creating a new savings goal
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::savings)]
pub struct NewSavingDB {
    pub id: Option<String>,
    pub user_id: String,
    pub name: String,
    pub target_amount: i64,
    pub saving_frequency: String,
    pub nominal_per_frequency: i64,
    pub current_savings: i64,
    pub remaining_amount: i64,
    pub remaining_days: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub image: String,
}

impl TryFrom<SavingDB> for Saving {
    type Error = nestfund_core::Error;

    fn try_from(db: SavingDB) -> Result<Self, Self::Error> {
        Ok(Saving {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            target_amount: db.target_amount,
            saving_frequency: db.saving_frequency.parse()?,
            nominal_per_frequency: db.nominal_per_frequency,
            current_savings: db.current_savings,
            remaining_amount: db.remaining_amount,
            remaining_days: db.remaining_days,
            start_date: db.start_date,
            end_date: db.end_date,
            status: db.status.parse()?,
            image: db.image,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<NewSaving> for NewSavingDB {
    fn from(domain: NewSaving) -> Self {
        Self {
            id: domain.id,
            user_id: domain.user_id,
            name: domain.name,
            target_amount: domain.target_amount,
            saving_frequency: domain.saving_frequency.as_str().to_string(),
            nominal_per_frequency: domain.nominal_per_frequency,
            current_savings: domain.current_savings,
            remaining_amount: domain.remaining_amount,
            remaining_days: domain.remaining_days,
            start_date: domain.start_date,
            end_date: domain.end_date,
            status: domain.status.as_str().to_string(),
            image: domain.image,
        }
    }
}
