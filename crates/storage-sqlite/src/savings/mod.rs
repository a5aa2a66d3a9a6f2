//! SQLite storage implementation for savings goals.

mod model;
mod repository;

pub use model::{NewSavingDB, SavingDB};
pub use repository::SavingRepository;
