use log::debug;
use std::sync::Arc;

use super::users_model::{NewUser, User};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::errors::{Result, ValidationError};

/// Service for managing users.
///
/// Uniqueness of name and email is checked here before insertion; the
/// storage layer additionally enforces both through unique indexes.
pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, new_user: NewUser) -> Result<User> {
        if new_user.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        if !is_well_formed_email(&new_user.email) {
            return Err(ValidationError::InvalidInput(
                "The email must be a valid email address".to_string(),
            )
            .into());
        }
        if self.repository.find_by_name(&new_user.name)?.is_some() {
            return Err(ValidationError::InvalidInput(
                "The name has already been taken".to_string(),
            )
            .into());
        }
        if self.repository.find_by_email(&new_user.email)?.is_some() {
            return Err(ValidationError::InvalidInput(
                "The email has already been taken".to_string(),
            )
            .into());
        }
        debug!("Registering user {}", new_user.email);
        self.repository.insert_new_user(new_user).await
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        self.repository.get_by_id(user_id)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.repository.find_by_email(email)
    }
}

fn is_well_formed_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
