use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::password::hash_password,
    errors::{AppError, AppResult},
    models::{domain::User, dto::request::CreateUserRequest},
    repositories::UserRepository,
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Validates the payload, hashes the password and stores the new user.
    /// The username must be free; the unique index backs this check up under
    /// concurrent registrations.
    pub async fn register(&self, request: CreateUserRequest) -> AppResult<User> {
        request.validate()?;

        if self
            .repository
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(format!(
                "Username '{}' is already taken",
                request.username
            )));
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::from_request(request, password_hash);

        let created = self.repository.create(user).await?;
        log::info!("Registered user '{}'", created.username);

        Ok(created)
    }

    pub async fn get_user(&self, username: &str) -> AppResult<User> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("User with username '{}' not found", username))
            })
    }
}
