use crate::models::user::{PublicUser, User};
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use crate::services::password::{self, PasswordError};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("User already exists")]
    EmailTaken,
    #[error("Password hashing failed: {0}")]
    HashingError(#[from] PasswordError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

#[derive(Debug, Default)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<PublicUser, UserServiceError> {
        let email = request.email.trim();
        if email.is_empty() || request.password.is_empty() {
            return Err(UserServiceError::MissingCredentials);
        }

        // Check before hashing so duplicates don't pay the argon2 cost
        if self.repository.find_by_email(email).await?.is_some() {
            return Err(UserServiceError::EmailTaken);
        }

        let password_hash = password::hash_password_blocking(request.password).await?;

        let name = request
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        match self
            .repository
            .create_user(name, email, &password_hash)
            .await
        {
            Ok(user) => {
                tracing::info!(user_id = user.id, email = %user.email, "User created");
                Ok(user.into())
            }
            // Lost a race with a concurrent signup for the same email
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<PublicUser>, UserServiceError> {
        let users = self.repository.list_users().await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_email(email).await?)
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_id(id).await?)
    }
}
