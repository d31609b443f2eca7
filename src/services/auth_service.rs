use crate::models::user::User;
use crate::repositories::user_repository::UserRepository;
use crate::services::password::{hash_password, verify_password_blocking};
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Verified against when the email is unknown, so a miss costs the same as a
/// wrong password.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| match hash_password("launchpad-dummy-password") {
        Ok(hash) => Some(hash),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build dummy hash; unknown-email logins skip it");
            None
        }
    });

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("Session error: {0}")]
    SessionError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] crate::repositories::user_repository::RepositoryError),
}

impl From<tower_sessions::session::Error> for AuthServiceError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AuthServiceError::SessionError(err.to_string())
    }
}

pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, AuthServiceError> {
        let email = request.email.trim();
        if email.is_empty() || request.password.is_empty() {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let Some(user) = self.user_repository.find_by_email(email).await? else {
            if let Some(dummy_hash) = DUMMY_HASH.as_ref() {
                let _ = verify_password_blocking(request.password, dummy_hash.clone()).await;
            }
            tracing::warn!(email = %email, "Login failed: unknown email");
            return Err(AuthServiceError::InvalidCredentials);
        };

        if !verify_password_blocking(request.password, user.password_hash.clone()).await {
            tracing::warn!(email = %email, "Login failed: password mismatch");
            return Err(AuthServiceError::InvalidCredentials);
        }

        tracing::info!(user_id = user.id, "Login succeeded");
        Ok(user)
    }

    pub async fn get_user_by_id(&self, user_id: i64) -> Result<User, AuthServiceError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)
    }
}
