//! Server-side session resolution.
//!
//! A request is authenticated only when its signed session cookie maps to a
//! live record in the session store *and* that record names a user that
//! still exists. Cookie presence alone never counts.

use crate::models::user::User;
use crate::services::auth_service::{AuthService, AuthServiceError};
use tower_sessions::Session;

pub const USER_ID_KEY: &str = "user_id";
pub const EMAIL_KEY: &str = "email";
pub const AUTH_TIMESTAMP_KEY: &str = "auth_timestamp";

/// The user attached to an authenticated request.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticated(CurrentUser),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Anonymous => None,
        }
    }
}

/// Resolve the session into an explicit authenticated/anonymous result.
///
/// A session that points at a user who no longer exists is flushed.
pub async fn resolve_session(
    session: &Session,
    auth_service: &AuthService,
) -> Result<SessionState, AuthServiceError> {
    let Some(user_id) = session.get::<i64>(USER_ID_KEY).await? else {
        return Ok(SessionState::Anonymous);
    };

    match auth_service.get_user_by_id(user_id).await {
        Ok(user) => Ok(SessionState::Authenticated(user.into())),
        Err(AuthServiceError::UserNotFound) => {
            tracing::warn!(user_id, "Session refers to a missing user; flushing");
            session.flush().await?;
            Ok(SessionState::Anonymous)
        }
        Err(e) => Err(e),
    }
}

/// Bind an authenticated user to the session.
///
/// The session id is rotated first so an id planted before login is useless
/// afterwards.
pub async fn establish_session(session: &Session, user: &User) -> Result<(), AuthServiceError> {
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user.id).await?;
    session.insert(EMAIL_KEY, user.email.as_str()).await?;
    session
        .insert(AUTH_TIMESTAMP_KEY, chrono::Utc::now().timestamp())
        .await?;
    Ok(())
}
