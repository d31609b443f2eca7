use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{debug, warn};
use uuid::Uuid;

pub const CSRF_TOKEN_KEY: &str = "csrf_token";

/// Tokens older than this are replaced rather than accepted.
const CSRF_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// CSRF Token structure for session storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfToken {
    pub value: String,
    pub created_at: i64,
}

impl CsrfToken {
    pub fn new() -> Self {
        Self {
            value: Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() - self.created_at > CSRF_TOKEN_TTL_SECS
    }
}

impl Default for CsrfToken {
    fn default() -> Self {
        Self::new()
    }
}

fn token_prefix(value: &str) -> &str {
    value.get(..8).unwrap_or(value)
}

/// Generate a new CSRF token and store in session
pub async fn generate_csrf_token(
    session: &Session,
) -> Result<String, tower_sessions::session::Error> {
    let token = CsrfToken::new();
    let value = token.value.clone();

    session.insert(CSRF_TOKEN_KEY, token).await?;

    debug!("Generated new CSRF token: {}", token_prefix(&value));
    Ok(value)
}

/// Get or create a CSRF token for the session
pub async fn get_or_create_csrf_token(
    session: &Session,
) -> Result<String, tower_sessions::session::Error> {
    let token: Option<CsrfToken> = session.get(CSRF_TOKEN_KEY).await?;

    match token {
        Some(existing_token) if !existing_token.is_expired() => Ok(existing_token.value),
        _ => generate_csrf_token(session).await,
    }
}

/// Render-side helper: a token for the form, or an empty string if the
/// session store is unavailable (the submission will then be rejected).
pub async fn csrf_token_for_form(session: &Session) -> String {
    get_or_create_csrf_token(session).await.unwrap_or_else(|e| {
        warn!("Failed to create CSRF token: {}", e);
        String::new()
    })
}

/// Validate the token submitted with a form against the one in the session.
/// A valid token is rotated so it cannot be replayed.
pub async fn validate_csrf_form_field(
    session: &Session,
    form_token: &str,
) -> Result<(), StatusCode> {
    let stored_token: Option<CsrfToken> = session.get(CSRF_TOKEN_KEY).await.map_err(|e| {
        warn!("Failed to get CSRF token from session: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let stored_token = match stored_token {
        Some(token) if !token.is_expired() => token,
        Some(_) => {
            warn!("CSRF token expired during form validation");
            return Err(StatusCode::FORBIDDEN);
        }
        None => {
            warn!("No CSRF token in session for form validation");
            return Err(StatusCode::FORBIDDEN);
        }
    };

    if form_token.is_empty() || form_token != stored_token.value {
        warn!(
            "CSRF form token mismatch: expected {}, got {}",
            token_prefix(&stored_token.value),
            token_prefix(form_token)
        );
        return Err(StatusCode::FORBIDDEN);
    }

    debug!("CSRF form token validated, regenerating for replay protection");
    let _ = generate_csrf_token(session).await;

    Ok(())
}
