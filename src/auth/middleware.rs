use crate::auth::session::{resolve_session, SessionState};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

/// Gate a route on a server-validated session. The resolved `CurrentUser`
/// is placed in the request extensions for handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    match resolve_session(&session, &state.auth_service).await {
        Ok(SessionState::Authenticated(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(SessionState::Anonymous) => Redirect::to("/login").into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to resolve session");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

/// Send already-authenticated visitors of the login and signup pages on to
/// the dashboard.
pub async fn redirect_if_authenticated(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    match resolve_session(&session, &state.auth_service).await {
        Ok(SessionState::Authenticated(_)) => Redirect::to("/dashboard").into_response(),
        Ok(SessionState::Anonymous) => next.run(request).await,
        Err(e) => {
            tracing::error!(error = %e, "Failed to resolve session");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
