use crate::auth::CurrentUser;
use crate::middleware::csrf::csrf_token_for_form;
use crate::models::user::PublicUser;
use crate::services::{DashboardService, DashboardStats};
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension};
use tower_sessions::Session;

const RECENT_SIGNUPS_LIMIT: i64 = 5;

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    user_email: String,
    stats: DashboardStats,
    recent_signups: Vec<PublicUser>,
    csrf_token: String,
}

/// GET /dashboard - Show user dashboard
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let dashboard_service = DashboardService::new(state.pool.clone());

    let stats = dashboard_service.get_dashboard_stats().await.map_err(|e| {
        tracing::error!(error = ?e, "Failed to load dashboard stats");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load dashboard".to_string(),
        )
    })?;

    let recent_signups = dashboard_service
        .get_recent_signups(RECENT_SIGNUPS_LIMIT)
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, "Failed to load recent sign-ups");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load dashboard".to_string(),
            )
        })?;

    Ok(DashboardTemplate {
        user_email: user.email,
        stats,
        recent_signups,
        csrf_token: csrf_token_for_form(&session).await,
    })
}
