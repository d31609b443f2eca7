use crate::auth::{resolve_session, CurrentUser};
use crate::middleware::csrf::{csrf_token_for_form, validate_csrf_form_field};
use crate::models::user::PublicUser;
use crate::services::user_service::{CreateUserRequest, UserServiceError};
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use tower_sessions::Session;

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
struct IndexTemplate {
    authenticated: bool,
    technologies: &'static [&'static str],
}

#[derive(Template, WebTemplate)]
#[template(path = "users.html")]
struct UsersTemplate {
    user_email: String,
    users: Vec<PublicUser>,
    success_message: String,
    error_message: String,
    csrf_token: String,
}

const TECHNOLOGIES: &[&str] = &["Rust", "Axum", "Askama", "SQLx", "SQLite", "Argon2", "Docker"];

/// GET / - Landing page. The primary action depends on the server-resolved
/// session, not on whether a cookie happens to be present.
pub async fn index_handler(State(state): State<AppState>, session: Session) -> Response {
    let authenticated = match resolve_session(&session, &state.auth_service).await {
        Ok(session_state) => session_state.is_authenticated(),
        Err(e) => {
            tracing::warn!(error = %e, "Treating unresolvable session as anonymous");
            false
        }
    };

    IndexTemplate {
        authenticated,
        technologies: TECHNOLOGIES,
    }
    .into_response()
}

#[derive(Deserialize)]
pub struct UsersQuery {
    created: Option<String>,
}

#[derive(Deserialize)]
pub struct AddUserForm {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    csrf_token: String,
}

async fn render_users(
    state: &AppState,
    session: &Session,
    user: CurrentUser,
    status: StatusCode,
    success_message: String,
    error_message: String,
) -> Response {
    let users = match state.user_service.list_users().await {
        Ok(users) => users,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch users");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch users").into_response();
        }
    };

    let template = UsersTemplate {
        user_email: user.email,
        users,
        success_message,
        error_message,
        csrf_token: csrf_token_for_form(session).await,
    };
    (status, template).into_response()
}

/// GET /users - User list with an add-user form
pub async fn users_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
    Query(query): Query<UsersQuery>,
) -> Response {
    let success_message = if query.created.is_some() {
        "User added successfully.".to_string()
    } else {
        String::new()
    };

    render_users(
        &state,
        &session,
        user,
        StatusCode::OK,
        success_message,
        String::new(),
    )
    .await
}

/// POST /users - Add a user from the list page
pub async fn add_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
    Form(form): Form<AddUserForm>,
) -> Response {
    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return render_users(
            &state,
            &session,
            user,
            StatusCode::FORBIDDEN,
            String::new(),
            "Your form expired. Please try again.".to_string(),
        )
        .await;
    }

    let request = CreateUserRequest {
        name: form.name,
        email: form.email,
        password: form.password,
    };

    match state.user_service.create_user(request).await {
        Ok(created) => {
            tracing::debug!(user_id = created.id, "User added from list page");
            Redirect::to("/users?created=1").into_response()
        }
        Err(err) => {
            let (status, message) = match err {
                UserServiceError::MissingCredentials | UserServiceError::EmailTaken => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                other => {
                    tracing::error!(error = %other, "Failed to add user");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to create user".to_string(),
                    )
                }
            };
            render_users(&state, &session, user, status, String::new(), message).await
        }
    }
}
