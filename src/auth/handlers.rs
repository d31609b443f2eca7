use crate::auth::session::establish_session;
use crate::middleware::csrf::{csrf_token_for_form, validate_csrf_form_field};
use crate::services::{
    auth_service::LoginRequest,
    user_service::{CreateUserRequest, UserServiceError},
};
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

const INVALID_TOKEN_MSG: &str = "Your form expired. Please refresh the page and try again.";

#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
struct SignupTemplate {
    error: Option<String>,
    email: String,
    name: String,
    csrf_token: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    error: Option<String>,
    signup_success: bool,
    email: String,
    csrf_token: String,
}

#[derive(Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    csrf_token: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    csrf_token: String,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    signup: Option<String>,
}

pub async fn signup_page(session: Session) -> impl IntoResponse {
    SignupTemplate {
        error: None,
        email: String::new(),
        name: String::new(),
        csrf_token: csrf_token_for_form(&session).await,
    }
}

async fn signup_error(
    status: StatusCode,
    msg: &str,
    form: &SignupForm,
    session: &Session,
) -> Response {
    let template = SignupTemplate {
        error: Some(msg.to_string()),
        email: form.email.clone(),
        name: form.name.clone().unwrap_or_default(),
        csrf_token: csrf_token_for_form(session).await,
    };
    (status, template).into_response()
}

pub async fn signup_handler(
    State(app_state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Response {
    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return signup_error(StatusCode::FORBIDDEN, INVALID_TOKEN_MSG, &form, &session).await;
    }

    let request = CreateUserRequest {
        name: form.name.clone(),
        email: form.email.clone(),
        password: form.password.clone(),
    };

    match app_state.user_service.create_user(request).await {
        Ok(_) => Redirect::to("/login?signup=success").into_response(),
        Err(err) => {
            let (status, error_msg) = match err {
                UserServiceError::MissingCredentials => (
                    StatusCode::BAD_REQUEST,
                    "Signup failed: email and password are required.",
                ),
                UserServiceError::EmailTaken => (
                    StatusCode::BAD_REQUEST,
                    "Signup failed: that email is already registered.",
                ),
                other => {
                    tracing::error!(error = %other, "Signup failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Signup failed: something went wrong. Try again.",
                    )
                }
            };
            signup_error(status, error_msg, &form, &session).await
        }
    }
}

pub async fn login_page(session: Session, Query(query): Query<LoginQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: None,
        signup_success: query.signup.as_deref() == Some("success"),
        email: String::new(),
        csrf_token: csrf_token_for_form(&session).await,
    }
}

async fn login_error(status: StatusCode, msg: &str, email: &str, session: &Session) -> Response {
    let template = LoginTemplate {
        error: Some(msg.to_string()),
        signup_success: false,
        email: email.to_string(),
        csrf_token: csrf_token_for_form(session).await,
    };
    (status, template).into_response()
}

pub async fn login_handler(
    State(app_state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return login_error(StatusCode::FORBIDDEN, INVALID_TOKEN_MSG, &form.email, &session).await;
    }

    let request = LoginRequest {
        email: form.email.clone(),
        password: form.password,
    };

    let user = match app_state.auth_service.authenticate(request).await {
        Ok(user) => user,
        Err(err) => {
            tracing::debug!(error = %err, "Login rejected");
            return login_error(
                StatusCode::UNAUTHORIZED,
                "Login failed. Check your email and password.",
                &form.email,
                &session,
            )
            .await;
        }
    };

    if let Err(e) = establish_session(&session, &user).await {
        tracing::error!(error = %e, "Failed to create session");
        return login_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create session",
            &form.email,
            &session,
        )
        .await;
    }

    Redirect::to("/dashboard").into_response()
}

#[derive(Deserialize)]
pub struct LogoutForm {
    #[serde(default)]
    csrf_token: String,
}

pub async fn logout_handler(session: Session, Form(form): Form<LogoutForm>) -> Response {
    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return (StatusCode::FORBIDDEN, INVALID_TOKEN_MSG).into_response();
    }

    if let Err(e) = session.flush().await {
        tracing::warn!(error = %e, "Failed to flush session on logout");
    }
    Redirect::to("/").into_response()
}
