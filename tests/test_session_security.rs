mod common;

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::EnvGuard;
use launchpad::{
    config::session::{validate_production_config, SessionConfig},
    test_utils::test_helpers,
};
use serial_test::serial;
use tower::ServiceExt;
use tower_sessions::cookie::{Cookie, SameSite};

fn hardened_production_env() -> EnvGuard {
    let mut env_guard = EnvGuard::default();
    env_guard.set("ENVIRONMENT", "production");
    env_guard.set("FORCE_HTTPS", "true");
    env_guard.set("SESSION_SECRET", STANDARD.encode([42u8; 64]));
    env_guard
}

async fn get_login() -> Response<Body> {
    let pool = test_helpers::create_test_db().await.unwrap();
    let app = test_helpers::create_test_app(&pool).await.unwrap();

    let response = app
        .oneshot(Request::builder().uri("/login").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response
}

fn issued_cookie(response: &Response<Body>) -> Cookie<'static> {
    let header = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login page to issue a session cookie")
        .to_str()
        .unwrap()
        .to_string();
    Cookie::parse(header).unwrap()
}

#[tokio::test]
#[serial]
async fn login_page_cookie_is_hardened_in_production() {
    let _env = hardened_production_env();
    validate_production_config().expect("hardened production config to validate");

    let response = get_login().await;
    let cookie = issued_cookie(&response);

    assert_eq!(cookie.name(), "__Host-session");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    assert_eq!(cookie.path().unwrap_or("/"), "/");
    assert!(cookie.domain().is_none(), "__Host- cookies carry no Domain");

    assert!(response
        .headers()
        .get("Strict-Transport-Security")
        .is_some());
}

#[tokio::test]
#[serial]
async fn login_page_cookie_in_development() {
    let mut env_guard = EnvGuard::default();
    env_guard.set("ENVIRONMENT", "development");
    env_guard.remove("SESSION_SECRET");

    let response = get_login().await;
    let cookie = issued_cookie(&response);

    assert_eq!(cookie.name(), "session");
    assert_eq!(cookie.http_only(), Some(true));
    assert_ne!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert!(response
        .headers()
        .get("Strict-Transport-Security")
        .is_none());
}

#[test]
#[serial]
fn production_requires_https_flag() {
    let mut env_guard = hardened_production_env();
    env_guard.remove("FORCE_HTTPS");

    assert!(validate_production_config().is_err());
}

#[test]
#[serial]
fn production_rejects_short_or_default_secrets() {
    let mut env_guard = hardened_production_env();

    env_guard.set("SESSION_SECRET", "changeme");
    assert!(validate_production_config().is_err());

    env_guard.set("SESSION_SECRET", format!("example{}", "x".repeat(64)));
    assert!(validate_production_config().is_err());
}

#[test]
#[serial]
fn production_requires_a_session_secret() {
    let mut env_guard = hardened_production_env();
    env_guard.remove("SESSION_SECRET");

    assert!(validate_production_config().is_err());
}

#[test]
#[serial]
fn development_needs_no_hardening() {
    let mut env_guard = EnvGuard::default();
    env_guard.set("ENVIRONMENT", "development");
    env_guard.remove("FORCE_HTTPS");
    env_guard.remove("SESSION_SECRET");

    assert!(validate_production_config().is_ok());

    let config = SessionConfig::from_env();
    assert!(!config.secure);
    assert!(config.http_only);
}
