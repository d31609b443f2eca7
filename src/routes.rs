use crate::{
    auth::{self, middleware::{redirect_if_authenticated, require_auth}},
    config::session::SessionLayer,
    handlers::{self, user_api_handlers},
    middleware::add_security_headers,
    AppState,
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Assemble the full application router: pages, JSON API, static assets,
/// then the session, security-header and trace layers.
pub fn build_router(state: AppState, session_layer: SessionLayer) -> Router {
    let protected_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard_handler))
        .route(
            "/users",
            get(handlers::users_page).post(handlers::add_user_handler),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let guest_routes = Router::new()
        .route(
            "/login",
            get(auth::handlers::login_page).post(auth::handlers::login_handler),
        )
        .route(
            "/signup",
            get(auth::handlers::signup_page).post(auth::handlers::signup_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            redirect_if_authenticated,
        ));

    let api_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/users",
            get(user_api_handlers::list_users).post(user_api_handlers::create_user),
        );

    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/logout", post(auth::handlers::logout_handler))
        .merge(guest_routes)
        .merge(protected_routes)
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new("static"))
        .layer(session_layer)
        .layer(middleware::from_fn(add_security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
