//! Auth Router

use axum::{
    Router,
    http::{HeaderValue, header},
    routing::{get, post},
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Auth routes, state supplied by the caller
///
/// Lets the application add its own session-gated pages before
/// calling `with_state`.
pub fn auth_routes<R>() -> Router<AuthAppState<R>>
where
    R: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/login", get(handlers::login_page::<R>))
        .route("/register", get(handlers::register_page::<R>))
        .route("/auth/csrf", get(handlers::csrf_token::<R>))
        .route("/auth/login", post(handlers::login::<R>))
        .route("/auth/register", post(handlers::register::<R>))
        .route("/auth/logout", post(handlers::logout::<R>))
        .route("/auth/whoami", get(handlers::whoami))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

/// Create the Auth router for any repository implementation
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Send + Sync + 'static,
{
    auth_routes().with_state(state)
}
