//! Forum Server Entry Point
//!
//! Uses `anyhow` for startup errors; request-level errors go through
//! `auth::AuthError`.

mod config;

use std::sync::Arc;

use auth::{AuthAppState, CurrentUser, InMemoryUserRepository, PgUserRepository, auth_routes};
use auth::domain::repository::UserRepository;
use axum::{Router, routing::get};
use platform::clock::{Clock, SystemClock};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "forums=info,auth=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    let addr = config.listen_addr();
    let AppConfig {
        database_url,
        login,
        ..
    } = config;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let app = match database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&url)
                .await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;
            tracing::info!("Migrations completed");

            build_app(AuthAppState::new(PgUserRepository::new(pool), login, clock))
        }
        None => {
            tracing::warn!("No database_url configured, accounts are kept in memory");
            build_app(AuthAppState::new(InMemoryUserRepository::new(), login, clock))
        }
    };

    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Auth routes plus the session-gated index page
fn build_app<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Send + Sync + 'static,
{
    auth_routes::<R>()
        .route("/", get(index))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn index(CurrentUser { user, .. }: CurrentUser) -> String {
    format!("Hello, {}!", user.display_name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::LoginConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use platform::clock::ManualClock;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_index_requires_login() {
        let app = build_app(AuthAppState::new(
            InMemoryUserRepository::new(),
            LoginConfig::development(),
            Arc::new(ManualClock::new(1_700_000_000)),
        ));

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("/login?error="));
    }
}
