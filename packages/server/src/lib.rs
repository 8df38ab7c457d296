//! HTTP server for Notecast: session-cookie authenticated JSON API over the
//! in-memory store.

use axum::{
    routing::{get, patch, post},
    Router,
};
use time::Duration;
use tokio::net::TcpListener;
use tokio::signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod error;
pub mod extract;
pub mod routes;
pub mod settings;
pub mod state;

use settings::Settings;
use state::AppState;

/// Build the application router with its session layer.
pub fn app(state: AppState, session_ttl: Duration) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(session_ttl));

    Router::new()
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/verify-email", post(routes::auth::verify_email))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route("/api/auth/user", get(routes::auth::current_user))
        .route("/api/auth/guest", get(routes::auth::guest))
        .route("/api/auth/social-tokens", post(routes::auth::social_tokens))
        .route(
            "/api/notes",
            get(routes::notes::list).post(routes::notes::create),
        )
        .route(
            "/api/notes/{id}",
            patch(routes::notes::update).delete(routes::notes::remove),
        )
        .route("/api/rephrase", post(routes::rephrase::rephrase))
        .route("/api/analytics/{note_id}", get(routes::analytics::by_note))
        .layer(TraceLayer::new_for_http())
        .layer(session_layer)
        .with_state(state)
}

pub async fn serve() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    let settings = Settings::new()?;
    let state = AppState::new(&settings)?;
    let router = app(state, Duration::hours(settings.session.hours));

    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
