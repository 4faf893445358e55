//! Router assembly and server loop.

use std::sync::Arc;

use axum::{
    Router,
    routing::{any, get},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{config::ServerConfig, ui::state::AppState};

use super::{handler, signal::shutdown_signal};

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", any(handler::websocket_handler))
        .route("/api/health", get(handler::health_check))
        .route(
            "/api/houses",
            get(handler::get_houses).post(handler::create_house),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until a shutdown signal arrives.
pub async fn run(config: ServerConfig) -> Result<(), std::io::Error> {
    let addr = config.bind_addr();
    let state = Arc::new(AppState::new(config));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}
