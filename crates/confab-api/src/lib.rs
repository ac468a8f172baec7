//! confab-api — the peer process's two HTTP surfaces.
//!
//! The local API (`/api/...`) is consumed by UI clients and `confab-ctl`;
//! the P2P surface (`/p2p/...`) is the inbound listener other peers hit
//! directly. Both routers are built explicitly at startup.

pub mod handlers;
pub mod p2p;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub use handlers::ApiState;

/// Build the local API router, nested under `/api`.
pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/peers", get(handlers::handle_peers))
        .route("/messages", get(handlers::handle_messages))
        .route("/messages/poll", get(handlers::handle_poll_messages))
        .route("/peers/poll", get(handlers::handle_poll_peers))
        .route("/channels/poll", get(handlers::handle_poll_channels))
        .route("/handshake", post(handlers::handle_handshake))
        .route("/handshakes", get(handlers::handle_handshakes))
        .route("/send", post(handlers::handle_send))
        .route("/broadcast", post(handlers::handle_broadcast))
        .route("/channels", get(handlers::handle_channels))
        .route("/channel/create", post(handlers::handle_channel_create))
        .route("/channel/join", post(handlers::handle_channel_join))
        .route("/channel/send", post(handlers::handle_channel_send))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(cors)
}

/// Serve the local API on 127.0.0.1.
pub async fn serve(state: ApiState, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!(port, "local API listening on 127.0.0.1");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Serve the P2P inbound listener on all interfaces.
pub async fn serve_p2p(state: ApiState, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!(port, "P2P listener started");
    axum::serve(listener, p2p::router(state)).await?;
    Ok(())
}
