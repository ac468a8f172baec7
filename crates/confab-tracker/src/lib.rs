//! confab-tracker — the central directory service.
//!
//! A thin HTTP façade over [`Registry`]: every endpoint is stateless beyond
//! the registry mutation it performs. Callers are not authenticated — any
//! caller claiming a peer_id can unregister or impersonate it. That is an
//! accepted trust-boundary property of the protocol, not something this
//! façade papers over.

pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub use handlers::TrackerState;

/// Build the tracker router.
pub fn router(state: TrackerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/submit-info", post(handlers::handle_register))
        .route("/unregister", post(handlers::handle_unregister))
        .route("/get-list", get(handlers::handle_peer_list))
        .route("/connect-peer", post(handlers::handle_connect_info))
        .route("/channel/create", post(handlers::handle_channel_create))
        .route("/channel/join", post(handlers::handle_channel_join))
        .route("/channel/members", post(handlers::handle_channel_members))
        .route("/channels", get(handlers::handle_channel_list))
        .with_state(state)
        .layer(cors)
}

/// Serve the tracker on the given address.
pub async fn serve(state: TrackerState, host: &str, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!(host, port, "tracker listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
