//! Local API handlers — exposes peer state and relay operations as JSON.
//!
//! Every response carries `{status: "success" | "error", ...}`. Protocol
//! errors stay HTTP 200 with an error body — the local API reports
//! failures, it does not translate them into transport status codes (the
//! P2P surface in [`crate::p2p`] is the one place that does).

pub mod channels;
pub mod handshake;
pub mod messages;
pub mod peers;
pub mod poll;

use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum::Json;

use confab_core::proto::Ack;
use confab_core::ProtocolError;
use confab_services::{CountWatch, Relay};

#[derive(Clone)]
pub struct ApiState {
    pub relay: Arc<Relay>,
    /// Remembered peer/channel counts for the tracker-backed long-polls.
    pub watch: CountWatch,
}

/// Protocol error rendered as a `{status: "error", message}` body.
pub struct ApiError(pub ProtocolError);

impl From<ProtocolError> for ApiError {
    fn from(e: ProtocolError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Json(Ack::error(self.0.to_string())).into_response()
    }
}

// Re-export handler functions for use in router setup.
pub use channels::{
    handle_channel_create, handle_channel_join, handle_channel_send, handle_channels,
};
pub use handshake::{handle_handshake, handle_handshakes};
pub use messages::{handle_broadcast, handle_messages, handle_send};
pub use peers::handle_peers;
pub use poll::{handle_poll_channels, handle_poll_messages, handle_poll_peers};
