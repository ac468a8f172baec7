//! Inbound P2P surface — what other peers hit directly.
//!
//! Two endpoints, one request/response per connection. Handshake requests
//! are always accepted; messages go through the relay's receive path, which
//! enforces the handshake guard for direct and broadcast traffic. Bodies
//! are parsed by hand so a malformed payload maps to the structured 400
//! instead of a bare rejection.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use confab_core::proto::{Ack, HandshakeRequest, WireMessage};
use confab_core::ProtocolError;

use crate::handlers::ApiState;

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/p2p/handshake", post(handle_handshake))
        .route("/p2p/message", post(handle_message))
        .with_state(state)
}

// ── /p2p/handshake (POST) ─────────────────────────────────────────────────────

async fn handle_handshake(State(state): State<ApiState>, body: Bytes) -> Response {
    let req: HandshakeRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => return malformed(e),
    };
    Json(state.relay.accept_handshake(&req)).into_response()
}

// ── /p2p/message (POST) ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct MessageAck {
    status: String,
}

async fn handle_message(State(state): State<ApiState>, body: Bytes) -> Response {
    let msg: WireMessage = match serde_json::from_slice(&body) {
        Ok(msg) => msg,
        Err(e) => return malformed(e),
    };

    match state.relay.receive(msg) {
        Ok(()) => Json(MessageAck {
            status: "ok".to_string(),
        })
        .into_response(),
        Err(ProtocolError::HandshakeRequired) => (
            StatusCode::FORBIDDEN,
            Json(Ack::error("Handshake required")),
        )
            .into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, Json(Ack::error(e.to_string()))).into_response(),
    }
}

fn malformed(e: serde_json::Error) -> Response {
    let err = ProtocolError::Malformed(e.to_string());
    (StatusCode::BAD_REQUEST, Json(Ack::error(err.to_string()))).into_response()
}
