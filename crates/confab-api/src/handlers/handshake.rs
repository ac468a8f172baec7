//! /api/handshake, /api/handshakes — initiate and inspect pairwise trust.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use confab_core::proto::Status;
use confab_core::HandshakeRecord;

use super::{ApiError, ApiState};

// ── /api/handshake (POST) ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct HandshakeApiRequest {
    pub peer_id: String,
}

#[derive(Serialize)]
pub struct HandshakeApiResponse {
    pub status: Status,
    pub message: String,
    pub peer_username: String,
}

pub async fn handle_handshake(
    State(state): State<ApiState>,
    Json(req): Json<HandshakeApiRequest>,
) -> Result<Json<HandshakeApiResponse>, ApiError> {
    let peer_username = state.relay.handshake(&req.peer_id).await?;
    Ok(Json(HandshakeApiResponse {
        status: Status::Success,
        message: "Handshake accepted".to_string(),
        peer_username,
    }))
}

// ── /api/handshakes (GET) ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HandshakesResponse {
    pub status: Status,
    pub handshakes: HashMap<String, HandshakeRecord>,
}

pub async fn handle_handshakes(State(state): State<ApiState>) -> Json<HandshakesResponse> {
    let handshakes = state.relay.handshakes().list().into_iter().collect();
    Json(HandshakesResponse {
        status: Status::Success,
        handshakes,
    })
}
