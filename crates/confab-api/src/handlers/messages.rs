//! /api/messages, /api/send, /api/broadcast — message log and outbound sends.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use confab_core::proto::{Ack, Status};
use confab_core::StoredMessage;

use super::{ApiError, ApiState};

// ── /api/messages (GET) ───────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MessagesResponse {
    pub status: Status,
    pub messages: Vec<StoredMessage>,
    pub timestamp: u64,
}

pub async fn handle_messages(State(state): State<ApiState>) -> Json<MessagesResponse> {
    let snap = state.relay.log().snapshot();
    Json(MessagesResponse {
        status: Status::Success,
        messages: snap.messages,
        timestamp: snap.timestamp,
    })
}

// ── /api/send (POST) ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendRequest {
    pub to: String,
    pub message: String,
}

pub async fn handle_send(
    State(state): State<ApiState>,
    Json(req): Json<SendRequest>,
) -> Result<Json<Ack>, ApiError> {
    state.relay.send_direct(&req.to, &req.message).await?;
    Ok(Json(Ack::success()))
}

// ── /api/broadcast (POST) ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BroadcastRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct BroadcastResponse {
    pub status: Status,
    pub sent: usize,
    pub requires_handshake: usize,
    pub message: String,
}

pub async fn handle_broadcast(
    State(state): State<ApiState>,
    Json(req): Json<BroadcastRequest>,
) -> Result<Json<BroadcastResponse>, ApiError> {
    let report = state.relay.broadcast(&req.message).await?;

    let mut summary = format!("Sent to {} peers", report.sent);
    if !report.requires_handshake.is_empty() {
        summary.push_str(&format!(
            " ({} peers require handshake first)",
            report.requires_handshake.len()
        ));
    }

    Ok(Json(BroadcastResponse {
        status: Status::Success,
        sent: report.sent,
        requires_handshake: report.requires_handshake.len(),
        message: summary,
    }))
}
