//! /api/channels, /api/channel/* — channel management and fan-out.
//!
//! Create and join are passthroughs to the tracker with this peer's own id
//! attached; send resolves membership and delivers peer-to-peer.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use confab_core::proto::{Ack, ChannelListResponse, Status};

use super::{ApiError, ApiState};

// ── /api/channels (GET) ───────────────────────────────────────────────────────

pub async fn handle_channels(
    State(state): State<ApiState>,
) -> Result<Json<ChannelListResponse>, ApiError> {
    let channels = state.relay.tracker().list_channels().await?;
    Ok(Json(ChannelListResponse {
        status: Status::Success,
        channels,
    }))
}

// ── /api/channel/create and /api/channel/join (POST) ──────────────────────────

#[derive(Deserialize)]
pub struct ChannelApiRequest {
    pub channel: String,
}

pub async fn handle_channel_create(
    State(state): State<ApiState>,
    Json(req): Json<ChannelApiRequest>,
) -> Result<Json<Ack>, ApiError> {
    let relay = &state.relay;
    relay
        .tracker()
        .create_channel(&req.channel, relay.peer_id())
        .await?;
    Ok(Json(Ack::success()))
}

pub async fn handle_channel_join(
    State(state): State<ApiState>,
    Json(req): Json<ChannelApiRequest>,
) -> Result<Json<Ack>, ApiError> {
    let relay = &state.relay;
    relay
        .tracker()
        .join_channel(&req.channel, relay.peer_id())
        .await?;
    Ok(Json(Ack::success()))
}

// ── /api/channel/send (POST) ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChannelSendRequest {
    pub channel: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ChannelSendResponse {
    pub status: Status,
    pub sent: usize,
    pub message: String,
}

pub async fn handle_channel_send(
    State(state): State<ApiState>,
    Json(req): Json<ChannelSendRequest>,
) -> Result<Json<ChannelSendResponse>, ApiError> {
    let sent = state.relay.send_channel(&req.channel, &req.message).await?;
    Ok(Json(ChannelSendResponse {
        status: Status::Success,
        sent,
        message: format!("Sent to {} members", sent),
    }))
}
