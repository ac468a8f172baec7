//! Tracker endpoint handlers — registry operations as JSON.
//!
//! Errors stay HTTP 200 with `{status: "error", message}` bodies; the
//! protocol distinguishes outcomes by the `status` field, not the HTTP
//! status line.

use axum::extract::State;
use axum::Json;

use confab_core::proto::{
    Ack, ChannelListResponse, ChannelMember, ChannelRequest, ConnectInfoResponse, MembersRequest,
    MembersResponse, PeerIdRequest, PeerListResponse, RegisterRequest, RegisterResponse, Status,
    UnregisterResponse,
};
use confab_services::Registry;

#[derive(Clone)]
pub struct TrackerState {
    pub registry: Registry,
}

// ── /submit-info (POST) ───────────────────────────────────────────────────────

pub async fn handle_register(
    State(state): State<TrackerState>,
    Json(req): Json<RegisterRequest>,
) -> Json<RegisterResponse> {
    let total = state
        .registry
        .register(&req.peer_id, &req.ip, req.port, &req.username);
    tracing::info!(peer_id = %req.peer_id, username = %req.username, total, "registered");
    Json(RegisterResponse {
        status: Status::Success,
        total,
    })
}

// ── /unregister (POST) ────────────────────────────────────────────────────────

pub async fn handle_unregister(
    State(state): State<TrackerState>,
    Json(req): Json<PeerIdRequest>,
) -> Json<UnregisterResponse> {
    match state.registry.unregister(&req.peer_id) {
        Ok(total) => {
            tracing::info!(peer_id = %req.peer_id, total, "unregistered");
            Json(UnregisterResponse {
                status: Status::Success,
                total: Some(total),
                message: None,
            })
        }
        Err(e) => Json(UnregisterResponse {
            status: Status::Error,
            total: None,
            message: Some(e.to_string()),
        }),
    }
}

// ── /get-list (GET) ───────────────────────────────────────────────────────────

pub async fn handle_peer_list(State(state): State<TrackerState>) -> Json<PeerListResponse> {
    Json(PeerListResponse {
        status: Status::Success,
        peers: state.registry.list_peers(),
    })
}

// ── /connect-peer (POST) ──────────────────────────────────────────────────────

pub async fn handle_connect_info(
    State(state): State<TrackerState>,
    Json(req): Json<PeerIdRequest>,
) -> Json<ConnectInfoResponse> {
    match state.registry.lookup(&req.peer_id) {
        Some(info) => Json(ConnectInfoResponse {
            status: Status::Success,
            ip: Some(info.ip),
            port: Some(info.port),
            username: Some(info.username),
            message: None,
        }),
        None => Json(ConnectInfoResponse {
            status: Status::Error,
            ip: None,
            port: None,
            username: None,
            message: Some("Peer not found".to_string()),
        }),
    }
}

// ── /channel/create (POST) ────────────────────────────────────────────────────

pub async fn handle_channel_create(
    State(state): State<TrackerState>,
    Json(req): Json<ChannelRequest>,
) -> Json<Ack> {
    match state.registry.create_channel(&req.channel, &req.peer_id) {
        Ok(()) => {
            tracing::info!(channel = %req.channel, owner = %req.peer_id, "channel created");
            Json(Ack::success())
        }
        Err(e) => Json(Ack::error(e.to_string())),
    }
}

// ── /channel/join (POST) ──────────────────────────────────────────────────────

pub async fn handle_channel_join(
    State(state): State<TrackerState>,
    Json(req): Json<ChannelRequest>,
) -> Json<Ack> {
    match state.registry.join_channel(&req.channel, &req.peer_id) {
        Ok(()) => {
            tracing::info!(channel = %req.channel, peer_id = %req.peer_id, "joined channel");
            Json(Ack::success())
        }
        Err(e) => Json(Ack::error(e.to_string())),
    }
}

// ── /channel/members (POST) ───────────────────────────────────────────────────

pub async fn handle_channel_members(
    State(state): State<TrackerState>,
    Json(req): Json<MembersRequest>,
) -> Json<MembersResponse> {
    match state.registry.channel_members_resolved(&req.channel) {
        Ok(members) => Json(MembersResponse {
            status: Status::Success,
            members: members
                .into_iter()
                .map(|(id, username)| ChannelMember { id, username })
                .collect(),
            message: None,
        }),
        Err(e) => Json(MembersResponse {
            status: Status::Error,
            members: Vec::new(),
            message: Some(e.to_string()),
        }),
    }
}

// ── /channels (GET) ───────────────────────────────────────────────────────────

pub async fn handle_channel_list(State(state): State<TrackerState>) -> Json<ChannelListResponse> {
    Json(ChannelListResponse {
        status: Status::Success,
        channels: state.registry.list_channels(),
    })
}
