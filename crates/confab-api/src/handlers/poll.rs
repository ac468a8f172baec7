//! Long-poll endpoints — bounded waits for message, peer, and channel
//! changes.
//!
//! Each poll blocks its request (never the process) for up to
//! [`POLL_TIMEOUT`], then returns a well-formed no-update response. Message
//! polls park on the log's notifier; peer and channel polls re-fetch the
//! tracker's counts at [`COUNT_POLL_INTERVAL`] because each check is a
//! network round trip. Concurrent pollers are independent — every request
//! captures its own baseline at poll start.

use std::time::Duration;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use confab_core::proto::Status;
use confab_core::StoredMessage;
use confab_services::now_millis;

use super::ApiState;

/// Longest a poll request is held open.
pub const POLL_TIMEOUT: Duration = Duration::from_secs(30);

/// Cadence of tracker count re-fetches while a peers/channels poll is
/// outstanding.
pub const COUNT_POLL_INTERVAL: Duration = Duration::from_secs(1);

// ── /api/messages/poll (GET) ──────────────────────────────────────────────────

#[derive(Serialize)]
pub struct PollMessagesResponse {
    pub status: Status,
    pub has_update: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<StoredMessage>>,
    pub timestamp: u64,
}

pub async fn handle_poll_messages(State(state): State<ApiState>) -> Json<PollMessagesResponse> {
    match state.relay.log().wait_for_update(POLL_TIMEOUT).await {
        Some(snap) => Json(PollMessagesResponse {
            status: Status::Success,
            has_update: true,
            messages: Some(snap.messages),
            timestamp: snap.timestamp,
        }),
        None => Json(PollMessagesResponse {
            status: Status::Success,
            has_update: false,
            messages: None,
            timestamp: now_millis(),
        }),
    }
}

// ── /api/peers/poll and /api/channels/poll (GET) ──────────────────────────────

#[derive(Serialize)]
pub struct PollResponse {
    pub status: Status,
    pub has_update: bool,
    pub timestamp: u64,
}

pub async fn handle_poll_peers(State(state): State<ApiState>) -> Json<PollResponse> {
    let baseline = state.watch.peers();
    let deadline = tokio::time::Instant::now() + POLL_TIMEOUT;

    loop {
        // A failed fetch is not an update; keep waiting for the next tick.
        if let Ok(peers) = state.relay.tracker().list_peers().await {
            if peers.len() != baseline {
                let timestamp = state.watch.remember_peers(peers.len());
                return Json(PollResponse {
                    status: Status::Success,
                    has_update: true,
                    timestamp,
                });
            }
        }
        if tokio::time::Instant::now() + COUNT_POLL_INTERVAL >= deadline {
            break;
        }
        tokio::time::sleep(COUNT_POLL_INTERVAL).await;
    }

    Json(PollResponse {
        status: Status::Success,
        has_update: false,
        timestamp: now_millis(),
    })
}

pub async fn handle_poll_channels(State(state): State<ApiState>) -> Json<PollResponse> {
    let baseline = state.watch.channels();
    let deadline = tokio::time::Instant::now() + POLL_TIMEOUT;

    loop {
        if let Ok(channels) = state.relay.tracker().list_channels().await {
            if channels.len() != baseline {
                let timestamp = state.watch.remember_channels(channels.len());
                return Json(PollResponse {
                    status: Status::Success,
                    has_update: true,
                    timestamp,
                });
            }
        }
        if tokio::time::Instant::now() + COUNT_POLL_INTERVAL >= deadline {
            break;
        }
        tokio::time::sleep(COUNT_POLL_INTERVAL).await;
    }

    Json(PollResponse {
        status: Status::Success,
        has_update: false,
        timestamp: now_millis(),
    })
}
