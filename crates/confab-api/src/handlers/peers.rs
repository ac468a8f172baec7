//! /api/peers — peer list passthrough from the tracker.

use axum::extract::State;
use axum::Json;

use confab_core::proto::{PeerListResponse, Status};

use super::{ApiError, ApiState};

pub async fn handle_peers(
    State(state): State<ApiState>,
) -> Result<Json<PeerListResponse>, ApiError> {
    let peers = state.relay.tracker().list_peers().await?;
    Ok(Json(PeerListResponse {
        status: Status::Success,
        peers,
    }))
}
