//! JSON wire types for the tracker and peer-to-peer endpoints.
//!
//! Field names are the protocol — `peer_id`, `from`, `type`, `message`,
//! `channel`, `status` — so every struct here derives both Serialize and
//! Deserialize and is shared by servers, clients, and tests.

use serde::{Deserialize, Serialize};

use crate::message::MessageKind;

/// Every peer's inbound P2P listener binds to `advertised port + 1000`.
/// The offset is computed by the sender; the tracker never stores it.
pub const P2P_PORT_OFFSET: u16 = 1000;

/// P2P listener port for a peer advertising `port`.
pub fn p2p_port(port: u16) -> u16 {
    port + P2P_PORT_OFFSET
}

/// Outcome marker carried by every tracker and peer-API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

// ── Tracker wire ──────────────────────────────────────────────────────────────

/// A registered peer as the tracker reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerInfo {
    pub id: String,
    pub ip: String,
    pub port: u16,
    pub username: String,
}

/// POST /submit-info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub peer_id: String,
    pub ip: String,
    pub port: u16,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub status: Status,
    pub total: usize,
}

/// POST /unregister and /connect-peer both take a bare peer_id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerIdRequest {
    pub peer_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnregisterResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /get-list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerListResponse {
    pub status: Status,
    pub peers: Vec<PeerInfo>,
}

/// POST /connect-peer — connection info for one peer, flat on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectInfoResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// POST /channel/create and /channel/join
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelRequest {
    pub channel: String,
    pub peer_id: String,
}

/// POST /channel/members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembersRequest {
    pub channel: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMember {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembersResponse {
    pub status: Status,
    #[serde(default)]
    pub members: Vec<ChannelMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One row of GET /channels. `members` is a count on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub name: String,
    pub owner: String,
    pub members: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelListResponse {
    pub status: Status,
    pub channels: Vec<ChannelSummary>,
}

/// Generic `{status, message?}` body for endpoints with no payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Ack {
    pub fn success() -> Self {
        Ack {
            status: Status::Success,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Ack {
            status: Status::Error,
            message: Some(message.into()),
        }
    }
}

// ── Peer-to-peer wire ─────────────────────────────────────────────────────────

/// POST /p2p/handshake — the initiator announces itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeRequest {
    pub from: String,
    pub username: String,
}

/// The responder's verdict. Only `Accepted` is ever produced by this
/// implementation; anything else in a reply leaves the pair un-handshaked
/// on the initiator side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandshakeDecision {
    Accepted,
    #[serde(other)]
    Declined,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeReply {
    pub status: HandshakeDecision,
    pub peer_id: String,
    pub username: String,
}

/// POST /p2p/message — one application message between peers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub from: String,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    pub message: String,
    #[serde(default)]
    pub channel: String,
}
