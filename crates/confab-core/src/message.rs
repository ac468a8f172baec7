//! Message and handshake data model.
//!
//! Both structures are process-local: the message log and the handshake
//! table die with the peer process. Nothing here touches the network.

use serde::{Deserialize, Serialize};

/// How a message was addressed. A payload without a `type` field is
/// treated as direct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// One recipient, handshake-gated.
    #[default]
    Direct,
    /// Every registered peer, handshake-gated per recipient.
    Broadcast,
    /// Channel members, no handshake check.
    Channel,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Direct => "direct",
            MessageKind::Broadcast => "broadcast",
            MessageKind::Channel => "channel",
        }
    }
}

/// One entry in a peer's append-only message log.
///
/// `from` is the remote peer_id, or `"You"` for the sender-side copy of an
/// outbound message. `to` is the recipient peer_id for direct sends, `"me"`
/// on the receive side, and empty for fan-out sends. Entries are never
/// mutated or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub from: String,
    pub to: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub channel: String,
}

/// Trust status of a remote peer.
///
/// `Pending` exists in the data model but is unreachable through the wire
/// protocol: responders accept every inbound handshake immediately, and
/// initiators only write a record on an `accepted` reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandshakeStatus {
    Pending,
    Accepted,
}

/// Per-remote-peer handshake state, keyed by peer_id in the table.
/// Never deleted — there is no revocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeRecord {
    pub status: HandshakeStatus,
    /// Unix timestamp in milliseconds at acceptance.
    pub timestamp: u64,
    pub username: String,
}

impl HandshakeRecord {
    pub fn is_accepted(&self) -> bool {
        matches!(self.status, HandshakeStatus::Accepted)
    }
}
