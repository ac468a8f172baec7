//! Peer-to-peer message relay.
//!
//! Sends go straight to the recipient's inbound listener at
//! `ip:(advertised port + 1000)`; the tracker is only consulted for
//! connection info. The receive path enforces the handshake guard for
//! direct and broadcast traffic and appends accepted messages to the local
//! log. Delivery is best-effort: one bounded attempt, no retries, no
//! acknowledgement tracking.

use std::time::Duration;

use confab_core::proto::{p2p_port, HandshakeDecision, HandshakeReply, HandshakeRequest, WireMessage};
use confab_core::{MessageKind, ProtocolError, StoredMessage};

use crate::handshake::HandshakeTable;
use crate::message_log::MessageLog;
use crate::tracker_client::TrackerClient;

/// Connect/read timeout for peer-to-peer calls.
pub const P2P_TIMEOUT: Duration = Duration::from_secs(3);

/// Sender-side name recorded for outbound messages.
const SELF_SENDER: &str = "You";

/// Receive-side recipient marker.
const SELF_RECIPIENT: &str = "me";

/// Outcome of a broadcast: peers actually delivered to, and peers skipped
/// because no handshake is in place (not a failure).
#[derive(Debug, Clone)]
pub struct BroadcastReport {
    pub sent: usize,
    pub requires_handshake: Vec<String>,
}

pub struct Relay {
    peer_id: String,
    username: String,
    tracker: TrackerClient,
    handshakes: HandshakeTable,
    log: MessageLog,
    http: reqwest::Client,
}

impl Relay {
    pub fn new(
        peer_id: String,
        username: String,
        tracker: TrackerClient,
        handshakes: HandshakeTable,
        log: MessageLog,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(P2P_TIMEOUT)
            .build()
            .expect("reqwest client construction");
        Self {
            peer_id,
            username,
            tracker,
            handshakes,
            log,
            http,
        }
    }

    pub fn peer_id(&self) -> &str {
        &self.peer_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn handshakes(&self) -> &HandshakeTable {
        &self.handshakes
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn tracker(&self) -> &TrackerClient {
        &self.tracker
    }

    // ── Handshake (initiator side) ────────────────────────────────────────────

    /// Initiate a handshake with a peer. On an `accepted` reply the remote
    /// is recorded in the local table and its username returned. Any other
    /// reply, or a transport failure, records nothing.
    pub async fn handshake(&self, to_peer: &str) -> Result<String, ProtocolError> {
        let info = self.tracker.connect_info(to_peer).await?;
        let url = format!(
            "http://{}:{}/p2p/handshake",
            info.ip,
            p2p_port(info.port)
        );
        let req = HandshakeRequest {
            from: self.peer_id.clone(),
            username: self.username.clone(),
        };

        let reply: HandshakeReply = self
            .http
            .post(&url)
            .json(&req)
            .send()
            .await
            .map_err(|e| Self::delivery_failed(to_peer, e))?
            .json()
            .await
            .map_err(|e| Self::delivery_failed(to_peer, e))?;

        if reply.status != HandshakeDecision::Accepted {
            return Err(ProtocolError::DeliveryFailed {
                peer: to_peer.to_string(),
                reason: "handshake rejected".to_string(),
            });
        }

        self.handshakes.accept(to_peer, &reply.username);
        Ok(reply.username)
    }

    // ── Handshake (responder side) ────────────────────────────────────────────

    /// Accept an inbound handshake request. There is no rejection path:
    /// the sender is recorded immediately and our own identity returned.
    pub fn accept_handshake(&self, req: &HandshakeRequest) -> HandshakeReply {
        tracing::info!(from = %req.from, username = %req.username, "handshake request");
        self.handshakes.accept(&req.from, &req.username);
        HandshakeReply {
            status: HandshakeDecision::Accepted,
            peer_id: self.peer_id.clone(),
            username: self.username.clone(),
        }
    }

    // ── Sending ───────────────────────────────────────────────────────────────

    /// Send a direct message to one peer. Requires an accepted handshake.
    pub async fn send_direct(&self, to: &str, content: &str) -> Result<(), ProtocolError> {
        if !self.handshakes.is_accepted(to) {
            return Err(ProtocolError::HandshakeRequired);
        }

        let info = self.tracker.connect_info(to).await?;
        let msg = WireMessage {
            from: self.peer_id.clone(),
            kind: MessageKind::Direct,
            message: content.to_string(),
            channel: String::new(),
        };
        self.post_message(to, &info.ip, info.port, &msg).await?;

        self.log.append(StoredMessage {
            from: SELF_SENDER.to_string(),
            to: to.to_string(),
            content: content.to_string(),
            kind: MessageKind::Direct,
            channel: String::new(),
        });
        Ok(())
    }

    /// Deliver to every registered peer with an accepted handshake. Peers
    /// without one are skipped and reported; a failed delivery to one peer
    /// never aborts the rest. One sender-side record is appended regardless
    /// of how many peers actually received the message.
    pub async fn broadcast(&self, content: &str) -> Result<BroadcastReport, ProtocolError> {
        let peers = self.tracker.list_peers().await?;
        let msg = WireMessage {
            from: self.peer_id.clone(),
            kind: MessageKind::Broadcast,
            message: content.to_string(),
            channel: String::new(),
        };

        let mut sent = 0;
        let mut requires_handshake = Vec::new();
        for peer in peers {
            if peer.id == self.peer_id {
                continue;
            }
            if !self.handshakes.is_accepted(&peer.id) {
                requires_handshake.push(peer.id);
                continue;
            }
            match self.post_message(&peer.id, &peer.ip, peer.port, &msg).await {
                Ok(()) => sent += 1,
                Err(e) => tracing::warn!(peer_id = %peer.id, error = %e, "broadcast delivery failed"),
            }
        }

        self.log.append(StoredMessage {
            from: SELF_SENDER.to_string(),
            to: String::new(),
            content: content.to_string(),
            kind: MessageKind::Broadcast,
            channel: String::new(),
        });

        Ok(BroadcastReport {
            sent,
            requires_handshake,
        })
    }

    /// Fan a message out to a channel's members. Membership is sufficient
    /// authorization — no handshake check. Per-member failures are
    /// tolerated; only a count of successful sends is reported.
    pub async fn send_channel(&self, channel: &str, content: &str) -> Result<usize, ProtocolError> {
        let members = self.tracker.channel_members(channel).await?;
        let msg = WireMessage {
            from: self.peer_id.clone(),
            kind: MessageKind::Channel,
            message: content.to_string(),
            channel: channel.to_string(),
        };

        let mut sent = 0;
        for member in members {
            if member.id == self.peer_id {
                continue;
            }
            let info = match self.tracker.connect_info(&member.id).await {
                Ok(info) => info,
                Err(e) => {
                    tracing::warn!(peer_id = %member.id, error = %e, "channel member unresolvable");
                    continue;
                }
            };
            match self.post_message(&member.id, &info.ip, info.port, &msg).await {
                Ok(()) => sent += 1,
                Err(e) => tracing::warn!(peer_id = %member.id, error = %e, "channel delivery failed"),
            }
        }

        self.log.append(StoredMessage {
            from: SELF_SENDER.to_string(),
            to: String::new(),
            content: content.to_string(),
            kind: MessageKind::Channel,
            channel: channel.to_string(),
        });

        Ok(sent)
    }

    // ── Receiving ─────────────────────────────────────────────────────────────

    /// Validate and store one inbound message. Direct and broadcast senders
    /// must hold an accepted handshake in *our* table; channel messages
    /// bypass the guard. Rejected messages are not stored.
    pub fn receive(&self, msg: WireMessage) -> Result<(), ProtocolError> {
        if matches!(msg.kind, MessageKind::Direct | MessageKind::Broadcast)
            && !self.handshakes.is_accepted(&msg.from)
        {
            tracing::warn!(from = %msg.from, kind = msg.kind.as_str(), "rejected: handshake required");
            return Err(ProtocolError::HandshakeRequired);
        }

        tracing::info!(from = %msg.from, kind = msg.kind.as_str(), "message received");
        self.log.append(StoredMessage {
            from: msg.from,
            to: SELF_RECIPIENT.to_string(),
            content: msg.message,
            kind: msg.kind,
            channel: msg.channel,
        });
        Ok(())
    }

    // ── Transport ─────────────────────────────────────────────────────────────

    /// One bounded POST to a peer's inbound listener. A completed HTTP
    /// exchange counts as delivered; only transport-level failures are
    /// reported.
    async fn post_message(
        &self,
        peer_id: &str,
        ip: &str,
        advertised_port: u16,
        msg: &WireMessage,
    ) -> Result<(), ProtocolError> {
        let url = format!("http://{}:{}/p2p/message", ip, p2p_port(advertised_port));
        self.http
            .post(&url)
            .json(msg)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| Self::delivery_failed(peer_id, e))
    }

    fn delivery_failed(peer_id: &str, e: reqwest::Error) -> ProtocolError {
        ProtocolError::DeliveryFailed {
            peer: peer_id.to_string(),
            reason: e.to_string(),
        }
    }
}
