//! Handshake engine — per-process trust table gating direct and broadcast
//! traffic.
//!
//! Two reachable states per remote peer: absent (no record) and accepted.
//! Responders accept every inbound handshake request; initiators record
//! acceptance only when the remote replies `accepted`. The table is
//! asymmetric by design: each side tracks its own acceptance of the other,
//! so mutual trust requires a handshake in each direction. Records are never
//! deleted.

use std::sync::Arc;

use dashmap::DashMap;

use confab_core::{HandshakeRecord, HandshakeStatus};

use crate::now_millis;

/// Trust table keyed by remote peer_id. Clones share the same table.
/// All mutations go through the map's entry API, so the read-modify-write
/// on acceptance is atomic per key.
#[derive(Clone, Default)]
pub struct HandshakeTable {
    records: Arc<DashMap<String, HandshakeRecord>>,
}

impl HandshakeTable {
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
        }
    }

    /// Record acceptance of a remote peer. Used on both paths: the responder
    /// accepting an inbound request, and the initiator consuming an
    /// `accepted` reply. Overwrites any prior record for the peer.
    pub fn accept(&self, peer_id: &str, username: &str) {
        self.records.insert(
            peer_id.to_string(),
            HandshakeRecord {
                status: HandshakeStatus::Accepted,
                timestamp: now_millis(),
                username: username.to_string(),
            },
        );
        tracing::info!(peer_id = %peer_id, username = %username, "handshake accepted");
    }

    /// The guard consulted by the relay's receive and send paths.
    pub fn is_accepted(&self, peer_id: &str) -> bool {
        self.records
            .get(peer_id)
            .map(|r| r.value().is_accepted())
            .unwrap_or(false)
    }

    pub fn get(&self, peer_id: &str) -> Option<HandshakeRecord> {
        self.records.get(peer_id).map(|r| r.value().clone())
    }

    /// All known records as (peer_id, record) pairs.
    pub fn list(&self) -> Vec<(String, HandshakeRecord)> {
        self.records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
