//! Tracker-side registry of active peers and channels.
//!
//! Pure data + mutation operations, no networking. Each map has its own
//! exclusive lock, held only for the map operation itself — never across a
//! network call. Peers are removed only by explicit unregistration; there is
//! no TTL, so a crashed peer stays listed until the tracker restarts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use confab_core::proto::{ChannelSummary, PeerInfo};
use confab_core::ProtocolError;

/// Name of the channel seeded at startup.
pub const DEFAULT_CHANNEL: &str = "general";

/// Sentinel owner of the default channel.
pub const SYSTEM_OWNER: &str = "system";

#[derive(Debug, Clone)]
struct PeerRecord {
    ip: String,
    port: u16,
    username: String,
}

#[derive(Debug, Clone)]
struct Channel {
    owner: String,
    /// Insertion-ordered member peer_ids, set semantics. Membership only
    /// grows; there is no leave operation.
    members: Vec<String>,
}

/// The tracker's shared store. Clones share the same maps.
#[derive(Clone)]
pub struct Registry {
    peers: Arc<Mutex<HashMap<String, PeerRecord>>>,
    channels: Arc<Mutex<HashMap<String, Channel>>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        let mut channels = HashMap::new();
        channels.insert(
            DEFAULT_CHANNEL.to_string(),
            Channel {
                owner: SYSTEM_OWNER.to_string(),
                members: Vec::new(),
            },
        );
        Self {
            peers: Arc::new(Mutex::new(HashMap::new())),
            channels: Arc::new(Mutex::new(channels)),
        }
    }

    // ── Peers ─────────────────────────────────────────────────────────────────

    /// Insert or replace a peer entry. Re-registration is an idempotent
    /// replace, not a merge; a duplicate peer_id from a different address
    /// silently overwrites. Returns the new total peer count.
    pub fn register(&self, peer_id: &str, ip: &str, port: u16, username: &str) -> usize {
        let mut peers = self.peers.lock().unwrap();
        peers.insert(
            peer_id.to_string(),
            PeerRecord {
                ip: ip.to_string(),
                port,
                username: username.to_string(),
            },
        );
        peers.len()
    }

    /// Remove a peer entry. Returns the remaining total.
    pub fn unregister(&self, peer_id: &str) -> Result<usize, ProtocolError> {
        let mut peers = self.peers.lock().unwrap();
        if peers.remove(peer_id).is_none() {
            return Err(ProtocolError::peer_not_found());
        }
        Ok(peers.len())
    }

    /// All registered peers. Iteration order is not stable across
    /// registrations and unregistrations.
    pub fn list_peers(&self) -> Vec<PeerInfo> {
        let peers = self.peers.lock().unwrap();
        peers
            .iter()
            .map(|(id, rec)| PeerInfo {
                id: id.clone(),
                ip: rec.ip.clone(),
                port: rec.port,
                username: rec.username.clone(),
            })
            .collect()
    }

    /// Connection info for one peer. Returns a copy, never a live reference.
    pub fn lookup(&self, peer_id: &str) -> Option<PeerInfo> {
        let peers = self.peers.lock().unwrap();
        peers.get(peer_id).map(|rec| PeerInfo {
            id: peer_id.to_string(),
            ip: rec.ip.clone(),
            port: rec.port,
            username: rec.username.clone(),
        })
    }

    // ── Channels ──────────────────────────────────────────────────────────────

    /// Create a channel with the creator as first member.
    pub fn create_channel(&self, name: &str, owner: &str) -> Result<(), ProtocolError> {
        let mut channels = self.channels.lock().unwrap();
        if channels.contains_key(name) {
            return Err(ProtocolError::AlreadyExists);
        }
        channels.insert(
            name.to_string(),
            Channel {
                owner: owner.to_string(),
                members: vec![owner.to_string()],
            },
        );
        Ok(())
    }

    /// Add a member. Joining a channel you are already in is a no-op.
    pub fn join_channel(&self, name: &str, peer_id: &str) -> Result<(), ProtocolError> {
        let mut channels = self.channels.lock().unwrap();
        let channel = channels
            .get_mut(name)
            .ok_or_else(ProtocolError::channel_not_found)?;
        if !channel.members.iter().any(|m| m == peer_id) {
            channel.members.push(peer_id.to_string());
        }
        Ok(())
    }

    /// Member peer_ids of a channel, in join order.
    pub fn channel_members(&self, name: &str) -> Result<Vec<String>, ProtocolError> {
        let channels = self.channels.lock().unwrap();
        channels
            .get(name)
            .map(|c| c.members.clone())
            .ok_or_else(ProtocolError::channel_not_found)
    }

    /// Member peer_ids resolved against the peer map: usernames attached,
    /// members that are no longer registered silently dropped.
    pub fn channel_members_resolved(
        &self,
        name: &str,
    ) -> Result<Vec<(String, String)>, ProtocolError> {
        // Copy the member list out before taking the peer lock.
        let member_ids = self.channel_members(name)?;
        let peers = self.peers.lock().unwrap();
        Ok(member_ids
            .into_iter()
            .filter_map(|id| {
                peers
                    .get(&id)
                    .map(|rec| (id.clone(), rec.username.clone()))
            })
            .collect())
    }

    pub fn list_channels(&self) -> Vec<ChannelSummary> {
        let channels = self.channels.lock().unwrap();
        channels
            .iter()
            .map(|(name, c)| ChannelSummary {
                name: name.clone(),
                owner: c.owner.clone(),
                members: c.members.len(),
            })
            .collect()
    }
}
