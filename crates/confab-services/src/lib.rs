//! confab-services — the stateful components of the coordination protocol.
//!
//! Tracker side: [`Registry`]. Peer side: [`HandshakeTable`], [`MessageLog`],
//! [`CountWatch`], [`TrackerClient`], and [`Relay`]. Each owns its lock as
//! part of its own type and is cheap to clone (shared inner).

pub mod handshake;
pub mod message_log;
pub mod registry;
pub mod relay;
pub mod tracker_client;
pub mod watch;

pub use handshake::HandshakeTable;
pub use message_log::{LogSnapshot, MessageLog};
pub use registry::Registry;
pub use relay::{BroadcastReport, Relay};
pub use tracker_client::{ConnectInfo, TrackerClient};
pub use watch::CountWatch;

/// Unix timestamp in milliseconds.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
