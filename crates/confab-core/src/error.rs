//! Protocol error kinds.
//!
//! Every error is recovered at the boundary where it occurs and surfaced to
//! the immediate caller as a `{status: "error", message}` body — none are
//! process-fatal.

/// The failure modes of the coordination protocol.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Unknown peer_id or channel name. The payload is the noun,
    /// so the display matches the wire text ("Peer not found").
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Channel exists")]
    AlreadyExists,

    /// Direct or broadcast traffic without an accepted handshake.
    #[error("Handshake required")]
    HandshakeRequired,

    /// Transport-level failure reaching a specific host. Not retried.
    #[error("delivery to {peer} failed: {reason}")]
    DeliveryFailed { peer: String, reason: String },

    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl ProtocolError {
    pub fn peer_not_found() -> Self {
        ProtocolError::NotFound("Peer")
    }

    pub fn channel_not_found() -> Self {
        ProtocolError::NotFound("Channel")
    }
}
