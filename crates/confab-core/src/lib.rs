//! confab-core — shared protocol types, message model, and configuration.
//! All other confab crates depend on this one.

pub mod config;
pub mod error;
pub mod message;
pub mod proto;

pub use error::ProtocolError;
pub use message::{HandshakeRecord, HandshakeStatus, MessageKind, StoredMessage};
