//! Typed client for the tracker's HTTP endpoints.
//!
//! Every call carries a bounded timeout and fails immediately on transport
//! error — no retries anywhere. `{status: "error"}` bodies are mapped back
//! to the protocol error kinds the endpoint can produce.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use confab_core::proto::{
    Ack, ChannelListResponse, ChannelMember, ChannelRequest, ChannelSummary,
    ConnectInfoResponse, MembersRequest, MembersResponse, PeerIdRequest, PeerInfo,
    PeerListResponse, RegisterRequest, RegisterResponse, Status, UnregisterResponse,
};
use confab_core::ProtocolError;

/// Connect/read timeout for tracker RPCs.
pub const TRACKER_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolved connection info for one peer, as returned by /connect-peer.
#[derive(Debug, Clone)]
pub struct ConnectInfo {
    pub ip: String,
    pub port: u16,
    pub username: String,
}

#[derive(Clone)]
pub struct TrackerClient {
    base: String,
    http: reqwest::Client,
}

impl TrackerClient {
    pub fn new(host: &str, port: u16) -> Self {
        let http = reqwest::Client::builder()
            .timeout(TRACKER_TIMEOUT)
            .build()
            .expect("reqwest client construction");
        Self {
            base: format!("http://{}:{}", host, port),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    // ── Peers ─────────────────────────────────────────────────────────────────

    /// Register (or re-register) this peer. Returns the tracker's total.
    pub async fn register(&self, req: &RegisterRequest) -> Result<usize, ProtocolError> {
        let resp: RegisterResponse = self.post("/submit-info", req).await?;
        Ok(resp.total)
    }

    pub async fn unregister(&self, peer_id: &str) -> Result<usize, ProtocolError> {
        let resp: UnregisterResponse = self
            .post(
                "/unregister",
                &PeerIdRequest {
                    peer_id: peer_id.to_string(),
                },
            )
            .await?;
        match resp.status {
            Status::Success => Ok(resp.total.unwrap_or(0)),
            Status::Error => Err(ProtocolError::peer_not_found()),
        }
    }

    pub async fn list_peers(&self) -> Result<Vec<PeerInfo>, ProtocolError> {
        let resp: PeerListResponse = self.get("/get-list").await?;
        Ok(resp.peers)
    }

    /// Connection info for one peer.
    pub async fn connect_info(&self, peer_id: &str) -> Result<ConnectInfo, ProtocolError> {
        let resp: ConnectInfoResponse = self
            .post(
                "/connect-peer",
                &PeerIdRequest {
                    peer_id: peer_id.to_string(),
                },
            )
            .await?;
        match (resp.status, resp.ip, resp.port) {
            (Status::Success, Some(ip), Some(port)) => Ok(ConnectInfo {
                ip,
                port,
                username: resp.username.unwrap_or_default(),
            }),
            _ => Err(ProtocolError::peer_not_found()),
        }
    }

    // ── Channels ──────────────────────────────────────────────────────────────

    pub async fn create_channel(&self, channel: &str, peer_id: &str) -> Result<(), ProtocolError> {
        let resp: Ack = self
            .post(
                "/channel/create",
                &ChannelRequest {
                    channel: channel.to_string(),
                    peer_id: peer_id.to_string(),
                },
            )
            .await?;
        match resp.status {
            Status::Success => Ok(()),
            Status::Error => Err(ProtocolError::AlreadyExists),
        }
    }

    pub async fn join_channel(&self, channel: &str, peer_id: &str) -> Result<(), ProtocolError> {
        let resp: Ack = self
            .post(
                "/channel/join",
                &ChannelRequest {
                    channel: channel.to_string(),
                    peer_id: peer_id.to_string(),
                },
            )
            .await?;
        match resp.status {
            Status::Success => Ok(()),
            Status::Error => Err(ProtocolError::channel_not_found()),
        }
    }

    pub async fn channel_members(
        &self,
        channel: &str,
    ) -> Result<Vec<ChannelMember>, ProtocolError> {
        let resp: MembersResponse = self
            .post(
                "/channel/members",
                &MembersRequest {
                    channel: channel.to_string(),
                },
            )
            .await?;
        match resp.status {
            Status::Success => Ok(resp.members),
            Status::Error => Err(ProtocolError::channel_not_found()),
        }
    }

    pub async fn list_channels(&self) -> Result<Vec<ChannelSummary>, ProtocolError> {
        let resp: ChannelListResponse = self.get("/channels").await?;
        Ok(resp.channels)
    }

    // ── HTTP plumbing ─────────────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProtocolError> {
        self.http
            .get(format!("{}{}", self.base, path))
            .send()
            .await
            .map_err(Self::transport_err)?
            .json::<T>()
            .await
            .map_err(Self::transport_err)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ProtocolError> {
        self.http
            .post(format!("{}{}", self.base, path))
            .json(body)
            .send()
            .await
            .map_err(Self::transport_err)?
            .json::<T>()
            .await
            .map_err(Self::transport_err)
    }

    fn transport_err(e: reqwest::Error) -> ProtocolError {
        ProtocolError::DeliveryFailed {
            peer: "tracker".to_string(),
            reason: e.to_string(),
        }
    }
}
