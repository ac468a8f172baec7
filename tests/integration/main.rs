//! confab integration test harness.
//!
//! Boots a real tracker and real peers in-process: every listener is an
//! axum server on an ephemeral 127.0.0.1 port, driven over actual HTTP
//! with reqwest. No external processes and no fixed ports, so the suite
//! runs anywhere.

mod channels;
mod messaging;
mod polling;
mod tracker;

use std::sync::Arc;

use anyhow::{Context, Result};

use confab_api::ApiState;
use confab_core::proto::{p2p_port, RegisterRequest};
use confab_services::{CountWatch, HandshakeTable, MessageLog, Registry, Relay, TrackerClient};
use confab_tracker::TrackerState;

// ── Harness ───────────────────────────────────────────────────────────────────

/// Start a tracker on an ephemeral port. Returns the port.
pub async fn spawn_tracker() -> Result<u16> {
    let state = TrackerState {
        registry: Registry::new(),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, confab_tracker::router(state)).await.ok();
    });
    Ok(port)
}

/// One in-process peer: local API + P2P listener + tracker registration.
pub struct TestPeer {
    pub peer_id: String,
    /// Local API port. The P2P listener is on `port + 1000`.
    pub port: u16,
    pub state: ApiState,
}

impl TestPeer {
    pub fn api_url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}/api{}", self.port, path)
    }

    pub fn p2p_url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", p2p_port(self.port), path)
    }
}

/// Start a peer and register it with the tracker.
///
/// The P2P port is fixed at `api port + 1000` by protocol, so both have to
/// be free together; retry with a fresh ephemeral port if the sibling is
/// taken.
pub async fn spawn_peer(username: &str, tracker_port: u16) -> Result<TestPeer> {
    for _ in 0..16 {
        let api_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let port = api_listener.local_addr()?.port();
        let Some(sibling) = port.checked_add(1000) else {
            continue;
        };
        let Ok(p2p_listener) = tokio::net::TcpListener::bind(("127.0.0.1", sibling)).await else {
            continue;
        };

        let peer_id = format!("peer_{}", port);
        let tracker = TrackerClient::new("127.0.0.1", tracker_port);
        let relay = Arc::new(Relay::new(
            peer_id.clone(),
            username.to_string(),
            tracker.clone(),
            HandshakeTable::new(),
            MessageLog::new(),
        ));
        let state = ApiState {
            relay,
            watch: CountWatch::new(),
        };

        {
            let state = state.clone();
            tokio::spawn(async move {
                axum::serve(api_listener, confab_api::router(state)).await.ok();
            });
        }
        {
            let state = state.clone();
            tokio::spawn(async move {
                axum::serve(p2p_listener, confab_api::p2p::router(state)).await.ok();
            });
        }

        tracker
            .register(&RegisterRequest {
                peer_id: peer_id.clone(),
                ip: "127.0.0.1".to_string(),
                port,
                username: username.to_string(),
            })
            .await
            .context("registration failed")?;

        return Ok(TestPeer {
            peer_id,
            port,
            state,
        });
    }
    anyhow::bail!("could not find a free api/p2p port pair")
}

// ── HTTP helpers ──────────────────────────────────────────────────────────────

pub async fn api_get(url: &str) -> Result<serde_json::Value> {
    reqwest::get(url)
        .await
        .with_context(|| format!("GET {}", url))?
        .json()
        .await
        .context("parse response")
}

pub async fn api_post(url: &str, body: serde_json::Value) -> Result<serde_json::Value> {
    reqwest::Client::new()
        .post(url)
        .json(&body)
        .send()
        .await
        .with_context(|| format!("POST {}", url))?
        .json()
        .await
        .context("parse response")
}
