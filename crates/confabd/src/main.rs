//! confabd — peer daemon.
//!
//! Runs one peer: the inbound P2P listener on `port + 1000`, the local API
//! on `port`, and the registration lifecycle against the tracker. The
//! daemon registers after the P2P listener is up so that a peer discovered
//! via the tracker is always reachable, and unregisters on ctrl-c.

use std::sync::Arc;

use anyhow::{Context, Result};

use confab_api::ApiState;
use confab_core::config::ConfabConfig;
use confab_core::proto::{p2p_port, RegisterRequest};
use confab_services::{CountWatch, HandshakeTable, MessageLog, Relay, TrackerClient};

fn print_usage() {
    println!("Usage: confabd --username <name> --port <port> [options]");
    println!();
    println!("Options:");
    println!("  --username <name>      Display name (default: from config)");
    println!("  --port <port>          Local API port; P2P listens on port+1000");
    println!("  --tracker-host <addr>  Tracker address (default: from config)");
    println!("  --tracker-port <port>  Tracker port (default: from config)");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = ConfabConfig::write_default_if_missing() {
        tracing::warn!(error = %e, "failed to write default config");
    }
    let mut config = ConfabConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        ConfabConfig::default()
    });

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--username" => {
                i += 1;
                config.peer.username = args.get(i).context("--username requires a value")?.clone();
            }
            "--port" => {
                i += 1;
                config.peer.port = args
                    .get(i)
                    .context("--port requires a value")?
                    .parse()
                    .context("--port must be a number")?;
            }
            "--tracker-host" => {
                i += 1;
                config.tracker.host = args
                    .get(i)
                    .context("--tracker-host requires a value")?
                    .clone();
            }
            "--tracker-port" => {
                i += 1;
                config.tracker.port = args
                    .get(i)
                    .context("--tracker-port requires a value")?
                    .parse()
                    .context("--tracker-port must be a number")?;
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => {
                eprintln!("Unknown option: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let port = config.peer.port;
    let peer_id = format!("peer_{}", port);
    tracing::info!(
        peer_id = %peer_id,
        username = %config.peer.username,
        port,
        p2p_port = p2p_port(port),
        "confabd starting"
    );

    // Shared state
    let tracker = TrackerClient::new(&config.tracker.host, config.tracker.port);
    let relay = Arc::new(Relay::new(
        peer_id.clone(),
        config.peer.username.clone(),
        tracker.clone(),
        HandshakeTable::new(),
        MessageLog::new(),
    ));
    let state = ApiState {
        relay,
        watch: CountWatch::new(),
    };

    // P2P listener first — once we appear in the tracker's list, other
    // peers will start connecting.
    let p2p_task = {
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = confab_api::serve_p2p(state, p2p_port(port)).await {
                tracing::error!(error = %e, "P2P listener failed");
            }
        })
    };

    // Register with the tracker. A failure is not fatal: the daemon still
    // serves its local API, it is just invisible to other peers.
    let registration = RegisterRequest {
        peer_id: peer_id.clone(),
        ip: config.peer.advertised_ip.clone(),
        port,
        username: config.peer.username.clone(),
    };
    match tracker.register(&registration).await {
        Ok(total) => tracing::info!(peer_id = %peer_id, total, "registered with tracker"),
        Err(e) => tracing::warn!(error = %e, "registration failed"),
    }

    let api_task = {
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = confab_api::serve(state, port).await {
                tracing::error!(error = %e, "local API failed");
            }
        })
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => tracing::info!("shutdown signal received"),
        r = p2p_task => tracing::error!("P2P listener exited: {:?}", r),
        r = api_task => tracing::error!("local API exited: {:?}", r),
    }

    // Best-effort: take ourselves out of the directory on the way down.
    match tracker.unregister(&peer_id).await {
        Ok(total) => tracing::info!(total, "unregistered from tracker"),
        Err(e) => tracing::warn!(error = %e, "unregister failed"),
    }

    Ok(())
}
