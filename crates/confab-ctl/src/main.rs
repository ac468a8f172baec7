//! confab-ctl — command-line interface for a running confabd peer.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_PORT: u16 = 5000;

// ── Response types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PeersResponse {
    status: String,
    #[serde(default)]
    peers: Vec<PeerInfo>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct PeerInfo {
    id: String,
    ip: String,
    port: u16,
    username: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    status: String,
    #[serde(default)]
    messages: Vec<MessageEntry>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct MessageEntry {
    from: String,
    to: String,
    content: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    channel: String,
}

#[derive(Deserialize)]
struct HandshakesResponse {
    status: String,
    #[serde(default)]
    handshakes: HashMap<String, HandshakeEntry>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct HandshakeEntry {
    status: String,
    username: String,
}

#[derive(Deserialize)]
struct HandshakeResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    peer_username: Option<String>,
}

#[derive(Deserialize)]
struct AckResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct BroadcastResponse {
    status: String,
    #[serde(default)]
    sent: usize,
    #[serde(default)]
    requires_handshake: usize,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct ChannelsResponse {
    status: String,
    #[serde(default)]
    channels: Vec<ChannelInfo>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct ChannelInfo {
    name: String,
    owner: String,
    members: usize,
}

#[derive(Deserialize)]
struct ChannelSendResponse {
    status: String,
    #[serde(default)]
    sent: usize,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct PollResponse {
    #[allow(dead_code)]
    status: String,
    has_update: bool,
    timestamp: u64,
    #[serde(default)]
    messages: Option<Vec<MessageEntry>>,
}

// ── HTTP helpers ──────────────────────────────────────────────────────────────

fn base_url(port: u16) -> String {
    format!("http://127.0.0.1:{}/api", port)
}

async fn get_json<T: for<'de> Deserialize<'de>>(url: &str) -> Result<T> {
    reqwest::get(url)
        .await
        .with_context(|| format!("failed to connect to confabd at {} — is it running?", url))?
        .json::<T>()
        .await
        .context("failed to parse response")
}

async fn post_json<B, T>(url: &str, body: &B) -> Result<T>
where
    B: Serialize,
    T: for<'de> Deserialize<'de>,
{
    reqwest::Client::new()
        .post(url)
        .json(body)
        .send()
        .await
        .with_context(|| format!("failed to connect to confabd at {} — is it running?", url))?
        .json::<T>()
        .await
        .context("failed to parse response")
}

fn report_error(message: Option<String>) {
    eprintln!("Error: {}", message.unwrap_or_else(|| "unknown".to_string()));
    std::process::exit(1);
}

// ── Subcommand handlers ───────────────────────────────────────────────────────

async fn cmd_peers(port: u16) -> Result<()> {
    let resp: PeersResponse = get_json(&format!("{}/peers", base_url(port))).await?;
    if resp.status != "success" {
        report_error(resp.message);
    }

    if resp.peers.is_empty() {
        println!("No peers registered.");
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  Registered Peers ({})", resp.peers.len());
    println!("═══════════════════════════════════════");
    for p in &resp.peers {
        println!("  ┌─ {}", p.id);
        println!("  │  username : {}", p.username);
        println!("  └─ address  : {}:{}", p.ip, p.port);
    }
    Ok(())
}

async fn cmd_messages(port: u16) -> Result<()> {
    let resp: MessagesResponse = get_json(&format!("{}/messages", base_url(port))).await?;
    if resp.status != "success" {
        report_error(resp.message);
    }

    if resp.messages.is_empty() {
        println!("No messages.");
        return Ok(());
    }

    for m in &resp.messages {
        match m.kind.as_str() {
            "channel" => println!("[#{}] {} -> {}: {}", m.channel, m.from, m.to, m.content),
            kind => println!("[{}] {} -> {}: {}", kind, m.from, m.to, m.content),
        }
    }
    Ok(())
}

async fn cmd_handshakes(port: u16) -> Result<()> {
    let resp: HandshakesResponse = get_json(&format!("{}/handshakes", base_url(port))).await?;
    if resp.status != "success" {
        report_error(resp.message);
    }

    if resp.handshakes.is_empty() {
        println!("No handshakes yet.");
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  Handshaked Peers ({})", resp.handshakes.len());
    println!("═══════════════════════════════════════");
    for (peer_id, entry) in &resp.handshakes {
        println!("  {} ({}) — {}", peer_id, entry.username, entry.status);
    }
    Ok(())
}

async fn cmd_handshake(port: u16, peer_id: &str) -> Result<()> {
    let body = serde_json::json!({ "peer_id": peer_id });
    let resp: HandshakeResponse =
        post_json(&format!("{}/handshake", base_url(port)), &body).await?;
    if resp.status != "success" {
        report_error(resp.message);
    }

    println!(
        "Handshake accepted by {} ({})",
        peer_id,
        resp.peer_username.unwrap_or_else(|| "unknown".to_string())
    );
    Ok(())
}

async fn cmd_send(port: u16, to: &str, text: &str) -> Result<()> {
    let body = serde_json::json!({ "to": to, "message": text });
    let resp: AckResponse = post_json(&format!("{}/send", base_url(port)), &body).await?;
    if resp.status != "success" {
        report_error(resp.message);
    }
    println!("Message sent to {}.", to);
    Ok(())
}

async fn cmd_broadcast(port: u16, text: &str) -> Result<()> {
    let body = serde_json::json!({ "message": text });
    let resp: BroadcastResponse =
        post_json(&format!("{}/broadcast", base_url(port)), &body).await?;
    if resp.status != "success" {
        report_error(resp.message);
    }

    println!("Broadcast sent to {} peers.", resp.sent);
    if resp.requires_handshake > 0 {
        println!("{} peers require a handshake first.", resp.requires_handshake);
    }
    Ok(())
}

async fn cmd_channels(port: u16) -> Result<()> {
    let resp: ChannelsResponse = get_json(&format!("{}/channels", base_url(port))).await?;
    if resp.status != "success" {
        report_error(resp.message);
    }

    println!("═══════════════════════════════════════");
    println!("  Channels ({})", resp.channels.len());
    println!("═══════════════════════════════════════");
    for c in &resp.channels {
        println!("  #{} — owner {}, {} members", c.name, c.owner, c.members);
    }
    Ok(())
}

async fn cmd_channel_create(port: u16, name: &str) -> Result<()> {
    let body = serde_json::json!({ "channel": name });
    let resp: AckResponse = post_json(&format!("{}/channel/create", base_url(port)), &body).await?;
    if resp.status != "success" {
        report_error(resp.message);
    }
    println!("Channel #{} created.", name);
    Ok(())
}

async fn cmd_channel_join(port: u16, name: &str) -> Result<()> {
    let body = serde_json::json!({ "channel": name });
    let resp: AckResponse = post_json(&format!("{}/channel/join", base_url(port)), &body).await?;
    if resp.status != "success" {
        report_error(resp.message);
    }
    println!("Joined #{}.", name);
    Ok(())
}

async fn cmd_channel_send(port: u16, name: &str, text: &str) -> Result<()> {
    let body = serde_json::json!({ "channel": name, "message": text });
    let resp: ChannelSendResponse =
        post_json(&format!("{}/channel/send", base_url(port)), &body).await?;
    if resp.status != "success" {
        report_error(resp.message);
    }
    println!("Sent to {} members of #{}.", resp.sent, name);
    Ok(())
}

async fn cmd_poll(port: u16, resource: &str) -> Result<()> {
    let path = match resource {
        "messages" => "/messages/poll",
        "peers" => "/peers/poll",
        "channels" => "/channels/poll",
        other => {
            eprintln!("Unknown poll resource: {} (messages|peers|channels)", other);
            std::process::exit(1);
        }
    };

    println!("Polling {} (up to 30s)...", resource);
    let resp: PollResponse = get_json(&format!("{}{}", base_url(port), path)).await?;

    if !resp.has_update {
        println!("No update within the poll window.");
        return Ok(());
    }

    println!("Update at {}.", resp.timestamp);
    if let Some(messages) = resp.messages {
        for m in &messages {
            println!("[{}] {} -> {}: {}", m.kind, m.from, m.to, m.content);
        }
    }
    Ok(())
}

fn print_usage() {
    println!("Usage: confab-ctl [--port <port>] <command>");
    println!();
    println!("Commands:");
    println!("  peers                        List peers registered with the tracker");
    println!("  messages                     Show the local message log");
    println!("  handshakes                   List handshaked peers");
    println!("  handshake <peer_id>          Initiate a handshake with a peer");
    println!("  send <peer_id> <text>        Send a direct message");
    println!("  broadcast <text>             Broadcast to all handshaked peers");
    println!("  channels                     List channels");
    println!("  channel create <name>        Create a channel");
    println!("  channel join <name>          Join a channel");
    println!("  channel send <name> <text>   Send to a channel");
    println!("  poll <messages|peers|channels>  Long-poll for changes");
    println!();
    println!("Options:");
    println!("  --port <port>   Local API port of confabd (default: {})", DEFAULT_PORT);
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Parse --port option
    let mut port = DEFAULT_PORT;
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--port" {
            i += 1;
            port = args
                .get(i)
                .context("--port requires a value")?
                .parse()
                .context("--port must be a number")?;
        } else {
            remaining.push(&args[i]);
        }
        i += 1;
    }

    match remaining.as_slice() {
        ["peers"]                          => cmd_peers(port).await,
        ["messages"]                       => cmd_messages(port).await,
        ["handshakes"]                     => cmd_handshakes(port).await,
        ["handshake", peer_id]             => cmd_handshake(port, peer_id).await,
        ["send", to, rest @ ..] if !rest.is_empty() => {
            cmd_send(port, to, &rest.join(" ")).await
        }
        ["broadcast", rest @ ..] if !rest.is_empty() => {
            cmd_broadcast(port, &rest.join(" ")).await
        }
        ["channels"]                       => cmd_channels(port).await,
        ["channel", "create", name]        => cmd_channel_create(port, name).await,
        ["channel", "join", name]          => cmd_channel_join(port, name).await,
        ["channel", "send", name, rest @ ..] if !rest.is_empty() => {
            cmd_channel_send(port, name, &rest.join(" ")).await
        }
        ["poll", resource]                 => cmd_poll(port, resource).await,
        ["help"] | ["--help"] | ["-h"] | [] => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
