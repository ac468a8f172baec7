//! Handshake gating and direct/broadcast delivery between real peers.

use crate::*;

use anyhow::Result;

/// The canonical two-peer flow: A handshakes B, sends a direct message,
/// and B can immediately answer because receiving A's handshake request
/// populated B's own table.
#[tokio::test]
async fn handshake_then_direct_both_ways() -> Result<()> {
    let tracker_port = spawn_tracker().await?;
    let a = spawn_peer("alice", tracker_port).await?;
    let b = spawn_peer("bob", tracker_port).await?;

    // A initiates; B auto-accepts and reports its username.
    let resp = api_post(
        &a.api_url("/handshake"),
        serde_json::json!({ "peer_id": b.peer_id }),
    )
    .await?;
    assert_eq!(resp["status"], "success");
    assert_eq!(resp["peer_username"], "bob");

    // Both tables now hold an accepted record, independently.
    assert!(a.state.relay.handshakes().is_accepted(&b.peer_id));
    assert!(b.state.relay.handshakes().is_accepted(&a.peer_id));

    // A -> B direct.
    let resp = api_post(
        &a.api_url("/send"),
        serde_json::json!({ "to": b.peer_id, "message": "hi" }),
    )
    .await?;
    assert_eq!(resp["status"], "success");

    let a_log = api_get(&a.api_url("/messages")).await?;
    assert_eq!(a_log["messages"][0]["from"], "You");
    assert_eq!(a_log["messages"][0]["to"], b.peer_id);

    let b_log = api_get(&b.api_url("/messages")).await?;
    assert_eq!(b_log["messages"][0]["from"], a.peer_id);
    assert_eq!(b_log["messages"][0]["content"], "hi");

    // B -> A direct without B ever initiating a handshake of its own.
    let resp = api_post(
        &b.api_url("/send"),
        serde_json::json!({ "to": a.peer_id, "message": "hey" }),
    )
    .await?;
    assert_eq!(resp["status"], "success");

    let a_log = api_get(&a.api_url("/messages")).await?;
    let received: Vec<_> = a_log["messages"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|m| m["from"] == b.peer_id)
        .collect();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["content"], "hey");

    Ok(())
}

#[tokio::test]
async fn direct_without_handshake_is_rejected() -> Result<()> {
    let tracker_port = spawn_tracker().await?;
    let a = spawn_peer("carol", tracker_port).await?;
    let b = spawn_peer("dave", tracker_port).await?;

    // Send-side guard: the API refuses before anything hits the wire.
    let resp = api_post(
        &a.api_url("/send"),
        serde_json::json!({ "to": b.peer_id, "message": "sneaky" }),
    )
    .await?;
    assert_eq!(resp["status"], "error");
    assert_eq!(resp["message"], "Handshake required");

    // Receive-side guard: a forged direct message straight to B's listener
    // is rejected with 403 and never stored.
    let resp = reqwest::Client::new()
        .post(b.p2p_url("/p2p/message"))
        .json(&serde_json::json!({
            "from": a.peer_id, "type": "direct", "message": "forged"
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), 403);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Handshake required");

    let b_log = api_get(&b.api_url("/messages")).await?;
    assert!(b_log["messages"].as_array().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn broadcast_skips_unhandshaked_peers() -> Result<()> {
    let tracker_port = spawn_tracker().await?;
    let a = spawn_peer("alice", tracker_port).await?;
    let b = spawn_peer("bob", tracker_port).await?;
    let c = spawn_peer("carol", tracker_port).await?;

    api_post(
        &a.api_url("/handshake"),
        serde_json::json!({ "peer_id": b.peer_id }),
    )
    .await?;

    let resp = api_post(
        &a.api_url("/broadcast"),
        serde_json::json!({ "message": "hello everyone" }),
    )
    .await?;
    assert_eq!(resp["status"], "success");
    assert_eq!(resp["sent"], 1);
    assert_eq!(resp["requires_handshake"], 1);

    // B received it, C did not — but A's own log has exactly one
    // sender-side record regardless.
    let b_log = api_get(&b.api_url("/messages")).await?;
    assert_eq!(b_log["messages"][0]["type"], "broadcast");
    assert_eq!(b_log["messages"][0]["content"], "hello everyone");

    let c_log = api_get(&c.api_url("/messages")).await?;
    assert!(c_log["messages"].as_array().unwrap().is_empty());

    let a_log = api_get(&a.api_url("/messages")).await?;
    assert_eq!(a_log["messages"].as_array().unwrap().len(), 1);
    assert_eq!(a_log["messages"][0]["from"], "You");

    Ok(())
}

#[tokio::test]
async fn malformed_p2p_payload_is_a_structured_400() -> Result<()> {
    let tracker_port = spawn_tracker().await?;
    let a = spawn_peer("alice", tracker_port).await?;

    let resp = reqwest::Client::new()
        .post(a.p2p_url("/p2p/message"))
        .body("not json at all")
        .send()
        .await?;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["status"], "error");

    Ok(())
}
