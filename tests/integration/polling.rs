//! Long-poll endpoints: wake on change, stay independent per poller.
//!
//! The no-update timeout path is covered at the services layer (short
//! timeouts); holding a request open for the full 30 s window has no place
//! in a test suite.

use crate::*;

use anyhow::Result;

#[tokio::test]
async fn message_poll_wakes_on_inbound_delivery() -> Result<()> {
    let tracker_port = spawn_tracker().await?;
    let a = spawn_peer("alice", tracker_port).await?;
    let b = spawn_peer("bob", tracker_port).await?;

    api_post(
        &a.api_url("/handshake"),
        serde_json::json!({ "peer_id": b.peer_id }),
    )
    .await?;

    // Arm the poll on B before A sends.
    let poll_url = b.api_url("/messages/poll");
    let poll = tokio::spawn(async move { api_get(&poll_url).await });

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    api_post(
        &a.api_url("/send"),
        serde_json::json!({ "to": b.peer_id, "message": "wake up" }),
    )
    .await?;

    let resp = poll.await.unwrap()?;
    assert_eq!(resp["status"], "success");
    assert_eq!(resp["has_update"], true);
    let messages = resp["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["content"], "wake up");

    Ok(())
}

#[tokio::test]
async fn message_poll_wakes_on_own_send_too() -> Result<()> {
    let tracker_port = spawn_tracker().await?;
    let a = spawn_peer("alice", tracker_port).await?;
    let b = spawn_peer("bob", tracker_port).await?;

    api_post(
        &a.api_url("/handshake"),
        serde_json::json!({ "peer_id": b.peer_id }),
    )
    .await?;

    // The sender's own log append also trips the notifier.
    let poll_url = a.api_url("/messages/poll");
    let poll = tokio::spawn(async move { api_get(&poll_url).await });

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    api_post(
        &a.api_url("/send"),
        serde_json::json!({ "to": b.peer_id, "message": "echo" }),
    )
    .await?;

    let resp = poll.await.unwrap()?;
    assert_eq!(resp["has_update"], true);
    assert_eq!(resp["messages"][0]["from"], "You");

    Ok(())
}

#[tokio::test]
async fn peers_poll_sees_count_changes() -> Result<()> {
    let tracker_port = spawn_tracker().await?;
    let a = spawn_peer("alice", tracker_port).await?;

    // First poll: remembered count starts at zero, the tracker already has
    // one peer — an immediate update that seeds the baseline.
    let resp = api_get(&a.api_url("/peers/poll")).await?;
    assert_eq!(resp["has_update"], true);

    // Second poll: armed against the seeded baseline, woken by a new
    // registration.
    let poll_url = a.api_url("/peers/poll");
    let poll = tokio::spawn(async move { api_get(&poll_url).await });

    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    let _b = spawn_peer("bob", tracker_port).await?;

    let resp = poll.await.unwrap()?;
    assert_eq!(resp["status"], "success");
    assert_eq!(resp["has_update"], true);

    Ok(())
}

#[tokio::test]
async fn channels_poll_sees_new_channel() -> Result<()> {
    let tracker_port = spawn_tracker().await?;
    let a = spawn_peer("alice", tracker_port).await?;

    // Seed the baseline (the default channel already exists).
    let resp = api_get(&a.api_url("/channels/poll")).await?;
    assert_eq!(resp["has_update"], true);

    let poll_url = a.api_url("/channels/poll");
    let poll = tokio::spawn(async move { api_get(&poll_url).await });

    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    api_post(&a.api_url("/channel/create"), serde_json::json!({ "channel": "dev" })).await?;

    let resp = poll.await.unwrap()?;
    assert_eq!(resp["has_update"], true);

    Ok(())
}
