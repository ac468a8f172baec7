//! Channel creation, membership, and handshake-free fan-out.

use crate::*;

use anyhow::Result;

#[tokio::test]
async fn channel_send_reaches_members_without_handshake() -> Result<()> {
    let tracker_port = spawn_tracker().await?;
    let a = spawn_peer("alice", tracker_port).await?;
    let b = spawn_peer("bob", tracker_port).await?;

    // A creates (becoming first member), B joins. No handshake anywhere.
    let resp = api_post(&a.api_url("/channel/create"), serde_json::json!({ "channel": "dev" }))
        .await?;
    assert_eq!(resp["status"], "success");

    let resp = api_post(&b.api_url("/channel/join"), serde_json::json!({ "channel": "dev" }))
        .await?;
    assert_eq!(resp["status"], "success");

    let resp = api_post(
        &a.api_url("/channel/send"),
        serde_json::json!({ "channel": "dev", "message": "standup time" }),
    )
    .await?;
    assert_eq!(resp["status"], "success");
    assert_eq!(resp["sent"], 1);

    let b_log = api_get(&b.api_url("/messages")).await?;
    assert_eq!(b_log["messages"][0]["type"], "channel");
    assert_eq!(b_log["messages"][0]["channel"], "dev");
    assert_eq!(b_log["messages"][0]["content"], "standup time");
    assert_eq!(b_log["messages"][0]["from"], a.peer_id);

    // Sender-side record carries the channel name too.
    let a_log = api_get(&a.api_url("/messages")).await?;
    assert_eq!(a_log["messages"][0]["from"], "You");
    assert_eq!(a_log["messages"][0]["channel"], "dev");

    Ok(())
}

#[tokio::test]
async fn duplicate_create_and_unknown_join_surface_errors() -> Result<()> {
    let tracker_port = spawn_tracker().await?;
    let a = spawn_peer("alice", tracker_port).await?;

    api_post(&a.api_url("/channel/create"), serde_json::json!({ "channel": "dev" })).await?;
    let resp = api_post(&a.api_url("/channel/create"), serde_json::json!({ "channel": "dev" }))
        .await?;
    assert_eq!(resp["status"], "error");
    assert_eq!(resp["message"], "Channel exists");

    let resp = api_post(&a.api_url("/channel/join"), serde_json::json!({ "channel": "ghost" }))
        .await?;
    assert_eq!(resp["status"], "error");
    assert_eq!(resp["message"], "Channel not found");

    Ok(())
}

#[tokio::test]
async fn channel_list_shows_owner_and_member_count() -> Result<()> {
    let tracker_port = spawn_tracker().await?;
    let a = spawn_peer("alice", tracker_port).await?;
    let b = spawn_peer("bob", tracker_port).await?;

    api_post(&a.api_url("/channel/create"), serde_json::json!({ "channel": "dev" })).await?;
    api_post(&b.api_url("/channel/join"), serde_json::json!({ "channel": "dev" })).await?;

    let resp = api_get(&a.api_url("/channels")).await?;
    assert_eq!(resp["status"], "success");
    let channels = resp["channels"].as_array().unwrap();
    let dev = channels.iter().find(|c| c["name"] == "dev").unwrap();
    assert_eq!(dev["owner"], a.peer_id);
    assert_eq!(dev["members"], 2);

    Ok(())
}
