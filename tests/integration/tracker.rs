//! Tracker registry endpoints, end to end over HTTP.

use crate::*;

use anyhow::Result;
use confab_core::proto::RegisterRequest;
use confab_core::ProtocolError;
use confab_services::TrackerClient;

#[tokio::test]
async fn register_list_unregister_roundtrip() -> Result<()> {
    let tracker_port = spawn_tracker().await?;
    let client = TrackerClient::new("127.0.0.1", tracker_port);

    let total = client
        .register(&RegisterRequest {
            peer_id: "peer_2000".to_string(),
            ip: "127.0.0.1".to_string(),
            port: 2000,
            username: "alice".to_string(),
        })
        .await?;
    assert_eq!(total, 1);

    // Re-registering the same id never produces two entries.
    let total = client
        .register(&RegisterRequest {
            peer_id: "peer_2000".to_string(),
            ip: "127.0.0.1".to_string(),
            port: 2000,
            username: "alice-again".to_string(),
        })
        .await?;
    assert_eq!(total, 1);

    let peers = client.list_peers().await?;
    assert_eq!(peers.len(), 1);
    assert_eq!(peers[0].id, "peer_2000");
    assert_eq!(peers[0].username, "alice-again");

    assert_eq!(client.unregister("peer_2000").await?, 0);
    assert!(client.list_peers().await?.is_empty());

    // Unregistering an unknown peer is an error, not a crash.
    let err = client.unregister("peer_2000").await.unwrap_err();
    assert!(matches!(err, ProtocolError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn connect_info_resolves_registered_peers_only() -> Result<()> {
    let tracker_port = spawn_tracker().await?;
    let client = TrackerClient::new("127.0.0.1", tracker_port);

    client
        .register(&RegisterRequest {
            peer_id: "peer_3000".to_string(),
            ip: "10.1.2.3".to_string(),
            port: 3000,
            username: "bob".to_string(),
        })
        .await?;

    let info = client.connect_info("peer_3000").await?;
    assert_eq!(info.ip, "10.1.2.3");
    assert_eq!(info.port, 3000);
    assert_eq!(info.username, "bob");

    let err = client.connect_info("peer_9999").await.unwrap_err();
    assert!(matches!(err, ProtocolError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn channel_lifecycle() -> Result<()> {
    let tracker_port = spawn_tracker().await?;
    let client = TrackerClient::new("127.0.0.1", tracker_port);

    // The default channel is seeded at startup.
    let channels = client.list_channels().await?;
    assert!(channels.iter().any(|c| c.name == "general" && c.owner == "system"));

    client.create_channel("dev", "peer_2000").await?;
    let err = client.create_channel("dev", "peer_3000").await.unwrap_err();
    assert!(matches!(err, ProtocolError::AlreadyExists));

    let err = client.join_channel("nope", "peer_3000").await.unwrap_err();
    assert!(matches!(err, ProtocolError::NotFound(_)));

    // Joining twice leaves the member count unchanged.
    client.join_channel("dev", "peer_3000").await?;
    client.join_channel("dev", "peer_3000").await?;
    let channels = client.list_channels().await?;
    let dev = channels.iter().find(|c| c.name == "dev").unwrap();
    assert_eq!(dev.members, 2);
    assert_eq!(dev.owner, "peer_2000");

    // Member listing resolves usernames and drops unregistered members.
    client
        .register(&RegisterRequest {
            peer_id: "peer_2000".to_string(),
            ip: "127.0.0.1".to_string(),
            port: 2000,
            username: "alice".to_string(),
        })
        .await?;
    let members = client.channel_members("dev").await?;
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, "peer_2000");
    assert_eq!(members[0].username, "alice");

    Ok(())
}
