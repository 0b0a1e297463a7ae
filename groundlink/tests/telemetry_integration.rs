//! Integration tests for the telemetry pipeline.
//!
//! A local WebSocket server plays the telemetry bridge; the real ingestor
//! connects to it and feeds a ground station backed by the in-memory map.
//!
//! Run with: `cargo test --test telemetry_integration`

use std::time::{Duration, Instant};

use futures::SinkExt;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use groundlink::dashboard::{AlertLevel, GroundStation};
use groundlink::map::layers::PATH_SOURCE_ID;
use groundlink::map::{MapSyncConfig, SceneMap};
use groundlink::telemetry::{
    ConnectionStatus, GeoPosition, TelemetryFeed, TelemetryIngestor, TelemetryIngestorConfig,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Bind a server on an ephemeral port that sends `frames` to the first
/// client, then either closes or waits for `hold` to fire.
async fn serve(
    frames: Vec<Message>,
    hold: Option<oneshot::Receiver<()>>,
) -> (String, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/ws", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        for frame in frames {
            ws.send(frame).await.unwrap();
        }
        match hold {
            Some(hold) => {
                let _ = hold.await;
            }
            None => {
                let _ = ws.close(None).await;
            }
        }
    });

    (url, handle)
}

fn text(payload: &str) -> Message {
    Message::Text(payload.to_string().into())
}

fn ingestor(url: String, feed: &TelemetryFeed) -> TelemetryIngestor {
    TelemetryIngestor::new(
        TelemetryIngestorConfig {
            url,
            connect_timeout: Duration::from_secs(5),
        },
        feed.clone(),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_stream_reaches_dashboard_in_order() {
    let (url, server) = serve(
        vec![
            text(r#"{"lat": 47.3977, "lon": 8.5456, "alt": 10.0, "armed": true, "battery": 95}"#),
            text(r#"{"lat": 47.3978, "lon": 8.5457, "alt": 10.8, "armed": true, "battery": 94}"#),
            text(r#"{"lat": 47.3979, "lon": 8.5458, "alt": 11.0, "armed": true, "battery": 94}"#),
        ],
        None,
    )
    .await;

    let feed = TelemetryFeed::default();
    let mut updates = feed.subscribe();
    let result = ingestor(url, &feed)
        .start(CancellationToken::new())
        .await
        .unwrap();
    server.await.unwrap();
    assert!(result.is_ok());

    let mut station = GroundStation::<SceneMap>::mount(MapSyncConfig::default()).unwrap();
    station.pump_map_events();
    assert_eq!(station.drain(&mut updates, Instant::now()), 3);

    let trail = station
        .map()
        .engine()
        .source_data(PATH_SOURCE_ID)
        .unwrap()
        .coordinates
        .clone();
    assert_eq!(
        trail,
        vec![[8.5456, 47.3977], [8.5457, 47.3978], [8.5458, 47.3979]]
    );
    assert_eq!(station.chart().len(), 3);
    let view = station.view();
    assert!(view.online);
    assert!(view.alerts.iter().all(|a| a.level == AlertLevel::Ok));
}

#[tokio::test]
async fn test_malformed_messages_are_dropped() {
    let (url, server) = serve(
        vec![
            text(r#"{"lat": 1.0, "lon": 2.0, "alt": 5}"#),
            text("not json at all"),
            text(r#"["array", "payload"]"#),
            text(r#"{"lat": "north"}"#),
            Message::Binary(br#"{"alt": 7}"#.to_vec().into()),
            Message::Binary(vec![0xff, 0xfe, 0xfd].into()),
        ],
        None,
    )
    .await;

    let feed = TelemetryFeed::default();
    ingestor(url, &feed)
        .start(CancellationToken::new())
        .await
        .unwrap()
        .unwrap();
    server.await.unwrap();

    let stats = feed.stats();
    assert_eq!(stats.messages_received, 6);
    assert_eq!(stats.snapshots_published, 2);
    assert_eq!(stats.messages_dropped, 4);

    let latest = feed.latest().unwrap();
    assert_eq!(latest.sequence, 2);
    assert_eq!(latest.altitude, Some(7.0));
    assert_eq!(latest.position(), None);
}

#[tokio::test]
async fn test_disconnect_keeps_last_snapshot() {
    let (url, server) = serve(vec![text(r#"{"lat": 12.5, "lon": 77.5}"#)], None).await;

    let feed = TelemetryFeed::default();
    ingestor(url, &feed)
        .start(CancellationToken::new())
        .await
        .unwrap()
        .unwrap();
    server.await.unwrap();

    assert_eq!(feed.status(), ConnectionStatus::Disconnected);
    assert_eq!(
        feed.latest().and_then(|s| s.position()),
        Some(GeoPosition::new(12.5, 77.5))
    );
}

#[tokio::test]
async fn test_cancel_closes_open_connection() {
    let (release_tx, release_rx) = oneshot::channel();
    let (url, server) = serve(vec![text(r#"{"alt": 1}"#)], Some(release_rx)).await;

    let feed = TelemetryFeed::default();
    let mut updates = feed.subscribe();
    let cancel = CancellationToken::new();
    let handle = ingestor(url, &feed).start(cancel.clone());

    // Wait until the first message has made it through.
    let first = tokio::time::timeout(Duration::from_secs(5), updates.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.sequence, 1);
    assert_eq!(feed.status(), ConnectionStatus::Connected);

    cancel.cancel();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
    assert_eq!(feed.status(), ConnectionStatus::Disconnected);

    let _ = release_tx.send(());
    server.await.unwrap();
}
