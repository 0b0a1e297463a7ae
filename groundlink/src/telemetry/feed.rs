//! Shared telemetry feed - latest snapshot plus ordered fan-out.
//!
//! The feed is the single writer of snapshots. Parsing, sequence assignment,
//! storing the latest value and broadcasting happen under one write lock, so
//! subscribers observe snapshots strictly in arrival order with no gaps in
//! `sequence` other than those caused by a lagging receiver.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::error::TelemetryError;
use super::snapshot::TelemetrySnapshot;
use super::status::ConnectionStatus;

/// Default broadcast capacity. Large enough that a dashboard ticking at
/// 20Hz does not lag behind a 10Hz stream.
pub const DEFAULT_FEED_CAPACITY: usize = 256;

/// Message counters for display and diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Raw messages handed to the feed.
    pub messages_received: u64,
    /// Messages accepted and published as snapshots.
    pub snapshots_published: u64,
    /// Messages dropped as malformed.
    pub messages_dropped: u64,
}

struct FeedState {
    latest: Option<TelemetrySnapshot>,
    status: ConnectionStatus,
    next_sequence: u64,
    stats: FeedStats,
}

/// Cloneable handle to the telemetry feed.
#[derive(Clone)]
pub struct TelemetryFeed {
    state: Arc<RwLock<FeedState>>,
    broadcast_tx: broadcast::Sender<TelemetrySnapshot>,
}

impl TelemetryFeed {
    /// Create a feed whose subscribers buffer up to `capacity` snapshots.
    pub fn new(capacity: usize) -> Self {
        let (broadcast_tx, _) = broadcast::channel(capacity.max(1));
        Self {
            state: Arc::new(RwLock::new(FeedState {
                latest: None,
                status: ConnectionStatus::Disconnected,
                next_sequence: 1,
                stats: FeedStats::default(),
            })),
            broadcast_tx,
        }
    }

    /// Ingest one raw message received now.
    ///
    /// Malformed messages are logged and dropped; `None` is returned and no
    /// state other than the drop counter changes.
    pub fn ingest_text(&self, text: &str) -> Option<TelemetrySnapshot> {
        match self.ingest_text_at(text, Utc::now()) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                let preview: String = text.chars().take(80).collect();
                warn!(error = %e, preview = %preview, "Dropping malformed telemetry message");
                None
            }
        }
    }

    /// Ingest one raw message with an explicit arrival time.
    pub fn ingest_text_at(
        &self,
        text: &str,
        received_at: DateTime<Utc>,
    ) -> Result<TelemetrySnapshot, TelemetryError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.stats.messages_received += 1;

        let snapshot = match TelemetrySnapshot::from_json(text, state.next_sequence, received_at)
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                state.stats.messages_dropped += 1;
                return Err(e);
            }
        };

        state.next_sequence += 1;
        state.stats.snapshots_published += 1;
        state.latest = Some(snapshot.clone());

        if snapshot.sequence == 1 {
            info!(
                has_position = snapshot.has_position(),
                armed = snapshot.armed,
                mode = %snapshot.mode,
                "First telemetry snapshot"
            );
        }

        // No subscribers is fine; the latest value is still retained.
        if self.broadcast_tx.send(snapshot.clone()).is_err() {
            debug!(sequence = snapshot.sequence, "No telemetry subscribers");
        }

        Ok(snapshot)
    }

    /// Count a message dropped before it reached the parser.
    pub fn record_dropped(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.stats.messages_received += 1;
        state.stats.messages_dropped += 1;
    }

    /// Latest accepted snapshot. Survives disconnects.
    pub fn latest(&self) -> Option<TelemetrySnapshot> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .latest
            .clone()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .status
    }

    /// Update the transport status. Transitions are logged.
    pub fn set_status(&self, status: ConnectionStatus) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.status != status {
            info!(from = %state.status, to = %status, "Telemetry connection status changed");
            state.status = status;
        }
    }

    pub fn stats(&self) -> FeedStats {
        self.state.read().unwrap_or_else(PoisonError::into_inner).stats
    }

    /// Subscribe to snapshots published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<TelemetrySnapshot> {
        self.broadcast_tx.subscribe()
    }
}

impl Default for TelemetryFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_start_at_one_and_skip_dropped() {
        let feed = TelemetryFeed::default();

        let first = feed.ingest_text(r#"{"lat": 1.0, "lon": 2.0}"#).unwrap();
        assert!(feed.ingest_text("not json").is_none());
        let second = feed.ingest_text(r#"{"alt": 5}"#).unwrap();

        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
    }

    #[test]
    fn test_malformed_message_leaves_latest_untouched() {
        let feed = TelemetryFeed::default();
        feed.ingest_text(r#"{"lat": 1.0, "lon": 2.0, "battery": 90}"#);

        assert!(feed.ingest_text(r#"{"lat": "bad"}"#).is_none());

        let latest = feed.latest().unwrap();
        assert_eq!(latest.sequence, 1);
        assert_eq!(latest.battery, Some(90.0));
    }

    #[test]
    fn test_stats() {
        let feed = TelemetryFeed::default();
        feed.ingest_text("{}");
        feed.ingest_text("[]");
        feed.record_dropped();

        assert_eq!(
            feed.stats(),
            FeedStats {
                messages_received: 3,
                snapshots_published: 1,
                messages_dropped: 2,
            }
        );
    }

    #[test]
    fn test_latest_survives_disconnect() {
        let feed = TelemetryFeed::default();
        feed.set_status(ConnectionStatus::Connected);
        feed.ingest_text(r#"{"alt": 12}"#);
        feed.set_status(ConnectionStatus::Disconnected);

        assert_eq!(feed.status(), ConnectionStatus::Disconnected);
        assert_eq!(feed.latest().unwrap().altitude, Some(12.0));
    }

    #[tokio::test]
    async fn test_subscribers_receive_in_arrival_order() {
        let feed = TelemetryFeed::default();
        let mut rx_a = feed.subscribe();
        let mut rx_b = feed.subscribe();

        for alt in [1, 2, 3] {
            feed.ingest_text(&format!(r#"{{"alt": {}}}"#, alt));
        }

        for rx in [&mut rx_a, &mut rx_b] {
            let received: Vec<u64> = (0..3).map(|_| rx.try_recv().unwrap().sequence).collect();
            assert_eq!(received, vec![1, 2, 3]);
        }
    }

    #[test]
    fn test_publish_without_subscribers() {
        let feed = TelemetryFeed::new(4);
        assert!(feed.ingest_text("{}").is_some());
    }
}
