//! Telemetry Ingestor - WebSocket client for the vehicle telemetry stream.
//!
//! Holds exactly one connection to the telemetry endpoint and hands every
//! inbound message to the [`TelemetryFeed`]. Malformed messages are dropped by
//! the feed; transport errors end the session and leave the last snapshot in
//! place.
//!
//! # Example
//!
//! ```ignore
//! let feed = TelemetryFeed::default();
//! let cancel = CancellationToken::new();
//! let ingestor = TelemetryIngestor::with_defaults(feed.clone());
//! let handle = ingestor.start(cancel.clone());
//!
//! // ... on teardown
//! cancel.cancel();
//! handle.await??;
//! ```

use std::time::Duration;

use futures::StreamExt;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::error::TelemetryError;
use super::feed::TelemetryFeed;
use super::status::ConnectionStatus;

/// Endpoint of the local telemetry bridge.
pub const DEFAULT_TELEMETRY_URL: &str = "ws://localhost:8000/ws";

/// Telemetry ingestor configuration.
#[derive(Debug, Clone)]
pub struct TelemetryIngestorConfig {
    /// WebSocket endpoint URL.
    pub url: String,

    /// How long to wait for the connection handshake.
    pub connect_timeout: Duration,
}

impl Default for TelemetryIngestorConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_TELEMETRY_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// One-shot telemetry session.
///
/// The session ends when the server closes the connection, the transport
/// fails, or the cancellation token fires. It is not restarted.
pub struct TelemetryIngestor {
    config: TelemetryIngestorConfig,
    feed: TelemetryFeed,
}

impl TelemetryIngestor {
    pub fn new(config: TelemetryIngestorConfig, feed: TelemetryFeed) -> Self {
        Self { config, feed }
    }

    /// Create with default configuration.
    pub fn with_defaults(feed: TelemetryFeed) -> Self {
        Self::new(TelemetryIngestorConfig::default(), feed)
    }

    /// Configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Start the ingestor on the current tokio runtime.
    pub fn start(
        self,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<Result<(), TelemetryError>> {
        tokio::spawn(self.run(cancel))
    }

    async fn run(self, cancel: CancellationToken) -> Result<(), TelemetryError> {
        self.feed.set_status(ConnectionStatus::Connecting);

        let result = self.session(&cancel).await;
        if let Err(ref e) = result {
            warn!(url = %self.config.url, error = %e, "Telemetry connection failed");
        }

        self.feed.set_status(ConnectionStatus::Disconnected);

        let stats = self.feed.stats();
        info!(
            messages_received = stats.messages_received,
            snapshots_published = stats.snapshots_published,
            messages_dropped = stats.messages_dropped,
            "Telemetry ingestor stopped"
        );
        result
    }

    async fn session(&self, cancel: &CancellationToken) -> Result<(), TelemetryError> {
        let url = self.config.url.as_str();
        info!(url, "Connecting to telemetry stream");

        let connect = tokio_tungstenite::connect_async(url);
        let mut stream = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Cancelled before telemetry connection was established");
                return Ok(());
            }
            result = tokio::time::timeout(self.config.connect_timeout, connect) => {
                match result {
                    Ok(Ok((stream, _response))) => stream,
                    Ok(Err(e)) => {
                        return Err(TelemetryError::Connect {
                            url: url.to_string(),
                            source: Box::new(e),
                        });
                    }
                    Err(_) => {
                        return Err(TelemetryError::ConnectTimeout {
                            url: url.to_string(),
                            timeout: self.config.connect_timeout,
                        });
                    }
                }
            }
        };

        self.feed.set_status(ConnectionStatus::Connected);
        info!(url, "Telemetry stream connected");

        loop {
            let frame = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Telemetry ingestor cancelled, closing connection");
                    if let Err(e) = stream.close(None).await {
                        debug!(error = %e, "Error closing telemetry connection");
                    }
                    break;
                }
                frame = stream.next() => frame,
            };

            match frame {
                Some(Ok(Message::Text(text))) => {
                    self.feed.ingest_text(text.as_str());
                }
                Some(Ok(Message::Binary(data))) => match std::str::from_utf8(&data) {
                    Ok(text) => {
                        self.feed.ingest_text(text);
                    }
                    Err(e) => {
                        self.feed.record_dropped();
                        warn!(error = %TelemetryError::NotUtf8(e), len = data.len(), "Dropping binary telemetry frame");
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    info!(frame = ?frame, "Telemetry stream closed by server");
                    break;
                }
                Some(Ok(other)) => {
                    trace!(frame = ?other, "Ignoring control frame");
                }
                Some(Err(e)) => {
                    warn!(error = %e, "Telemetry stream error");
                    break;
                }
                None => {
                    info!("Telemetry stream ended");
                    break;
                }
            }
        }

        Ok(())
    }
}
