//! Telemetry ingest - one push connection, one canonical snapshot stream.
//!
//! Raw messages arrive as UTF-8 JSON objects over a WebSocket. Each one is
//! normalized into an immutable [`TelemetrySnapshot`] and published through a
//! [`TelemetryFeed`], which keeps the latest snapshot for pull-style readers
//! and fans every snapshot out to subscribers in arrival order.
//!
//! # Components
//!
//! - [`snapshot`] - `TelemetrySnapshot`, `GeoPosition` and payload normalization
//! - [`feed`] - `TelemetryFeed`, the shared latest-snapshot cell and broadcaster
//! - [`ingestor`] - `TelemetryIngestor`, the tokio task owning the connection
//! - [`status`] - `ConnectionStatus`
//!
//! # Example
//!
//! ```ignore
//! let feed = TelemetryFeed::new(256);
//! let mut rx = feed.subscribe();
//! let handle = TelemetryIngestor::new(config, feed.clone()).start(cancel.clone());
//!
//! while let Ok(snapshot) = rx.recv().await {
//!     println!("#{} at {:?}", snapshot.sequence, snapshot.position());
//! }
//! ```
//!
//! Malformed payloads are logged and dropped without touching any state. A
//! lost connection leaves the last snapshot in place; nothing reconnects
//! automatically.

mod error;
pub mod feed;
pub mod ingestor;
pub mod snapshot;
pub mod status;

pub use error::TelemetryError;
pub use feed::{FeedStats, TelemetryFeed, DEFAULT_FEED_CAPACITY};
pub use ingestor::{TelemetryIngestor, TelemetryIngestorConfig, DEFAULT_TELEMETRY_URL};
pub use snapshot::{GeoPosition, TelemetrySnapshot, UNKNOWN_MODE};
pub use status::ConnectionStatus;
