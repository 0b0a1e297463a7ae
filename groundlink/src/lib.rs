//! Groundlink - live drone telemetry on an interactive map
//!
//! This library keeps a map view, a vehicle marker, a bounded flight-path
//! trail, a camera-follow behaviour and the map style/layer set consistent with
//! a continuous telemetry stream from a single vehicle.
//!
//! # High-Level API
//!
//! ```ignore
//! use groundlink::dashboard::{DashboardCommand, GroundStation};
//! use groundlink::map::{MapSyncConfig, SceneMap};
//! use groundlink::telemetry::{TelemetryFeed, TelemetryIngestor, TelemetryIngestorConfig};
//!
//! let feed = TelemetryFeed::new(256);
//! let mut updates = feed.subscribe();
//! let ingestor = TelemetryIngestor::new(TelemetryIngestorConfig::default(), feed.clone());
//! let handle = ingestor.start(cancel.clone());
//!
//! let mut station = GroundStation::<SceneMap>::mount(MapSyncConfig::default())?;
//! while let Ok(snapshot) = updates.try_recv() {
//!     station.on_snapshot(snapshot, Instant::now());
//! }
//! station.command(DashboardCommand::ToggleStyle);
//! ```

pub mod config;
pub mod dashboard;
pub mod history;
pub mod logging;
pub mod map;
pub mod telemetry;

/// Version of the groundlink library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
