//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types; parsing lives in [`super::parser`] and
//! serialization in [`super::writer`].

use std::path::PathBuf;
use std::time::Duration;

use crate::map::{CameraConfig, MapStyle, MapSyncConfig};
use crate::telemetry::{GeoPosition, TelemetryIngestorConfig};

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Telemetry stream settings
    pub telemetry: TelemetrySettings,
    /// Initial map view
    pub map: MapSettings,
    /// Camera follow behaviour
    pub camera: CameraSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// `[telemetry]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySettings {
    /// WebSocket endpoint (`ws://` or `wss://`).
    pub url: String,
    /// Connection handshake timeout in seconds.
    pub connect_timeout_secs: u64,
}

/// `[map]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    pub style: MapStyle,
}

/// `[camera]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSettings {
    pub follow_duration_ms: u64,
    pub recenter_duration_ms: u64,
    pub recenter_zoom: f64,
    pub rotate_with_heading: bool,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path.
    pub file: PathBuf,
}

impl ConfigFile {
    /// Ingestor configuration for the configured endpoint.
    pub fn ingestor_config(&self) -> TelemetryIngestorConfig {
        TelemetryIngestorConfig {
            url: self.telemetry.url.clone(),
            connect_timeout: Duration::from_secs(self.telemetry.connect_timeout_secs),
        }
    }

    /// Map synchronization settings from `[map]` and `[camera]`.
    pub fn map_sync_config(&self) -> MapSyncConfig {
        MapSyncConfig {
            center: GeoPosition::new(self.map.latitude, self.map.longitude),
            zoom: self.map.zoom,
            pitch: self.map.pitch,
            bearing: self.map.bearing,
            style: self.map.style,
            camera: CameraConfig {
                follow_duration: Duration::from_millis(self.camera.follow_duration_ms),
                recenter_duration: Duration::from_millis(self.camera.recenter_duration_ms),
                recenter_zoom: self.camera.recenter_zoom,
                rotate_with_heading: self.camera.rotate_with_heading,
            },
            ..MapSyncConfig::default()
        }
    }
}
