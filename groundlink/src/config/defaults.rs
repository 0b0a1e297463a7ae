//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use std::path::PathBuf;

use super::settings::*;
use crate::map::{MapStyle, DEFAULT_CENTER};
use crate::telemetry::DEFAULT_TELEMETRY_URL;

// =============================================================================
// Telemetry
// =============================================================================

/// Default connection handshake timeout (seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Map view
// =============================================================================

pub const DEFAULT_ZOOM: f64 = 12.0;
pub const DEFAULT_PITCH: f64 = 55.0;
pub const DEFAULT_BEARING: f64 = 0.0;

pub const MAX_ZOOM: f64 = 22.0;
pub const MAX_PITCH: f64 = 85.0;

// =============================================================================
// Camera
// =============================================================================

pub const DEFAULT_FOLLOW_DURATION_MS: u64 = 700;
pub const DEFAULT_RECENTER_DURATION_MS: u64 = 900;
pub const DEFAULT_RECENTER_ZOOM: f64 = 16.0;

// =============================================================================
// Logging
// =============================================================================

/// Default log file: ~/.groundlink/logs/groundlink.log
pub fn default_log_file() -> PathBuf {
    crate::logging::default_log_dir().join(crate::logging::default_log_file())
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            telemetry: TelemetrySettings {
                url: DEFAULT_TELEMETRY_URL.to_string(),
                connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            map: MapSettings {
                latitude: DEFAULT_CENTER.latitude,
                longitude: DEFAULT_CENTER.longitude,
                zoom: DEFAULT_ZOOM,
                pitch: DEFAULT_PITCH,
                bearing: DEFAULT_BEARING,
                style: MapStyle::Dark,
            },
            camera: CameraSettings {
                follow_duration_ms: DEFAULT_FOLLOW_DURATION_MS,
                recenter_duration_ms: DEFAULT_RECENTER_DURATION_MS,
                recenter_zoom: DEFAULT_RECENTER_ZOOM,
                rotate_with_heading: true,
            },
            logging: LoggingSettings {
                file: default_log_file(),
            },
        }
    }
}
