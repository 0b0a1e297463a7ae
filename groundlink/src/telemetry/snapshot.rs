//! Canonical telemetry snapshot and payload normalization.
//!
//! Wire payloads look like:
//!
//! ```text
//! {"lat": 47.3977, "lon": 8.5456, "alt": 12.4, "speed": 3.1,
//!  "heading": 271, "battery": 84, "armed": true, "mode": "POSCTL"}
//! ```
//!
//! Every field is optional. Missing or `null` fields become `None` (or the
//! documented default for `armed` and `mode`), and consumers degrade
//! gracefully instead of failing.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::error::TelemetryError;

/// Flight-mode label used when the payload carries none.
pub const UNKNOWN_MODE: &str = "UNKNOWN";

/// WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
}

impl GeoPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a position only when both coordinates are present and finite.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(Self::new(lat, lon))
            }
            _ => None,
        }
    }

    /// `[longitude, latitude]` pair, the order map geometry uses.
    #[inline]
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// One normalized telemetry reading.
///
/// Snapshots are immutable values; the ingest side assigns each one a
/// strictly increasing `sequence` so consumers can recognise a snapshot they
/// have already processed.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    /// Arrival order, starting at 1 for the first accepted message.
    pub sequence: u64,
    /// When the message was received.
    pub received_at: DateTime<Utc>,
    /// Latitude in degrees, absent without a GPS fix.
    pub latitude: Option<f64>,
    /// Longitude in degrees, absent without a GPS fix.
    pub longitude: Option<f64>,
    /// Altitude in meters.
    pub altitude: Option<f64>,
    /// Ground speed in meters/second.
    pub speed: Option<f64>,
    /// Heading in degrees, normalized to [0, 360).
    pub heading: Option<f64>,
    /// Remaining battery in percent.
    pub battery: Option<f64>,
    /// Whether the vehicle is armed (false when not reported).
    pub armed: bool,
    /// Free-form flight-mode label ([`UNKNOWN_MODE`] when not reported).
    pub mode: String,
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self {
            sequence: 0,
            received_at: DateTime::<Utc>::default(),
            latitude: None,
            longitude: None,
            altitude: None,
            speed: None,
            heading: None,
            battery: None,
            armed: false,
            mode: UNKNOWN_MODE.to_string(),
        }
    }
}

/// Raw payload shape. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct WirePayload {
    lat: Option<f64>,
    lon: Option<f64>,
    alt: Option<f64>,
    speed: Option<f64>,
    heading: Option<f64>,
    battery: Option<f64>,
    armed: Option<bool>,
    mode: Option<Value>,
}

impl TelemetrySnapshot {
    /// Parse and normalize one wire message.
    ///
    /// The message is accepted or rejected as a whole.
    pub fn from_json(
        text: &str,
        sequence: u64,
        received_at: DateTime<Utc>,
    ) -> Result<Self, TelemetryError> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(TelemetryError::NotAnObject {
                kind: json_kind(&value),
            });
        }

        let payload: WirePayload = serde_json::from_value(value)?;
        let mode = normalize_mode(payload.mode)?;

        Ok(Self {
            sequence,
            received_at,
            latitude: finite(payload.lat),
            longitude: finite(payload.lon),
            altitude: finite(payload.alt),
            speed: finite(payload.speed),
            heading: finite(payload.heading).map(|h| h.rem_euclid(360.0)),
            battery: finite(payload.battery),
            armed: payload.armed.unwrap_or(false),
            mode,
        })
    }

    /// Position, when both coordinates are present and finite.
    pub fn position(&self) -> Option<GeoPosition> {
        GeoPosition::from_parts(self.latitude, self.longitude)
    }

    pub fn has_position(&self) -> bool {
        self.position().is_some()
    }

    /// Heading for display and marker rotation, 0 when absent.
    pub fn heading_or_default(&self) -> f64 {
        self.heading.unwrap_or(0.0)
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Flight modes arrive as labels from most bridges and as the raw numeric
/// custom mode from MAVLink ones.
fn normalize_mode(mode: Option<Value>) -> Result<String, TelemetryError> {
    match mode {
        None | Some(Value::Null) => Ok(UNKNOWN_MODE.to_string()),
        Some(Value::String(label)) => {
            let label = label.trim();
            if label.is_empty() {
                Ok(UNKNOWN_MODE.to_string())
            } else {
                Ok(label.to_string())
            }
        }
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(other) => Err(TelemetryError::InvalidField {
            field: "mode",
            reason: format!("expected string or number, got {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
