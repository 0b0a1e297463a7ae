//! Telemetry error types.

use std::time::Duration;

use tokio_tungstenite::tungstenite;

/// Errors raised while receiving or normalizing telemetry.
///
/// None of these are fatal to the dashboard: parse errors drop a single
/// message, transport errors end the ingestor task.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Payload is not valid JSON or a field has the wrong type.
    #[error("Malformed telemetry payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Payload is valid JSON but not an object.
    #[error("Telemetry payload must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },

    /// A field carries a value that cannot be interpreted.
    #[error("Invalid telemetry field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Binary frame that is not UTF-8 text.
    #[error("Telemetry frame is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),

    /// Could not establish the WebSocket connection.
    #[error("Failed to connect to telemetry stream {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<tungstenite::Error>,
    },

    /// Connection attempt did not complete in time.
    #[error("Timed out after {timeout:?} connecting to telemetry stream {url}")]
    ConnectTimeout { url: String, timeout: Duration },
}
