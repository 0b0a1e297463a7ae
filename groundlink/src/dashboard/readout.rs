//! Numeric telemetry readout.

use crate::telemetry::TelemetrySnapshot;

/// Shown for values the vehicle did not report.
pub const PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadoutRow {
    pub label: &'static str,
    pub value: String,
}

fn row(label: &'static str, value: Option<String>) -> ReadoutRow {
    ReadoutRow {
        label,
        value: value.unwrap_or_else(|| PLACEHOLDER.to_string()),
    }
}

fn coordinate(value: Option<f64>) -> Option<String> {
    value.filter(|v| v.is_finite()).map(|v| format!("{:.6}", v))
}

fn number(value: Option<f64>) -> Option<String> {
    value.map(|v| v.to_string())
}

/// Readout rows for the latest snapshot; `None` before any telemetry.
pub fn telemetry_readout(snapshot: Option<&TelemetrySnapshot>) -> Option<Vec<ReadoutRow>> {
    let s = snapshot?;
    Some(vec![
        row("Latitude", coordinate(s.latitude)),
        row("Longitude", coordinate(s.longitude)),
        row("Altitude (m)", number(s.altitude)),
        row("Speed (m/s)", number(s.speed)),
        row("Heading", number(s.heading)),
        row("Battery (%)", number(s.battery)),
        row("Mode", Some(s.mode.clone())),
        row("Armed", Some(if s.armed { "Yes" } else { "No" }.to_string())),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(rows: &'a [ReadoutRow], label: &str) -> &'a str {
        rows.iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
            .unwrap()
    }

    #[test]
    fn test_no_telemetry_yet() {
        assert_eq!(telemetry_readout(None), None);
    }

    #[test]
    fn test_full_readout() {
        let snapshot = TelemetrySnapshot {
            latitude: Some(47.397742),
            longitude: Some(8.5455941),
            altitude: Some(488.2),
            speed: Some(4.0),
            heading: Some(91.5),
            battery: Some(76.0),
            armed: true,
            mode: "POSCTL".to_string(),
            ..Default::default()
        };
        let rows = telemetry_readout(Some(&snapshot)).unwrap();

        assert_eq!(rows.len(), 8);
        assert_eq!(value(&rows, "Latitude"), "47.397742");
        assert_eq!(value(&rows, "Longitude"), "8.545594");
        assert_eq!(value(&rows, "Altitude (m)"), "488.2");
        assert_eq!(value(&rows, "Speed (m/s)"), "4");
        assert_eq!(value(&rows, "Heading"), "91.5");
        assert_eq!(value(&rows, "Battery (%)"), "76");
        assert_eq!(value(&rows, "Mode"), "POSCTL");
        assert_eq!(value(&rows, "Armed"), "Yes");
    }

    #[test]
    fn test_absent_values_use_placeholder() {
        let rows = telemetry_readout(Some(&TelemetrySnapshot::default())).unwrap();

        assert_eq!(value(&rows, "Latitude"), PLACEHOLDER);
        assert_eq!(value(&rows, "Battery (%)"), PLACEHOLDER);
        assert_eq!(value(&rows, "Mode"), "UNKNOWN");
        assert_eq!(value(&rows, "Armed"), "No");
    }
}
