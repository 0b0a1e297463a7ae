//! Formatting utilities for dashboard display.
//!
//! Compact formatters for the map panel and header, where space is tighter
//! than in the telemetry readout.

use std::time::Duration;

/// Format a duration in compact form.
///
/// Returns strings like "5s", "2m30s", "1h15m".
pub fn format_duration_compact(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
    }
}

/// Format a bearing or heading as a zero-padded whole degree.
pub fn format_degrees(degrees: f64) -> String {
    format!("{:03.0}°", degrees.rem_euclid(360.0).round() % 360.0)
}

/// Format a position with hemisphere suffixes.
///
/// # Examples
/// ```ignore
/// assert_eq!(format_position(47.3977, -8.5456), "47.39770°N 8.54560°W");
/// ```
pub fn format_position(latitude: f64, longitude: f64) -> String {
    let ns = if latitude >= 0.0 { "N" } else { "S" };
    let ew = if longitude >= 0.0 { "E" } else { "W" };
    format!(
        "{:.5}°{} {:.5}°{}",
        latitude.abs(),
        ns,
        longitude.abs(),
        ew
    )
}

/// Format a chart value with a unit, trimming noise on large numbers.
pub fn format_value(value: f64, unit: &str) -> String {
    if value.abs() >= 100.0 {
        format!("{:.0}{}", value, unit)
    } else {
        format!("{:.1}{}", value, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_compact() {
        assert_eq!(format_duration_compact(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration_compact(Duration::from_secs(150)), "2m30s");
        assert_eq!(format_duration_compact(Duration::from_secs(4500)), "1h15m");
    }

    #[test]
    fn test_format_degrees() {
        assert_eq!(format_degrees(0.0), "000°");
        assert_eq!(format_degrees(45.4), "045°");
        assert_eq!(format_degrees(-90.0), "270°");
        assert_eq!(format_degrees(359.8), "000°");
    }

    #[test]
    fn test_format_position() {
        assert_eq!(format_position(47.3977, 8.5456), "47.39770°N 8.54560°E");
        assert_eq!(format_position(-33.8688, -70.0), "33.86880°S 70.00000°W");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(12.345, " m"), "12.3 m");
        assert_eq!(format_value(480.6, " m"), "481 m");
    }
}
