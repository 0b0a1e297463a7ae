//! Flight-path trail.

use crate::history::BoundedHistory;
use crate::telemetry::{GeoPosition, TelemetrySnapshot};

use super::engine::LineString;

/// Maximum number of trail points.
pub const FLIGHT_PATH_CAPACITY: usize = 200;

/// Result of offering a snapshot to the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathUpdate {
    /// Position appended.
    Appended,
    /// Snapshot accepted but carries no position.
    NoPosition,
    /// Snapshot already seen; nothing changed.
    Duplicate,
}

/// Bounded FIFO of recent vehicle positions.
///
/// Each snapshot contributes at most once: offering the same or an older
/// `sequence` again is ignored.
#[derive(Debug, Clone)]
pub struct FlightPath {
    points: BoundedHistory<GeoPosition>,
    last_sequence: Option<u64>,
}

impl FlightPath {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: BoundedHistory::new(capacity),
            last_sequence: None,
        }
    }

    /// Offer a snapshot to the trail.
    pub fn record(&mut self, snapshot: &TelemetrySnapshot) -> PathUpdate {
        if self
            .last_sequence
            .is_some_and(|last| snapshot.sequence <= last)
        {
            return PathUpdate::Duplicate;
        }
        self.last_sequence = Some(snapshot.sequence);

        match snapshot.position() {
            Some(position) => {
                self.points.push(position);
                PathUpdate::Appended
            }
            None => PathUpdate::NoPosition,
        }
    }

    /// Append a position directly. Positions with a non-finite coordinate
    /// are ignored.
    pub fn append(&mut self, position: GeoPosition) -> bool {
        if !(position.latitude.is_finite() && position.longitude.is_finite()) {
            return false;
        }
        self.points.push(position);
        true
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.points.capacity()
    }

    pub fn latest(&self) -> Option<GeoPosition> {
        self.points.latest().copied()
    }

    /// Positions oldest first.
    pub fn points(&self) -> impl Iterator<Item = &GeoPosition> {
        self.points.iter()
    }

    /// Full trail as line geometry for a full-replace source update.
    pub fn to_line_string(&self) -> LineString {
        LineString::new(self.points.iter().map(GeoPosition::lon_lat).collect())
    }
}

impl Default for FlightPath {
    fn default() -> Self {
        Self::new(FLIGHT_PATH_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(sequence: u64, lat: Option<f64>, lon: Option<f64>) -> TelemetrySnapshot {
        TelemetrySnapshot {
            sequence,
            latitude: lat,
            longitude: lon,
            ..Default::default()
        }
    }

    #[test]
    fn test_keeps_last_200_in_arrival_order() {
        let mut path = FlightPath::default();
        for i in 0..250u64 {
            let update = path.record(&snapshot(i + 1, Some(i as f64 * 0.001), Some(8.0)));
            assert_eq!(update, PathUpdate::Appended);
        }

        assert_eq!(path.len(), 200);
        let lats: Vec<f64> = path.points().map(|p| p.latitude).collect();
        let expected: Vec<f64> = (50..250u64).map(|i| i as f64 * 0.001).collect();
        assert_eq!(lats, expected);
    }

    #[test]
    fn test_partial_position_is_not_appended() {
        let mut path = FlightPath::default();
        assert_eq!(
            path.record(&snapshot(1, Some(47.0), None)),
            PathUpdate::NoPosition
        );
        assert_eq!(
            path.record(&snapshot(2, None, Some(8.0))),
            PathUpdate::NoPosition
        );
        assert_eq!(
            path.record(&snapshot(3, Some(f64::NAN), Some(8.0))),
            PathUpdate::NoPosition
        );
        assert!(path.is_empty());
    }

    #[test]
    fn test_same_snapshot_appends_once() {
        let mut path = FlightPath::default();
        let s = snapshot(7, Some(47.0), Some(8.0));

        assert_eq!(path.record(&s), PathUpdate::Appended);
        assert_eq!(path.record(&s), PathUpdate::Duplicate);
        assert_eq!(
            path.record(&snapshot(6, Some(1.0), Some(1.0))),
            PathUpdate::Duplicate
        );
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_line_string_is_lon_lat() {
        let mut path = FlightPath::new(4);
        path.append(GeoPosition::new(47.0, 8.0));
        path.append(GeoPosition::new(47.1, 8.1));

        assert_eq!(
            path.to_line_string().coordinates,
            vec![[8.0, 47.0], [8.1, 47.1]]
        );
    }

    #[test]
    fn test_append_rejects_non_finite() {
        let mut path = FlightPath::default();
        assert!(!path.append(GeoPosition::new(f64::INFINITY, 8.0)));
        assert!(path.is_empty());
    }
}
