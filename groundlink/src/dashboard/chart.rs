//! Rolling chart series for altitude, speed and battery.

use chrono::{DateTime, Local, Utc};

use crate::history::BoundedHistory;
use crate::telemetry::TelemetrySnapshot;

/// Number of samples kept per chart.
pub const CHART_CAPACITY: usize = 80;

/// Charted quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Altitude,
    Speed,
    Battery,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Altitude, Metric::Speed, Metric::Battery];

    pub fn title(&self) -> &'static str {
        match self {
            Metric::Altitude => "Altitude (m)",
            Metric::Speed => "Speed (m/s)",
            Metric::Battery => "Battery (%)",
        }
    }
}

/// One chart point. Absent readings are charted as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSample {
    pub sequence: u64,
    pub time: DateTime<Utc>,
    pub altitude: f64,
    pub speed: f64,
    pub battery: f64,
}

impl ChartSample {
    pub fn from_snapshot(snapshot: &TelemetrySnapshot) -> Self {
        Self {
            sequence: snapshot.sequence,
            time: snapshot.received_at,
            altitude: snapshot.altitude.unwrap_or(0.0),
            speed: snapshot.speed.unwrap_or(0.0),
            battery: snapshot.battery.unwrap_or(0.0),
        }
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Altitude => self.altitude,
            Metric::Speed => self.speed,
            Metric::Battery => self.battery,
        }
    }

    /// Local wall-clock label, `HH:MM:SS`.
    pub fn label(&self) -> String {
        self.time.with_timezone(&Local).format("%H:%M:%S").to_string()
    }
}

/// Bounded FIFO of chart samples, one per snapshot.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    samples: BoundedHistory<ChartSample>,
    last_sequence: Option<u64>,
}

impl ChartSeries {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: BoundedHistory::new(capacity),
            last_sequence: None,
        }
    }

    /// Add a sample for `snapshot`. A snapshot already charted is ignored.
    pub fn push(&mut self, snapshot: &TelemetrySnapshot) -> bool {
        if self
            .last_sequence
            .is_some_and(|last| snapshot.sequence <= last)
        {
            return false;
        }
        self.last_sequence = Some(snapshot.sequence);
        self.samples.push(ChartSample::from_snapshot(snapshot));
        true
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.samples.capacity()
    }

    pub fn samples(&self) -> impl Iterator<Item = &ChartSample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&ChartSample> {
        self.samples.latest()
    }

    /// Values of one metric, oldest first.
    pub fn values(&self, metric: Metric) -> Vec<f64> {
        self.samples.iter().map(|s| s.value(metric)).collect()
    }

    /// Largest value of one metric, 0 when empty.
    pub fn max(&self, metric: Metric) -> f64 {
        self.samples
            .iter()
            .map(|s| s.value(metric))
            .fold(0.0, f64::max)
    }
}

impl Default for ChartSeries {
    fn default() -> Self {
        Self::new(CHART_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(sequence: u64, altitude: Option<f64>) -> TelemetrySnapshot {
        TelemetrySnapshot {
            sequence,
            altitude,
            speed: Some(2.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_bounded_at_80() {
        let mut chart = ChartSeries::default();
        for i in 1..=100u64 {
            let altitude = if i % 3 == 0 { None } else { Some(i as f64) };
            assert!(chart.push(&snapshot(i, altitude)));
        }

        assert_eq!(chart.len(), 80);
        let sequences: Vec<u64> = chart.samples().map(|s| s.sequence).collect();
        assert_eq!(sequences, (21..=100).collect::<Vec<_>>());
    }

    #[test]
    fn test_absent_fields_chart_as_zero() {
        let mut chart = ChartSeries::default();
        chart.push(&snapshot(1, None));

        let sample = chart.latest().unwrap();
        assert_eq!(sample.altitude, 0.0);
        assert_eq!(sample.speed, 2.0);
        assert_eq!(sample.battery, 0.0);
    }

    #[test]
    fn test_one_sample_per_snapshot() {
        let mut chart = ChartSeries::default();
        let s = snapshot(5, Some(1.0));
        assert!(chart.push(&s));
        assert!(!chart.push(&s));
        assert_eq!(chart.len(), 1);
    }

    #[test]
    fn test_values_and_max() {
        let mut chart = ChartSeries::default();
        chart.push(&snapshot(1, Some(4.0)));
        chart.push(&snapshot(2, Some(9.0)));
        chart.push(&snapshot(3, Some(6.0)));

        assert_eq!(chart.values(Metric::Altitude), vec![4.0, 9.0, 6.0]);
        assert_eq!(chart.max(Metric::Altitude), 9.0);
        assert_eq!(ChartSeries::default().max(Metric::Speed), 0.0);
    }

    #[test]
    fn test_label_format() {
        let sample = ChartSample::from_snapshot(&snapshot(1, None));
        let label = sample.label();
        assert_eq!(label.len(), 8);
        assert_eq!(label.matches(':').count(), 2);
    }
}
