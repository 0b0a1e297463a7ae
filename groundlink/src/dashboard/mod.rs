//! Dashboard composition and the derived display panels.
//!
//! - [`composer`] - `GroundStation`, fans snapshots out to map and panels
//! - [`alerts`] - health alerts from the latest snapshot
//! - [`chart`] - rolling altitude/speed/battery series
//! - [`readout`] - formatted telemetry rows

pub mod alerts;
pub mod chart;
pub mod composer;
pub mod readout;

pub use alerts::{derive_alerts, worst_level, Alert, AlertLevel, LOW_BATTERY_PERCENT};
pub use chart::{ChartSample, ChartSeries, Metric, CHART_CAPACITY};
pub use composer::{DashboardCommand, DashboardView, GroundStation};
pub use readout::{telemetry_readout, ReadoutRow, PLACEHOLDER};
