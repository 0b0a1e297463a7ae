//! Terminal UI for the ground station.
//!
//! Provides a real-time dashboard with the live map, telemetry readout,
//! trend charts and alerts.

pub mod dashboard;
pub mod widgets;

pub use dashboard::{Dashboard, DashboardConfig, DashboardEvent};
