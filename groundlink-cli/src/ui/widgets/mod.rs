//! Dashboard widgets for the TUI.
//!
//! This module contains:
//! - **Primitives**: Reusable low-level UI components (sparklines, formatters)
//! - **Panel Widgets**: Higher-level widgets that compose primitives
//!
//! - `MapViewWidget` - braille map of the engine state (trail, marker)
//! - `TelemetryWidget` - formatted readout rows
//! - `ChartsWidget` - altitude, speed and battery sparklines
//! - `AlertsWidget` - health alerts colored by level

mod alerts;
mod charts;
pub mod map_view;
pub mod primitives;
mod telemetry;

pub use alerts::AlertsWidget;
pub use charts::ChartsWidget;
pub use map_view::MapViewWidget;
pub use telemetry::TelemetryWidget;
