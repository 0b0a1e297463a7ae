//! Reusable UI primitive components.
//!
//! This module contains low-level visual components that can be composed
//! into higher-level widgets.
//!
//! ## Components
//!
//! - **Sparkline**: Compact time-series chart using Unicode blocks
//! - **Format**: Compact formatting for positions, angles and durations

mod format;
mod sparkline;

pub use format::{format_degrees, format_duration_compact, format_position, format_value};
pub use sparkline::{render_sparkline_fixed_width, SparklineScale};
