//! Health alerts derived from the latest snapshot.

use std::fmt;

use crate::telemetry::TelemetrySnapshot;

/// Battery percentage below which a warning is raised.
pub const LOW_BATTERY_PERCENT: f64 = 30.0;

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AlertLevel {
    Ok,
    Warn,
    Error,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertLevel::Ok => write!(f, "ok"),
            AlertLevel::Warn => write!(f, "warn"),
            AlertLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub text: &'static str,
}

impl Alert {
    const fn new(level: AlertLevel, text: &'static str) -> Self {
        Self { level, text }
    }
}

pub const NO_TELEMETRY: Alert = Alert::new(AlertLevel::Error, "No telemetry");
pub const DISARMED: Alert = Alert::new(AlertLevel::Warn, "Drone disarmed");
pub const LOW_BATTERY: Alert = Alert::new(AlertLevel::Warn, "Low battery");
pub const GPS_LOST: Alert = Alert::new(AlertLevel::Error, "GPS lost");
pub const ALL_NORMAL: Alert = Alert::new(AlertLevel::Ok, "All systems normal");

/// Alerts for the latest snapshot, in display order.
///
/// "All systems normal" appears only when nothing else fired. Missing fields
/// never raise on their own except the fix: a battery that is not reported is
/// not low. The fix is judged by the latitude alone, so a snapshot without a
/// longitude still counts as having GPS.
pub fn derive_alerts(snapshot: Option<&TelemetrySnapshot>) -> Vec<Alert> {
    let Some(snapshot) = snapshot else {
        return vec![NO_TELEMETRY];
    };

    let mut alerts = Vec::new();
    if !snapshot.armed {
        alerts.push(DISARMED);
    }
    if snapshot
        .battery
        .is_some_and(|battery| battery < LOW_BATTERY_PERCENT)
    {
        alerts.push(LOW_BATTERY);
    }
    if !snapshot.latitude.is_some_and(f64::is_finite) {
        alerts.push(GPS_LOST);
    }
    if alerts.is_empty() {
        alerts.push(ALL_NORMAL);
    }
    alerts
}

/// Highest severity in a set of alerts.
pub fn worst_level(alerts: &[Alert]) -> AlertLevel {
    alerts
        .iter()
        .map(|alert| alert.level)
        .max()
        .unwrap_or(AlertLevel::Ok)
}
