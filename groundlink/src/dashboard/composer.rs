//! Ground station composition.
//!
//! [`GroundStation`] feeds every snapshot, in arrival order, to the map
//! synchronization engine and the chart series, keeps the latest snapshot
//! for the readout and alert panels, and turns the two user controls into
//! calls on the map.

use std::time::Instant;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

use crate::map::{FollowMode, MapEngine, MapError, MapEvent, MapStyle, MapSync, MapSyncConfig};
use crate::telemetry::{ConnectionStatus, TelemetrySnapshot};

use super::alerts::{derive_alerts, Alert};
use super::chart::ChartSeries;
use super::readout::{telemetry_readout, ReadoutRow};

/// User controls on the map panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardCommand {
    /// "Center Drone" / "Resume Follow".
    Recenter,
    /// Day/night style switch.
    ToggleStyle,
}

/// Everything the panels display for one frame.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    /// True once any telemetry has been received.
    pub online: bool,
    pub status: ConnectionStatus,
    pub readout: Option<Vec<ReadoutRow>>,
    pub alerts: Vec<Alert>,
    pub chart: &'a ChartSeries,
    pub follow_mode: FollowMode,
    pub follow_label: &'static str,
    pub style: MapStyle,
    pub style_label: &'static str,
    pub trail_points: usize,
}

/// One mounted dashboard for a single vehicle.
#[derive(Debug)]
pub struct GroundStation<E: MapEngine> {
    map: MapSync<E>,
    chart: ChartSeries,
    latest: Option<TelemetrySnapshot>,
    status: ConnectionStatus,
}

impl<E: MapEngine> GroundStation<E> {
    /// Mount the map and empty panels.
    pub fn mount(config: MapSyncConfig) -> Result<Self, MapError> {
        Ok(Self {
            map: MapSync::mount(config)?,
            chart: ChartSeries::default(),
            latest: None,
            status: ConnectionStatus::Disconnected,
        })
    }

    /// Run one snapshot through every panel.
    pub fn on_snapshot(&mut self, snapshot: TelemetrySnapshot, now: Instant) {
        if !self.map.apply_snapshot(&snapshot, now) {
            return;
        }
        self.chart.push(&snapshot);
        self.latest = Some(snapshot);
    }

    /// Apply everything waiting on a feed subscription, oldest first.
    ///
    /// Returns the number of snapshots applied. A lagging receiver skips the
    /// overwritten snapshots; that is logged and the rest still apply in
    /// order.
    pub fn drain(
        &mut self,
        updates: &mut broadcast::Receiver<TelemetrySnapshot>,
        now: Instant,
    ) -> usize {
        let mut applied = 0;
        loop {
            match updates.try_recv() {
                Ok(snapshot) => {
                    self.on_snapshot(snapshot, now);
                    applied += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Dashboard fell behind the telemetry stream");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        applied
    }

    pub fn set_status(&mut self, status: ConnectionStatus) {
        self.status = status;
    }

    /// React to renderer events queued since the last call.
    pub fn pump_map_events(&mut self) -> usize {
        self.map.pump_events()
    }

    pub fn on_map_event(&mut self, event: MapEvent) {
        self.map.handle_event(event);
    }

    pub fn command(&mut self, command: DashboardCommand) {
        debug!(command = ?command, "Dashboard command");
        match command {
            DashboardCommand::Recenter => self.map.recenter(),
            DashboardCommand::ToggleStyle => {
                self.map.toggle_style();
            }
        }
    }

    /// Advance timers.
    pub fn tick(&mut self, now: Instant) {
        self.map.tick(now);
    }

    pub fn latest(&self) -> Option<&TelemetrySnapshot> {
        self.latest.as_ref()
    }

    pub fn map(&self) -> &MapSync<E> {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut MapSync<E> {
        &mut self.map
    }

    pub fn chart(&self) -> &ChartSeries {
        &self.chart
    }

    pub fn view(&self) -> DashboardView<'_> {
        let latest = self.latest.as_ref();
        DashboardView {
            online: latest.is_some(),
            status: self.status,
            readout: telemetry_readout(latest),
            alerts: derive_alerts(latest),
            chart: &self.chart,
            follow_mode: self.map.follow_mode(),
            follow_label: self.map.follow_button_label(),
            style: self.map.style(),
            style_label: self.map.style_button_label(),
            trail_points: self.map.path().len(),
        }
    }

    /// Tear down the map. Nothing can be applied afterwards.
    pub fn unmount(self) {
        self.map.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::alerts::{ALL_NORMAL, NO_TELEMETRY};
    use crate::map::SceneMap;
    use crate::telemetry::TelemetryFeed;

    fn station() -> GroundStation<SceneMap> {
        let mut station = GroundStation::<SceneMap>::mount(MapSyncConfig::default()).unwrap();
        station.pump_map_events();
        station
    }

    fn healthy(sequence: u64) -> TelemetrySnapshot {
        TelemetrySnapshot {
            sequence,
            latitude: Some(47.0),
            longitude: Some(8.0 + sequence as f64 * 1e-4),
            altitude: Some(10.0),
            battery: Some(90.0),
            armed: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_offline_before_telemetry() {
        let station = station();
        let view = station.view();

        assert!(!view.online);
        assert_eq!(view.readout, None);
        assert_eq!(view.alerts, vec![NO_TELEMETRY]);
        assert!(view.chart.is_empty());
        assert_eq!(view.follow_label, "Center Drone");
        assert_eq!(view.style_label, "Light");
    }

    #[test]
    fn test_snapshot_reaches_every_panel() {
        let mut station = station();
        station.on_snapshot(healthy(1), Instant::now());

        let view = station.view();
        assert!(view.online);
        assert!(view.readout.is_some());
        assert_eq!(view.alerts, vec![ALL_NORMAL]);
        assert_eq!(view.chart.len(), 1);
        assert_eq!(view.trail_points, 1);
    }

    #[test]
    fn test_duplicate_snapshot_charted_once() {
        let mut station = station();
        station.on_snapshot(healthy(1), Instant::now());
        station.on_snapshot(healthy(1), Instant::now());

        assert_eq!(station.chart().len(), 1);
        assert_eq!(station.map().path().len(), 1);
    }

    #[test]
    fn test_commands() {
        let mut station = station();
        station.on_snapshot(healthy(1), Instant::now());

        station.map_mut().engine_mut().rotate_by(15.0);
        station.pump_map_events();
        assert_eq!(station.view().follow_label, "Resume Follow");

        station.command(DashboardCommand::Recenter);
        assert_eq!(station.view().follow_mode, FollowMode::Following);

        station.command(DashboardCommand::ToggleStyle);
        station.pump_map_events();
        assert_eq!(station.view().style, MapStyle::Light);
        assert_eq!(station.view().style_label, "Dark");
    }

    #[test]
    fn test_drain_applies_in_order() {
        let feed = TelemetryFeed::default();
        let mut updates = feed.subscribe();
        let mut station = station();

        for lon in [8.0, 8.1, 8.2] {
            feed.ingest_text(&format!(r#"{{"lat": 47.0, "lon": {}, "armed": true}}"#, lon));
        }

        assert_eq!(station.drain(&mut updates, Instant::now()), 3);
        let lons: Vec<f64> = station
            .map()
            .path()
            .points()
            .map(|p| p.longitude)
            .collect();
        assert_eq!(lons, vec![8.0, 8.1, 8.2]);
        assert_eq!(station.latest().unwrap().sequence, 3);
    }

    #[test]
    fn test_drain_survives_lag() {
        let feed = TelemetryFeed::new(2);
        let mut updates = feed.subscribe();
        let mut station = station();

        for _ in 0..5 {
            feed.ingest_text(r#"{"lat": 47.0, "lon": 8.0}"#);
        }

        assert_eq!(station.drain(&mut updates, Instant::now()), 2);
        assert_eq!(station.latest().unwrap().sequence, 5);
    }

    #[test]
    fn test_status_shown() {
        let mut station = station();
        station.set_status(ConnectionStatus::Connected);
        assert_eq!(station.view().status, ConnectionStatus::Connected);
    }
}
