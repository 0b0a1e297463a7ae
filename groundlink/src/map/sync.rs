//! Telemetry-to-map synchronization.
//!
//! [`MapSync`] is the one owner of everything that must stay consistent with
//! the telemetry stream: the engine, the follow controller, the style manager,
//! the marker presenter and the flight path. All mutation goes through its
//! methods and they all run on the caller's thread, so there are no shared
//! handles and no locking.
//!
//! A snapshot is applied in this order:
//!
//! 1. offer it to the flight path (a snapshot already seen stops here)
//! 2. place and rotate the marker, then push the full trail to the path source
//! 3. feed the altitude to the takeoff detector
//! 4. move the camera when following

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::telemetry::{GeoPosition, TelemetrySnapshot};

use super::camera::{CameraConfig, CameraFollowController, FollowMode, Gesture};
use super::engine::{MapEngine, MapError, MapEvent, MapOptions};
use super::layers;
use super::marker::{MarkerConfig, MarkerPresenter};
use super::path::{FlightPath, PathUpdate, FLIGHT_PATH_CAPACITY};
use super::style::{MapStyle, StyleLayerManager, StylePhase};

/// PX4 SITL default home position.
pub const DEFAULT_CENTER: GeoPosition = GeoPosition {
    latitude: 47.397742,
    longitude: 8.545594,
};

/// Initial view and behaviour of a synchronized map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSyncConfig {
    pub center: GeoPosition,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    pub style: MapStyle,
    pub camera: CameraConfig,
    pub marker: MarkerConfig,
    pub path_capacity: usize,
}

impl Default for MapSyncConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: 12.0,
            pitch: 55.0,
            bearing: 0.0,
            style: MapStyle::Dark,
            camera: CameraConfig::default(),
            marker: MarkerConfig::default(),
            path_capacity: FLIGHT_PATH_CAPACITY,
        }
    }
}

impl MapSyncConfig {
    fn map_options(&self) -> MapOptions {
        MapOptions {
            style: self.style.style_id().to_string(),
            center: self.center,
            zoom: self.zoom,
            pitch: self.pitch,
            bearing: self.bearing,
        }
    }
}

/// Owned synchronization state for one mounted map.
#[derive(Debug)]
pub struct MapSync<E: MapEngine> {
    engine: E,
    camera: CameraFollowController,
    styles: StyleLayerManager,
    presenter: MarkerPresenter,
    path: FlightPath,
    last_position: Option<GeoPosition>,
    loaded: bool,
}

impl<E: MapEngine> MapSync<E> {
    /// Create the map and the state around it.
    pub fn mount(config: MapSyncConfig) -> Result<Self, MapError> {
        let engine = E::create(&config.map_options())?;
        info!(
            style = %config.style,
            lat = config.center.latitude,
            lon = config.center.longitude,
            zoom = config.zoom,
            "Map mounted"
        );
        Ok(Self {
            engine,
            camera: CameraFollowController::new(config.camera),
            styles: StyleLayerManager::new(config.style),
            presenter: MarkerPresenter::new(config.marker),
            path: FlightPath::new(config.path_capacity),
            last_position: None,
            loaded: false,
        })
    }

    /// Apply one snapshot. Returns false when it was already applied.
    pub fn apply_snapshot(&mut self, snapshot: &TelemetrySnapshot, now: Instant) -> bool {
        let update = self.path.record(snapshot);
        if update == PathUpdate::Duplicate {
            debug!(sequence = snapshot.sequence, "Snapshot already applied");
            return false;
        }

        let position = snapshot.position();
        if let Some(position) = position {
            let heading = snapshot.heading_or_default();
            if let Err(e) = self.presenter.place(&mut self.engine, position, heading) {
                warn!(error = %e, "Failed to update vehicle marker");
            }
            self.last_position = Some(position);

            // Altitude memory only follows snapshots that carry a fix
            if let Err(e) = self
                .presenter
                .observe_altitude(&mut self.engine, snapshot.altitude, now)
            {
                warn!(error = %e, "Failed to apply takeoff cue");
            }
        }

        if update == PathUpdate::Appended {
            if let Err(e) = layers::update_path(&mut self.engine, self.path.to_line_string()) {
                warn!(error = %e, "Failed to update flight path");
            }
        }

        if let Some(camera_move) = self.camera.on_snapshot(position, snapshot.heading) {
            camera_move.apply(&mut self.engine);
        }

        true
    }

    /// React to one renderer event.
    pub fn handle_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::Load => {
                self.loaded = true;
                self.install_layers();
            }
            MapEvent::StyleLoad => {
                let style = self.styles.on_style_loaded();
                debug!(style = %style, "Re-creating custom layers after style load");
                self.install_layers();
            }
            gesture_event => {
                if let Some(gesture) = Gesture::from_event(gesture_event) {
                    self.camera.on_gesture(gesture);
                }
            }
        }
    }

    /// Drain and handle every queued renderer event. Returns how many were
    /// handled.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.engine.poll_event() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Resume following and jump to the vehicle if its position is known.
    pub fn recenter(&mut self) {
        if let Some(camera_move) = self.camera.recenter(self.last_position) {
            camera_move.apply(&mut self.engine);
        }
    }

    /// Switch between dark and light styles.
    pub fn toggle_style(&mut self) -> MapStyle {
        let target = self.styles.toggle();
        self.engine.set_style(target.style_id());
        target
    }

    /// Advance timers.
    pub fn tick(&mut self, now: Instant) {
        if let Err(e) = self.presenter.tick(&mut self.engine, now) {
            warn!(error = %e, "Failed to clear marker effect");
        }
    }

    /// Tear down: remove the marker and destroy the map.
    pub fn unmount(mut self) {
        if let Err(e) = self.presenter.teardown(&mut self.engine) {
            debug!(error = %e, "Marker already gone at unmount");
        }
        info!(trail_points = self.path.len(), "Map unmounted");
        self.engine.remove();
    }

    fn install_layers(&mut self) {
        if let Err(e) = layers::install_all(&mut self.engine, self.path.to_line_string()) {
            warn!(error = %e, "Failed to install map layers");
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable engine access for user interaction. Gestures queue events that
    /// take effect on the next [`pump_events`](Self::pump_events).
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn follow_mode(&self) -> FollowMode {
        self.camera.mode()
    }

    pub fn style(&self) -> MapStyle {
        self.styles.target()
    }

    pub fn style_phase(&self) -> StylePhase {
        self.styles.phase()
    }

    pub fn path(&self) -> &FlightPath {
        &self.path
    }

    pub fn presenter(&self) -> &MarkerPresenter {
        &self.presenter
    }

    pub fn last_position(&self) -> Option<GeoPosition> {
        self.last_position
    }

    /// Whether the initial map load has completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn follow_button_label(&self) -> &'static str {
        self.camera.button_label()
    }

    pub fn style_button_label(&self) -> &'static str {
        self.styles.button_label()
    }
}
