//! Camera follow controller.
//!
//! Two modes:
//!
//! ```text
//!   Following ──(any gesture)──► Manual
//!       ▲                          │
//!       └──────(recenter)──────────┘
//! ```
//!
//! While following, every snapshot with a position eases the camera onto the
//! vehicle. Recenter always returns to following and issues one fly-to at a
//! closer zoom.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::telemetry::GeoPosition;

use super::engine::{CameraTarget, Easing, MapEngine, MapEvent};

/// Camera behaviour mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowMode {
    #[default]
    Following,
    Manual,
}

impl fmt::Display for FollowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowMode::Following => write!(f, "Following"),
            FollowMode::Manual => write!(f, "Manual"),
        }
    }
}

/// User-initiated map interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Pan,
    Rotate,
    Tilt,
    Zoom,
}

impl Gesture {
    /// Gesture started by a renderer event.
    pub fn from_event(event: MapEvent) -> Option<Self> {
        match event {
            MapEvent::DragStart => Some(Gesture::Pan),
            MapEvent::RotateStart => Some(Gesture::Rotate),
            MapEvent::PitchStart => Some(Gesture::Tilt),
            MapEvent::ZoomStart => Some(Gesture::Zoom),
            MapEvent::Load | MapEvent::StyleLoad => None,
        }
    }
}

/// Camera timing and zoom settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Duration of the per-snapshot follow animation.
    pub follow_duration: Duration,
    /// Duration of the recenter fly-to.
    pub recenter_duration: Duration,
    /// Zoom level the recenter fly-to ends at.
    pub recenter_zoom: f64,
    /// Rotate the map to the vehicle heading while following.
    pub rotate_with_heading: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            follow_duration: Duration::from_millis(700),
            recenter_duration: Duration::from_millis(900),
            recenter_zoom: 16.0,
            rotate_with_heading: true,
        }
    }
}

/// Camera action to issue on the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMove {
    /// Continuous follow: ease onto the vehicle, optionally matching heading.
    Follow {
        center: GeoPosition,
        bearing: Option<f64>,
        duration: Duration,
        easing: Easing,
    },
    /// Jump to vehicle.
    Recenter {
        center: GeoPosition,
        zoom: f64,
        duration: Duration,
    },
}

impl CameraMove {
    /// Issue the move on an engine.
    pub fn apply<E: MapEngine>(&self, engine: &mut E) {
        match *self {
            CameraMove::Follow {
                center,
                bearing,
                duration,
                easing,
            } => {
                engine.ease_to(CameraTarget::center(center), duration, easing);
                if let Some(bearing) = bearing {
                    engine.rotate_to(bearing, duration);
                }
            }
            CameraMove::Recenter {
                center,
                zoom,
                duration,
            } => {
                engine.fly_to(CameraTarget::center(center).with_zoom(zoom), duration);
            }
        }
    }
}

/// Owns [`FollowMode`] and decides on camera moves.
#[derive(Debug, Clone)]
pub struct CameraFollowController {
    mode: FollowMode,
    config: CameraConfig,
}

impl CameraFollowController {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            mode: FollowMode::Following,
            config,
        }
    }

    pub fn mode(&self) -> FollowMode {
        self.mode
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// React to a user gesture. Returns true when the mode changed.
    pub fn on_gesture(&mut self, gesture: Gesture) -> bool {
        match self.mode {
            FollowMode::Following => {
                debug!(gesture = ?gesture, "Camera follow released by user gesture");
                self.mode = FollowMode::Manual;
                true
            }
            FollowMode::Manual => false,
        }
    }

    /// Camera move for a new snapshot, if any.
    pub fn on_snapshot(
        &self,
        position: Option<GeoPosition>,
        heading: Option<f64>,
    ) -> Option<CameraMove> {
        if self.mode != FollowMode::Following {
            return None;
        }
        let center = position?;
        let bearing = self
            .config
            .rotate_with_heading
            .then(|| heading.unwrap_or(0.0));

        Some(CameraMove::Follow {
            center,
            bearing,
            duration: self.config.follow_duration,
            easing: Easing::EaseOutQuad,
        })
    }

    /// Return to following and center on `position` when known.
    pub fn recenter(&mut self, position: Option<GeoPosition>) -> Option<CameraMove> {
        if self.mode != FollowMode::Following {
            debug!("Camera follow resumed");
        }
        self.mode = FollowMode::Following;

        position.map(|center| CameraMove::Recenter {
            center,
            zoom: self.config.recenter_zoom,
            duration: self.config.recenter_duration,
        })
    }

    /// Label of the recenter/follow control.
    pub fn button_label(&self) -> &'static str {
        match self.mode {
            FollowMode::Following => "Center Drone",
            FollowMode::Manual => "Resume Follow",
        }
    }
}

impl Default for CameraFollowController {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}
