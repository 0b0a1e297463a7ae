//! State types for the dashboard.
//!
//! This module contains the event and key-mapping types used by the
//! dashboard. They are independent of rendering and can be tested in
//! isolation.

use std::time::Duration;

use crossterm::event::KeyCode;
use groundlink::dashboard::DashboardCommand;
use groundlink::map::SceneMap;

use crate::ui::widgets::map_view::degrees_per_view;

/// Timeout for quit confirmation (auto-cancels after this duration).
pub const QUIT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(5);

/// Fraction of the visible map width moved per arrow key press.
const PAN_STEP: f64 = 0.1;

/// Zoom levels per `+`/`-` press.
const ZOOM_STEP: f64 = 0.5;

/// Degrees per `[`/`]` press.
const ROTATE_STEP: f64 = 15.0;

/// Events that can occur in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DashboardEvent {
    /// User requested quit (Ctrl+C or confirmed 'q').
    Quit,
    /// One of the map panel buttons.
    Command(DashboardCommand),
    /// Direct manipulation of the map view.
    Map(MapInteraction),
}

/// A user gesture on the map panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapInteraction {
    /// Pan by a fraction of the visible span (x east, y north).
    Pan { x: f64, y: f64 },
    Zoom(f64),
    Rotate(f64),
}

impl MapInteraction {
    /// Perform the gesture on the in-memory map.
    ///
    /// The map queues the matching gesture event, which drops the camera out
    /// of follow mode once events are pumped.
    pub fn apply(self, scene: &mut SceneMap) {
        match self {
            MapInteraction::Pan { x, y } => {
                let span = degrees_per_view(scene.camera().zoom);
                scene.pan(x * span, y * span);
            }
            MapInteraction::Zoom(delta) => scene.zoom_by(delta),
            MapInteraction::Rotate(degrees) => scene.rotate_by(degrees),
        }
    }
}

/// Map a key press outside quit confirmation to a dashboard event.
///
/// Quit keys are handled by the caller because they need confirmation.
pub fn key_event(code: KeyCode) -> Option<DashboardEvent> {
    let event = match code {
        KeyCode::Char('f') | KeyCode::Char('F') => {
            DashboardEvent::Command(DashboardCommand::Recenter)
        }
        KeyCode::Char('s') | KeyCode::Char('S') => {
            DashboardEvent::Command(DashboardCommand::ToggleStyle)
        }
        KeyCode::Left => DashboardEvent::Map(MapInteraction::Pan {
            x: -PAN_STEP,
            y: 0.0,
        }),
        KeyCode::Right => DashboardEvent::Map(MapInteraction::Pan {
            x: PAN_STEP,
            y: 0.0,
        }),
        KeyCode::Up => DashboardEvent::Map(MapInteraction::Pan {
            x: 0.0,
            y: PAN_STEP,
        }),
        KeyCode::Down => DashboardEvent::Map(MapInteraction::Pan {
            x: 0.0,
            y: -PAN_STEP,
        }),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            DashboardEvent::Map(MapInteraction::Zoom(ZOOM_STEP))
        }
        KeyCode::Char('-') => DashboardEvent::Map(MapInteraction::Zoom(-ZOOM_STEP)),
        KeyCode::Char('[') => DashboardEvent::Map(MapInteraction::Rotate(-ROTATE_STEP)),
        KeyCode::Char(']') => DashboardEvent::Map(MapInteraction::Rotate(ROTATE_STEP)),
        _ => return None,
    };
    Some(event)
}

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Telemetry endpoint shown in the header.
    pub telemetry_url: String,
}
