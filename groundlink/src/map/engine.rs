//! Map rendering engine interface.
//!
//! [`MapEngine`] is the capability set the synchronization engine needs from
//! a map renderer: style loading, source/layer management, terrain, camera
//! animation and markers. Renderer events are queued by the engine and drained
//! in order through [`MapEngine::poll_event`] instead of registered callbacks,
//! so every reaction runs on the owner's thread with `&mut` access.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::telemetry::GeoPosition;

/// Errors reported by a map engine for precondition violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error("source '{0}' already exists")]
    DuplicateSource(String),

    #[error("layer '{0}' already exists")]
    DuplicateLayer(String),

    #[error("source '{0}' does not exist")]
    UnknownSource(String),

    #[error("source '{0}' does not accept GeoJSON data")]
    NotGeoJson(String),

    #[error("{0} does not exist")]
    UnknownMarker(MarkerId),

    #[error("unknown map event '{0}'")]
    UnknownEvent(String),
}

/// Events emitted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEvent {
    /// The map finished its initial load.
    Load,
    /// A style finished loading after `set_style`.
    StyleLoad,
    /// User started panning.
    DragStart,
    /// User started rotating.
    RotateStart,
    /// User started tilting.
    PitchStart,
    /// User started zooming.
    ZoomStart,
}

impl MapEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            MapEvent::Load => "load",
            MapEvent::StyleLoad => "style.load",
            MapEvent::DragStart => "dragstart",
            MapEvent::RotateStart => "rotatestart",
            MapEvent::PitchStart => "pitchstart",
            MapEvent::ZoomStart => "zoomstart",
        }
    }

    /// Whether the event starts a user gesture.
    pub fn is_gesture(&self) -> bool {
        matches!(
            self,
            MapEvent::DragStart | MapEvent::RotateStart | MapEvent::PitchStart | MapEvent::ZoomStart
        )
    }
}

impl fmt::Display for MapEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MapEvent {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "load" => Ok(MapEvent::Load),
            "style.load" => Ok(MapEvent::StyleLoad),
            "dragstart" => Ok(MapEvent::DragStart),
            "rotatestart" => Ok(MapEvent::RotateStart),
            "pitchstart" => Ok(MapEvent::PitchStart),
            "zoomstart" => Ok(MapEvent::ZoomStart),
            other => Err(MapError::UnknownEvent(other.to_string())),
        }
    }
}

/// GeoJSON `LineString` geometry, coordinates as `[lon, lat]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineString {
    pub coordinates: Vec<[f64; 2]>,
}

impl LineString {
    pub fn new(coordinates: Vec<[f64; 2]>) -> Self {
        Self { coordinates }
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// Data source definition.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSpec {
    /// Elevation tiles used for 3D terrain.
    RasterDem {
        url: String,
        tile_size: u32,
        max_zoom: u8,
    },
    /// Inline GeoJSON feature.
    GeoJson { data: LineString },
}

/// Render layer definition.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: String,
    pub kind: LayerKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    /// Atmospheric sky rendered above the terrain.
    Sky {
        atmosphere_color: String,
        sun: [f64; 2],
        sun_intensity: f64,
    },
    /// Line drawn from a GeoJSON source.
    Line {
        source: String,
        color: String,
        width: f64,
    },
}

impl LayerSpec {
    /// Source the layer draws from, if any.
    pub fn source(&self) -> Option<&str> {
        match &self.kind {
            LayerKind::Sky { .. } => None,
            LayerKind::Line { source, .. } => Some(source),
        }
    }
}

/// 3D terrain configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainSpec {
    pub source: String,
    pub exaggeration: f64,
}

/// Camera animation target. `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraTarget {
    pub center: Option<GeoPosition>,
    pub zoom: Option<f64>,
    pub bearing: Option<f64>,
    pub pitch: Option<f64>,
}

impl CameraTarget {
    /// Target that only moves the center.
    pub fn center(position: GeoPosition) -> Self {
        Self {
            center: Some(position),
            ..Default::default()
        }
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }
}

/// Animation timing curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    /// Quadratic ease-out, `f(t) = t * (2 - t)`.
    EaseOutQuad,
}

impl Easing {
    /// Progress at normalized time `t` (clamped to [0, 1]).
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutQuad => t * (2.0 - t),
        }
    }
}

/// Handle to a marker placed on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker #{}", self.0)
    }
}

/// Transient visual state applied to a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerEffect {
    /// Climb cue shown while the vehicle gains altitude quickly.
    Takeoff,
}

/// Initial view of a new map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub style: String,
    pub center: GeoPosition,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

/// Capability set of a map renderer.
///
/// Operations that would violate a renderer precondition (adding a source
/// twice, addressing a missing marker) return [`MapError`]; callers are
/// expected to guard with the `has_*` queries instead of relying on errors.
pub trait MapEngine: Sized {
    /// Create a map with the given initial view. The engine queues
    /// [`MapEvent::Load`] once it is ready.
    fn create(options: &MapOptions) -> Result<Self, MapError>;

    /// Switch style. Discards custom sources, layers and terrain, then queues
    /// [`MapEvent::StyleLoad`].
    fn set_style(&mut self, style: &str);

    /// Currently requested style.
    fn style(&self) -> &str;

    fn has_source(&self, id: &str) -> bool;
    fn add_source(&mut self, id: &str, spec: SourceSpec) -> Result<(), MapError>;

    /// Replace the data of a GeoJSON source.
    fn set_source_data(&mut self, id: &str, data: LineString) -> Result<(), MapError>;

    fn has_layer(&self, id: &str) -> bool;
    fn add_layer(&mut self, spec: LayerSpec) -> Result<(), MapError>;

    fn set_terrain(&mut self, spec: TerrainSpec) -> Result<(), MapError>;

    fn ease_to(&mut self, target: CameraTarget, duration: Duration, easing: Easing);
    fn fly_to(&mut self, target: CameraTarget, duration: Duration);
    fn rotate_to(&mut self, bearing: f64, duration: Duration);

    fn add_marker(&mut self, position: GeoPosition) -> MarkerId;
    fn move_marker(&mut self, id: MarkerId, position: GeoPosition) -> Result<(), MapError>;
    /// Visual rotation of the marker in degrees clockwise from north.
    fn rotate_marker(&mut self, id: MarkerId, degrees: f64) -> Result<(), MapError>;
    fn set_marker_effect(
        &mut self,
        id: MarkerId,
        effect: Option<MarkerEffect>,
    ) -> Result<(), MapError>;
    fn remove_marker(&mut self, id: MarkerId) -> Result<(), MapError>;

    /// Next queued renderer event, oldest first.
    fn poll_event(&mut self) -> Option<MapEvent>;

    /// Destroy the map and release its resources.
    fn remove(self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_out_quad() {
        let easing = Easing::EaseOutQuad;
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(0.5), 0.75);
        assert_eq!(easing.apply(1.0), 1.0);
        assert_eq!(easing.apply(2.0), 1.0);
    }

    #[test]
    fn test_event_names_round_trip() {
        for event in [
            MapEvent::Load,
            MapEvent::StyleLoad,
            MapEvent::DragStart,
            MapEvent::RotateStart,
            MapEvent::PitchStart,
            MapEvent::ZoomStart,
        ] {
            assert_eq!(event.name().parse::<MapEvent>(), Ok(event));
        }
        assert!("click".parse::<MapEvent>().is_err());
    }

    #[test]
    fn test_gesture_events() {
        assert!(MapEvent::DragStart.is_gesture());
        assert!(MapEvent::ZoomStart.is_gesture());
        assert!(!MapEvent::Load.is_gesture());
        assert!(!MapEvent::StyleLoad.is_gesture());
    }
}
