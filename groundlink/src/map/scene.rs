//! In-memory map engine.
//!
//! `SceneMap` keeps the same state a tiled renderer would (style, sources,
//! layers, terrain, camera, markers) without drawing anything. The terminal
//! dashboard renders from it directly and tests inspect it.
//!
//! Renderer behaviour that the synchronization engine depends on is kept:
//!
//! - `create` queues `load`
//! - `set_style` drops every custom source, layer and the terrain, then
//!   queues `style.load`
//! - the interaction helpers queue the matching gesture-start event
//! - adding an existing source or layer is an error

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use tracing::{debug, trace};

use crate::history::BoundedHistory;
use crate::telemetry::GeoPosition;

use super::engine::{
    CameraTarget, Easing, LayerSpec, LineString, MapEngine, MapError, MapEvent,
    MapOptions, MarkerEffect, MarkerId, SourceSpec, TerrainSpec,
};

/// Number of operations and animations kept for inspection.
const RECORD_CAPACITY: usize = 256;

const MIN_ZOOM: f64 = 0.0;
const MAX_ZOOM: f64 = 22.0;
const MAX_PITCH: f64 = 85.0;

/// Current camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub center: GeoPosition,
    pub zoom: f64,
    pub pitch: f64,
    /// Degrees clockwise from north, in [0, 360).
    pub bearing: f64,
}

impl CameraState {
    fn apply(&mut self, target: &CameraTarget) {
        if let Some(center) = target.center {
            self.center = center;
        }
        if let Some(zoom) = target.zoom {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
        if let Some(bearing) = target.bearing {
            self.bearing = bearing.rem_euclid(360.0);
        }
        if let Some(pitch) = target.pitch {
            self.pitch = pitch.clamp(0.0, MAX_PITCH);
        }
    }
}

/// Kind of camera animation requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Ease,
    Fly,
    Rotate,
}

/// A camera animation as it was requested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraAnimation {
    pub kind: AnimationKind,
    pub target: CameraTarget,
    pub duration: Duration,
    pub easing: Easing,
}

/// Marker as placed on the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneMarker {
    pub position: GeoPosition,
    pub rotation: f64,
    pub effect: Option<MarkerEffect>,
}

/// In-memory [`MapEngine`].
#[derive(Debug)]
pub struct SceneMap {
    style: String,
    camera: CameraState,
    sources: Vec<(String, SourceSpec)>,
    layers: Vec<LayerSpec>,
    terrain: Option<TerrainSpec>,
    markers: BTreeMap<MarkerId, SceneMarker>,
    next_marker: u64,
    events: VecDeque<MapEvent>,
    operations: BoundedHistory<String>,
    animations: BoundedHistory<CameraAnimation>,
    style_changes: u64,
}

impl SceneMap {
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Custom source ids in creation order.
    pub fn source_ids(&self) -> Vec<&str> {
        self.sources.iter().map(|(id, _)| id.as_str()).collect()
    }

    /// Custom layer ids in creation order.
    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.id.as_str()).collect()
    }

    pub fn source(&self, id: &str) -> Option<&SourceSpec> {
        self.sources
            .iter()
            .find(|(source_id, _)| source_id == id)
            .map(|(_, spec)| spec)
    }

    /// Data of a GeoJSON source.
    pub fn source_data(&self, id: &str) -> Option<&LineString> {
        match self.source(id)? {
            SourceSpec::GeoJson { data } => Some(data),
            SourceSpec::RasterDem { .. } => None,
        }
    }

    pub fn layer(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn terrain(&self) -> Option<&TerrainSpec> {
        self.terrain.as_ref()
    }

    pub fn markers(&self) -> impl Iterator<Item = (&MarkerId, &SceneMarker)> {
        self.markers.iter()
    }

    pub fn marker(&self, id: MarkerId) -> Option<&SceneMarker> {
        self.markers.get(&id)
    }

    /// Source/layer/style operations, oldest first.
    pub fn operation_log(&self) -> Vec<&str> {
        self.operations.iter().map(String::as_str).collect()
    }

    /// Requested camera animations, oldest first.
    pub fn animations(&self) -> Vec<CameraAnimation> {
        self.animations.to_vec()
    }

    pub fn clear_animations(&mut self) {
        self.animations.clear();
    }

    /// Number of `set_style` calls since creation.
    pub fn style_changes(&self) -> u64 {
        self.style_changes
    }

    /// Number of queued events.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// User pans the map by a lon/lat offset in degrees.
    pub fn pan(&mut self, d_lon: f64, d_lat: f64) {
        self.events.push_back(MapEvent::DragStart);
        let center = self.camera.center;
        self.camera.center = GeoPosition::new(
            (center.latitude + d_lat).clamp(-85.0, 85.0),
            wrap_longitude(center.longitude + d_lon),
        );
    }

    /// User zooms in (positive) or out (negative).
    pub fn zoom_by(&mut self, delta: f64) {
        self.events.push_back(MapEvent::ZoomStart);
        self.camera.zoom = (self.camera.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// User rotates the map clockwise by `degrees`.
    pub fn rotate_by(&mut self, degrees: f64) {
        self.events.push_back(MapEvent::RotateStart);
        self.camera.bearing = (self.camera.bearing + degrees).rem_euclid(360.0);
    }

    /// User tilts the map.
    pub fn pitch_by(&mut self, degrees: f64) {
        self.events.push_back(MapEvent::PitchStart);
        self.camera.pitch = (self.camera.pitch + degrees).clamp(0.0, MAX_PITCH);
    }

    fn record(&mut self, operation: String) {
        trace!(operation = %operation, "Scene operation");
        self.operations.push(operation);
    }

    fn marker_mut(&mut self, id: MarkerId) -> Result<&mut SceneMarker, MapError> {
        self.markers.get_mut(&id).ok_or(MapError::UnknownMarker(id))
    }

    fn animate(
        &mut self,
        kind: AnimationKind,
        target: CameraTarget,
        duration: Duration,
        easing: Easing,
    ) {
        self.camera.apply(&target);
        self.animations.push(CameraAnimation {
            kind,
            target,
            duration,
            easing,
        });
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

impl MapEngine for SceneMap {
    fn create(options: &MapOptions) -> Result<Self, MapError> {
        let mut scene = Self {
            style: options.style.clone(),
            camera: CameraState {
                center: options.center,
                zoom: MIN_ZOOM,
                pitch: 0.0,
                bearing: 0.0,
            },
            sources: Vec::new(),
            layers: Vec::new(),
            terrain: None,
            markers: BTreeMap::new(),
            next_marker: 1,
            events: VecDeque::new(),
            operations: BoundedHistory::new(RECORD_CAPACITY),
            animations: BoundedHistory::new(RECORD_CAPACITY),
            style_changes: 0,
        };
        scene.camera.apply(&CameraTarget {
            center: Some(options.center),
            zoom: Some(options.zoom),
            bearing: Some(options.bearing),
            pitch: Some(options.pitch),
        });
        scene.events.push_back(MapEvent::Load);
        debug!(style = %options.style, zoom = options.zoom, "Scene map created");
        Ok(scene)
    }

    fn set_style(&mut self, style: &str) {
        self.style = style.to_string();
        self.sources.clear();
        self.layers.clear();
        self.terrain = None;
        self.style_changes += 1;
        self.record(format!("setStyle {}", style));
        self.events.push_back(MapEvent::StyleLoad);
    }

    fn style(&self) -> &str {
        &self.style
    }

    fn has_source(&self, id: &str) -> bool {
        self.source(id).is_some()
    }

    fn add_source(&mut self, id: &str, spec: SourceSpec) -> Result<(), MapError> {
        if self.has_source(id) {
            return Err(MapError::DuplicateSource(id.to_string()));
        }
        self.sources.push((id.to_string(), spec));
        self.record(format!("addSource {}", id));
        Ok(())
    }

    fn set_source_data(&mut self, id: &str, data: LineString) -> Result<(), MapError> {
        let spec = self
            .sources
            .iter_mut()
            .find(|(source_id, _)| source_id == id)
            .map(|(_, spec)| spec)
            .ok_or_else(|| MapError::UnknownSource(id.to_string()))?;
        match spec {
            SourceSpec::GeoJson { data: current } => {
                *current = data;
                Ok(())
            }
            SourceSpec::RasterDem { .. } => Err(MapError::NotGeoJson(id.to_string())),
        }
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layer(id).is_some()
    }

    fn add_layer(&mut self, spec: LayerSpec) -> Result<(), MapError> {
        if self.has_layer(&spec.id) {
            return Err(MapError::DuplicateLayer(spec.id));
        }
        if let Some(source) = spec.source() {
            if !self.has_source(source) {
                return Err(MapError::UnknownSource(source.to_string()));
            }
        }
        self.record(format!("addLayer {}", spec.id));
        self.layers.push(spec);
        Ok(())
    }

    fn set_terrain(&mut self, spec: TerrainSpec) -> Result<(), MapError> {
        if !self.has_source(&spec.source) {
            return Err(MapError::UnknownSource(spec.source));
        }
        self.record(format!("setTerrain {}", spec.source));
        self.terrain = Some(spec);
        Ok(())
    }

    fn ease_to(&mut self, target: CameraTarget, duration: Duration, easing: Easing) {
        self.animate(AnimationKind::Ease, target, duration, easing);
    }

    fn fly_to(&mut self, target: CameraTarget, duration: Duration) {
        self.animate(AnimationKind::Fly, target, duration, Easing::default());
    }

    fn rotate_to(&mut self, bearing: f64, duration: Duration) {
        let target = CameraTarget {
            bearing: Some(bearing),
            ..Default::default()
        };
        self.animate(AnimationKind::Rotate, target, duration, Easing::default());
    }

    fn add_marker(&mut self, position: GeoPosition) -> MarkerId {
        let id = MarkerId(self.next_marker);
        self.next_marker += 1;
        self.markers.insert(
            id,
            SceneMarker {
                position,
                rotation: 0.0,
                effect: None,
            },
        );
        debug!(marker = %id, "Marker added");
        id
    }

    fn move_marker(&mut self, id: MarkerId, position: GeoPosition) -> Result<(), MapError> {
        self.marker_mut(id)?.position = position;
        Ok(())
    }

    fn rotate_marker(&mut self, id: MarkerId, degrees: f64) -> Result<(), MapError> {
        self.marker_mut(id)?.rotation = degrees.rem_euclid(360.0);
        Ok(())
    }

    fn set_marker_effect(
        &mut self,
        id: MarkerId,
        effect: Option<MarkerEffect>,
    ) -> Result<(), MapError> {
        self.marker_mut(id)?.effect = effect;
        Ok(())
    }

    fn remove_marker(&mut self, id: MarkerId) -> Result<(), MapError> {
        self.markers
            .remove(&id)
            .map(|_| ())
            .ok_or(MapError::UnknownMarker(id))
    }

    fn poll_event(&mut self) -> Option<MapEvent> {
        self.events.pop_front()
    }

    fn remove(self) {
        debug!(
            markers = self.markers.len(),
            style_changes = self.style_changes,
            "Scene map removed"
        );
    }
}
