//! Map synchronization engine.
//!
//! Keeps a map view consistent with the telemetry stream: one vehicle marker,
//! a bounded flight-path trail, camera follow, and a style whose custom layers
//! are re-created after every swap.
//!
//! # Architecture
//!
//! ```text
//!   TelemetrySnapshot ──► MapSync ──► FlightPath
//!                            │  ├───► MarkerPresenter ──┐
//!                            │  ├───► CameraFollowController ──┤
//!                            │  └───► StyleLayerManager ──┤
//!                            │                            ▼
//!                            └──── poll_event ◄──── MapEngine (SceneMap)
//! ```
//!
//! Renderer events (load, style load, gesture starts) are queued by the
//! engine and drained by [`MapSync::pump_events`].

pub mod camera;
pub mod engine;
pub mod layers;
pub mod marker;
pub mod path;
pub mod scene;
pub mod style;
pub mod sync;

pub use camera::{CameraConfig, CameraFollowController, CameraMove, FollowMode, Gesture};
pub use engine::{
    CameraTarget, Easing, LayerKind, LayerSpec, LineString, MapEngine, MapError, MapEvent,
    MapOptions, MarkerEffect, MarkerId, SourceSpec, TerrainSpec,
};
pub use marker::{EffectTimer, MarkerConfig, MarkerPresenter};
pub use path::{FlightPath, PathUpdate, FLIGHT_PATH_CAPACITY};
pub use scene::{AnimationKind, CameraAnimation, CameraState, SceneMap, SceneMarker};
pub use style::{MapStyle, StyleLayerManager, StylePhase};
pub use sync::{MapSync, MapSyncConfig, DEFAULT_CENTER};
