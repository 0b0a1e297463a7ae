//! Map style state machine.
//!
//! ```text
//!   Ready(Dark) ──toggle──► Reloading{Dark→Light} ──style.load──► Ready(Light)
//! ```
//!
//! A style swap discards every custom source and layer on the renderer, so
//! leaving `Reloading` is where the persistent layers get re-created (see
//! [`super::layers::install_all`]).

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

/// Visual theme of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapStyle {
    #[default]
    Dark,
    Light,
}

impl MapStyle {
    /// Renderer style identifier.
    pub fn style_id(&self) -> &'static str {
        match self {
            MapStyle::Dark => "mapbox://styles/mapbox/dark-v11",
            MapStyle::Light => "mapbox://styles/mapbox/light-v11",
        }
    }

    pub fn toggled(&self) -> MapStyle {
        match self {
            MapStyle::Dark => MapStyle::Light,
            MapStyle::Light => MapStyle::Dark,
        }
    }

    /// Style for a renderer identifier.
    pub fn from_style_id(id: &str) -> Option<MapStyle> {
        [MapStyle::Dark, MapStyle::Light]
            .into_iter()
            .find(|style| style.style_id() == id)
    }
}

impl fmt::Display for MapStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapStyle::Dark => write!(f, "dark"),
            MapStyle::Light => write!(f, "light"),
        }
    }
}

impl FromStr for MapStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" | "night" => Ok(MapStyle::Dark),
            "light" | "day" => Ok(MapStyle::Light),
            other => Err(format!("unknown map style '{}'", other)),
        }
    }
}

/// Style lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylePhase {
    /// Style loaded and custom layers installed.
    Ready(MapStyle),
    /// Style requested, waiting for the renderer to finish loading it.
    Reloading { from: MapStyle, to: MapStyle },
}

/// Owns the [`MapStyle`] state.
#[derive(Debug, Clone)]
pub struct StyleLayerManager {
    phase: StylePhase,
}

impl StyleLayerManager {
    pub fn new(initial: MapStyle) -> Self {
        Self {
            phase: StylePhase::Ready(initial),
        }
    }

    pub fn phase(&self) -> StylePhase {
        self.phase
    }

    /// Style the map is showing or loading towards.
    pub fn target(&self) -> MapStyle {
        match self.phase {
            StylePhase::Ready(style) => style,
            StylePhase::Reloading { to, .. } => to,
        }
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self.phase, StylePhase::Reloading { .. })
    }

    /// Start switching to the other style. Returns the style to request from
    /// the renderer.
    ///
    /// Toggling while a reload is in flight retargets it; the next
    /// style-load completes to the latest target.
    pub fn toggle(&mut self) -> MapStyle {
        let (from, to) = match self.phase {
            StylePhase::Ready(current) => (current, current.toggled()),
            StylePhase::Reloading { from, to } => (from, to.toggled()),
        };
        info!(from = %from, to = %to, "Switching map style");
        self.phase = StylePhase::Reloading { from, to };
        to
    }

    /// Style finished loading. Returns the now-active style.
    pub fn on_style_loaded(&mut self) -> MapStyle {
        if let StylePhase::Reloading { to, .. } = self.phase {
            debug!(style = %to, "Map style loaded");
            self.phase = StylePhase::Ready(to);
        }
        self.target()
    }

    /// Label of the day/night control: the style a press switches to.
    pub fn button_label(&self) -> &'static str {
        match self.target() {
            MapStyle::Dark => "Light",
            MapStyle::Light => "Dark",
        }
    }
}

impl Default for StyleLayerManager {
    fn default() -> Self {
        Self::new(MapStyle::Dark)
    }
}
