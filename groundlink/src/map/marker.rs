//! Vehicle marker and the takeoff cue.
//!
//! The presenter owns the single vehicle marker and the altitude memory used
//! to detect climbs. A climb of more than [`MarkerConfig::climb_threshold`]
//! between two readings applies [`MarkerEffect::Takeoff`] and arms an
//! [`EffectTimer`]; a new climb before the timer expires replaces the timer
//! rather than stacking a second one.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::telemetry::GeoPosition;

use super::engine::{MapEngine, MapError, MarkerEffect, MarkerId};

/// Marker presentation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerConfig {
    /// Altitude gain in meters between two readings that counts as a climb.
    pub climb_threshold: f64,
    /// How long the takeoff cue stays on.
    pub effect_duration: Duration,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            climb_threshold: 0.5,
            effect_duration: Duration::from_millis(600),
        }
    }
}

/// Deadline for clearing a transient marker effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectTimer {
    effect: MarkerEffect,
    deadline: Instant,
}

impl EffectTimer {
    pub fn arm(effect: MarkerEffect, now: Instant, duration: Duration) -> Self {
        Self {
            effect,
            deadline: now + duration,
        }
    }

    pub fn effect(&self) -> MarkerEffect {
        self.effect
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

/// Owns the vehicle marker, last altitude and effect timer.
#[derive(Debug, Clone)]
pub struct MarkerPresenter {
    config: MarkerConfig,
    marker: Option<MarkerId>,
    last_altitude: f64,
    effect: Option<EffectTimer>,
}

impl MarkerPresenter {
    pub fn new(config: MarkerConfig) -> Self {
        Self {
            config,
            marker: None,
            last_altitude: 0.0,
            effect: None,
        }
    }

    pub fn marker(&self) -> Option<MarkerId> {
        self.marker
    }

    pub fn last_altitude(&self) -> f64 {
        self.last_altitude
    }

    /// Pending effect timer, if an effect is showing.
    pub fn effect(&self) -> Option<&EffectTimer> {
        self.effect.as_ref()
    }

    /// Create the marker on first use, then move and rotate it.
    pub fn place<E: MapEngine>(
        &mut self,
        engine: &mut E,
        position: GeoPosition,
        heading: f64,
    ) -> Result<MarkerId, MapError> {
        let id = match self.marker {
            Some(id) => {
                engine.move_marker(id, position)?;
                id
            }
            None => {
                let id = engine.add_marker(position);
                debug!(marker = %id, lat = position.latitude, lon = position.longitude, "Vehicle marker created");
                self.marker = Some(id);
                id
            }
        };
        engine.rotate_marker(id, heading)?;
        Ok(id)
    }

    /// Feed the latest altitude. Returns true when the takeoff cue fired.
    ///
    /// The stored altitude starts at 0 and always becomes the reported
    /// altitude, whether or not the cue fired. A missing altitude reads as 0.
    /// The cue needs a marker to show on.
    pub fn observe_altitude<E: MapEngine>(
        &mut self,
        engine: &mut E,
        altitude: Option<f64>,
        now: Instant,
    ) -> Result<bool, MapError> {
        let current = altitude.unwrap_or(0.0);
        let climbed = current > self.last_altitude + self.config.climb_threshold;
        self.last_altitude = current;

        let Some(id) = self.marker else {
            return Ok(false);
        };
        if !climbed {
            return Ok(false);
        }

        engine.set_marker_effect(id, Some(MarkerEffect::Takeoff))?;
        let rearmed = self.effect.is_some();
        self.effect = Some(EffectTimer::arm(
            MarkerEffect::Takeoff,
            now,
            self.config.effect_duration,
        ));
        debug!(altitude = current, rearmed, "Takeoff cue");
        Ok(true)
    }

    /// Clear the effect once its timer has expired. Returns true when cleared.
    pub fn tick<E: MapEngine>(&mut self, engine: &mut E, now: Instant) -> Result<bool, MapError> {
        match (self.effect, self.marker) {
            (Some(timer), Some(id)) if timer.is_expired(now) => {
                self.effect = None;
                engine.set_marker_effect(id, None)?;
                Ok(true)
            }
            (Some(_), None) => {
                self.effect = None;
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    /// Remove the marker and drop any pending timer.
    pub fn teardown<E: MapEngine>(&mut self, engine: &mut E) -> Result<(), MapError> {
        self.effect = None;
        match self.marker.take() {
            Some(id) => engine.remove_marker(id),
            None => Ok(()),
        }
    }
}

impl Default for MarkerPresenter {
    fn default() -> Self {
        Self::new(MarkerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::engine::MapOptions;
    use crate::map::scene::SceneMap;

    fn scene() -> SceneMap {
        SceneMap::create(&MapOptions {
            style: "test".to_string(),
            center: GeoPosition::new(0.0, 0.0),
            zoom: 10.0,
            pitch: 0.0,
            bearing: 0.0,
        })
        .unwrap()
    }

    /// Presenter with a marker, `altitude` as the last reading and no effect.
    fn placed(scene: &mut SceneMap, altitude: f64) -> MarkerPresenter {
        let mut presenter = MarkerPresenter::default();
        presenter
            .place(scene, GeoPosition::new(47.0, 8.0), 0.0)
            .unwrap();
        let now = Instant::now();
        presenter
            .observe_altitude(scene, Some(altitude), now)
            .unwrap();
        presenter.tick(scene, now + Duration::from_secs(1)).unwrap();
        presenter
    }

    #[test]
    fn test_single_marker_created() {
        let mut scene = scene();
        let mut presenter = MarkerPresenter::default();

        let first = presenter
            .place(&mut scene, GeoPosition::new(47.0, 8.0), 10.0)
            .unwrap();
        let second = presenter
            .place(&mut scene, GeoPosition::new(47.1, 8.1), 20.0)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(scene.markers().count(), 1);
        let marker = scene.marker(first).unwrap();
        assert_eq!(marker.position, GeoPosition::new(47.1, 8.1));
        assert_eq!(marker.rotation, 20.0);
    }

    #[test]
    fn test_climb_fires_and_clears_after_600ms() {
        let mut scene = scene();
        let mut presenter = placed(&mut scene, 10.0);
        let id = presenter.marker().unwrap();
        let t0 = Instant::now();

        assert!(presenter
            .observe_altitude(&mut scene, Some(10.6), t0)
            .unwrap());
        assert_eq!(presenter.last_altitude(), 10.6);
        assert_eq!(scene.marker(id).unwrap().effect, Some(MarkerEffect::Takeoff));

        assert!(!presenter
            .tick(&mut scene, t0 + Duration::from_millis(599))
            .unwrap());
        assert!(presenter
            .tick(&mut scene, t0 + Duration::from_millis(600))
            .unwrap());
        assert_eq!(scene.marker(id).unwrap().effect, None);
    }

    #[test]
    fn test_small_climb_does_not_fire() {
        let mut scene = scene();
        let mut presenter = placed(&mut scene, 10.0);

        assert!(!presenter
            .observe_altitude(&mut scene, Some(10.4), Instant::now())
            .unwrap());
        assert_eq!(presenter.last_altitude(), 10.4);
        assert!(presenter.effect().is_none());
    }

    #[test]
    fn test_retrigger_replaces_timer() {
        let mut scene = scene();
        let mut presenter = placed(&mut scene, 0.0);
        let id = presenter.marker().unwrap();
        let t0 = Instant::now();

        presenter.observe_altitude(&mut scene, Some(1.0), t0).unwrap();
        let t1 = t0 + Duration::from_millis(400);
        presenter.observe_altitude(&mut scene, Some(2.0), t1).unwrap();

        assert_eq!(
            presenter.effect().unwrap().deadline(),
            t1 + Duration::from_millis(600)
        );
        // The first deadline has passed but the replaced timer has not.
        assert!(!presenter
            .tick(&mut scene, t0 + Duration::from_millis(700))
            .unwrap());
        assert_eq!(scene.marker(id).unwrap().effect, Some(MarkerEffect::Takeoff));
        assert!(presenter
            .tick(&mut scene, t1 + Duration::from_millis(600))
            .unwrap());
    }

    #[test]
    fn test_missing_altitude_reads_as_zero() {
        let mut scene = scene();
        let mut presenter = placed(&mut scene, 10.0);

        assert!(!presenter
            .observe_altitude(&mut scene, None, Instant::now())
            .unwrap());
        assert_eq!(presenter.last_altitude(), 0.0);

        // Back to 10 m counts as a climb from 0
        assert!(presenter
            .observe_altitude(&mut scene, Some(10.0), Instant::now())
            .unwrap());
    }

    #[test]
    fn test_first_reading_climbs_from_zero() {
        let mut scene = scene();
        let mut presenter = MarkerPresenter::default();
        assert_eq!(presenter.last_altitude(), 0.0);
        presenter
            .place(&mut scene, GeoPosition::new(47.0, 8.0), 0.0)
            .unwrap();

        assert!(presenter
            .observe_altitude(&mut scene, Some(10.6), Instant::now())
            .unwrap());
        assert_eq!(presenter.last_altitude(), 10.6);
    }

    #[test]
    fn test_first_reading_on_ground_does_not_fire() {
        let mut scene = scene();
        let mut presenter = MarkerPresenter::default();
        presenter
            .place(&mut scene, GeoPosition::new(47.0, 8.0), 0.0)
            .unwrap();

        assert!(!presenter
            .observe_altitude(&mut scene, Some(0.4), Instant::now())
            .unwrap());
        assert!(presenter.effect().is_none());
    }

    #[test]
    fn test_altitude_tracked_without_marker() {
        let mut scene = scene();
        let mut presenter = MarkerPresenter::default();
        let now = Instant::now();

        presenter.observe_altitude(&mut scene, Some(1.0), now).unwrap();
        assert!(!presenter
            .observe_altitude(&mut scene, Some(5.0), now)
            .unwrap());
        assert_eq!(presenter.last_altitude(), 5.0);
    }

    #[test]
    fn test_teardown_removes_marker() {
        let mut scene = scene();
        let mut presenter = placed(&mut scene, 0.0);
        presenter
            .observe_altitude(&mut scene, Some(3.0), Instant::now())
            .unwrap();

        presenter.teardown(&mut scene).unwrap();

        assert_eq!(scene.markers().count(), 0);
        assert!(presenter.marker().is_none());
        assert!(presenter.effect().is_none());
    }
}
