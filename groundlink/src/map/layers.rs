//! Persistent custom layers: terrain, sky and the flight-path line.
//!
//! Every `ensure_*` function checks before it creates, so running
//! [`install_all`] on a map that already has some or all of the layers is a
//! no-op for those layers.

use tracing::debug;

use super::engine::{LayerKind, LayerSpec, LineString, MapEngine, MapError, SourceSpec, TerrainSpec};

pub const TERRAIN_SOURCE_ID: &str = "mapbox-dem";
pub const TERRAIN_TILES_URL: &str = "mapbox://mapbox.mapbox-terrain-dem-v1";
pub const TERRAIN_TILE_SIZE: u32 = 512;
pub const TERRAIN_MAX_ZOOM: u8 = 14;
pub const TERRAIN_EXAGGERATION: f64 = 1.3;

pub const SKY_LAYER_ID: &str = "sky";
pub const SKY_ATMOSPHERE_COLOR: &str = "#88c0ff";
pub const SKY_SUN_INTENSITY: f64 = 15.0;

pub const PATH_SOURCE_ID: &str = "dronePath";
pub const PATH_LAYER_ID: &str = "dronePathLine";
pub const PATH_LINE_COLOR: &str = "#00eaff";
pub const PATH_LINE_WIDTH: f64 = 3.0;

/// Elevation source and 3D terrain.
pub fn ensure_terrain<E: MapEngine>(engine: &mut E) -> Result<(), MapError> {
    if !engine.has_source(TERRAIN_SOURCE_ID) {
        engine.add_source(
            TERRAIN_SOURCE_ID,
            SourceSpec::RasterDem {
                url: TERRAIN_TILES_URL.to_string(),
                tile_size: TERRAIN_TILE_SIZE,
                max_zoom: TERRAIN_MAX_ZOOM,
            },
        )?;
        debug!(source = TERRAIN_SOURCE_ID, "Added terrain source");
    }
    engine.set_terrain(TerrainSpec {
        source: TERRAIN_SOURCE_ID.to_string(),
        exaggeration: TERRAIN_EXAGGERATION,
    })
}

/// Atmospheric sky layer.
pub fn ensure_sky<E: MapEngine>(engine: &mut E) -> Result<(), MapError> {
    if engine.has_layer(SKY_LAYER_ID) {
        return Ok(());
    }
    engine.add_layer(LayerSpec {
        id: SKY_LAYER_ID.to_string(),
        kind: LayerKind::Sky {
            atmosphere_color: SKY_ATMOSPHERE_COLOR.to_string(),
            sun: [0.0, 0.0],
            sun_intensity: SKY_SUN_INTENSITY,
        },
    })?;
    debug!(layer = SKY_LAYER_ID, "Added sky layer");
    Ok(())
}

/// Flight-path source and line layer. A newly created source starts with
/// `trail`.
pub fn ensure_path<E: MapEngine>(engine: &mut E, trail: LineString) -> Result<(), MapError> {
    if !engine.has_source(PATH_SOURCE_ID) {
        engine.add_source(PATH_SOURCE_ID, SourceSpec::GeoJson { data: trail })?;
        debug!(source = PATH_SOURCE_ID, "Added flight path source");
    }
    if !engine.has_layer(PATH_LAYER_ID) {
        engine.add_layer(LayerSpec {
            id: PATH_LAYER_ID.to_string(),
            kind: LayerKind::Line {
                source: PATH_SOURCE_ID.to_string(),
                color: PATH_LINE_COLOR.to_string(),
                width: PATH_LINE_WIDTH,
            },
        })?;
        debug!(layer = PATH_LAYER_ID, "Added flight path layer");
    }
    Ok(())
}

/// Install all persistent layers. Terrain goes first; the sky layer renders
/// against it.
pub fn install_all<E: MapEngine>(engine: &mut E, trail: LineString) -> Result<(), MapError> {
    ensure_terrain(engine)?;
    ensure_sky(engine)?;
    ensure_path(engine, trail)
}

/// Push the full trail to the path source, if the source exists yet.
pub fn update_path<E: MapEngine>(engine: &mut E, trail: LineString) -> Result<bool, MapError> {
    if !engine.has_source(PATH_SOURCE_ID) {
        return Ok(false);
    }
    engine.set_source_data(PATH_SOURCE_ID, trail)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::engine::MapOptions;
    use crate::map::scene::SceneMap;
    use crate::telemetry::GeoPosition;

    fn map() -> SceneMap {
        SceneMap::create(&MapOptions {
            style: "test".to_string(),
            center: GeoPosition::new(0.0, 0.0),
            zoom: 3.0,
            pitch: 0.0,
            bearing: 0.0,
        })
        .unwrap()
    }

    #[test]
    fn test_install_all_is_idempotent() {
        let mut scene = map();
        install_all(&mut scene, LineString::default()).unwrap();
        install_all(&mut scene, LineString::default()).unwrap();

        assert_eq!(scene.source_ids(), vec![TERRAIN_SOURCE_ID, PATH_SOURCE_ID]);
        assert_eq!(scene.layer_ids(), vec![SKY_LAYER_ID, PATH_LAYER_ID]);
        assert_eq!(
            scene.terrain().map(|t| t.source.as_str()),
            Some(TERRAIN_SOURCE_ID)
        );
    }

    #[test]
    fn test_layers_installed_in_order() {
        let mut scene = map();
        install_all(&mut scene, LineString::default()).unwrap();
        assert_eq!(
            scene.operation_log(),
            vec![
                "addSource mapbox-dem",
                "setTerrain mapbox-dem",
                "addLayer sky",
                "addSource dronePath",
                "addLayer dronePathLine",
            ]
        );
    }

    #[test]
    fn test_missing_path_layer_recreated_alone() {
        let mut scene = map();
        scene
            .add_source(
                PATH_SOURCE_ID,
                SourceSpec::GeoJson {
                    data: LineString::default(),
                },
            )
            .unwrap();

        ensure_path(&mut scene, LineString::default()).unwrap();

        assert_eq!(scene.source_ids(), vec![PATH_SOURCE_ID]);
        assert_eq!(scene.layer_ids(), vec![PATH_LAYER_ID]);
    }

    #[test]
    fn test_new_path_source_is_seeded() {
        let mut scene = map();
        let trail = LineString::new(vec![[8.0, 47.0], [8.1, 47.1]]);
        ensure_path(&mut scene, trail.clone()).unwrap();

        assert_eq!(scene.source_data(PATH_SOURCE_ID), Some(&trail));
    }

    #[test]
    fn test_update_path_before_install() {
        let mut scene = map();
        assert_eq!(update_path(&mut scene, LineString::default()), Ok(false));

        install_all(&mut scene, LineString::default()).unwrap();
        let trail = LineString::new(vec![[1.0, 2.0]]);
        assert_eq!(update_path(&mut scene, trail.clone()), Ok(true));
        assert_eq!(scene.source_data(PATH_SOURCE_ID), Some(&trail));
    }
}
