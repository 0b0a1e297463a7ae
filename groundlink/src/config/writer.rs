//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let rotate_with_heading = if config.camera.rotate_with_heading {
        "true"
    } else {
        "false"
    };

    format!(
        r#"[telemetry]
; WebSocket endpoint of the telemetry bridge (ws:// or wss://)
url = {}
; Seconds to wait for the connection handshake
connect_timeout_secs = {}

[map]
; Initial map center in degrees (default: PX4 SITL home)
latitude = {}
longitude = {}
; Initial zoom level (0-22)
zoom = {}
; Initial camera tilt in degrees (0-85)
pitch = {}
; Initial rotation in degrees clockwise from north
bearing = {}
; Map style: dark or light
style = {}

[camera]
; Duration of the per-update follow animation (milliseconds)
follow_duration_ms = {}
; Duration of the "Center Drone" jump (milliseconds)
recenter_duration_ms = {}
; Zoom level the "Center Drone" jump ends at
recenter_zoom = {}
; Rotate the map to the vehicle heading while following
rotate_with_heading = {}

[logging]
; Log file path (truncated at the start of every session)
file = {}
"#,
        config.telemetry.url,
        config.telemetry.connect_timeout_secs,
        config.map.latitude,
        config.map.longitude,
        config.map.zoom,
        config.map.pitch,
        config.map.bearing,
        config.map.style,
        config.camera.follow_duration_ms,
        config.camera.recenter_duration_ms,
        config.camera.recenter_zoom,
        rotate_with_heading,
        path_to_string(&config.logging.file),
    )
}

/// Render a path with the home directory collapsed to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapStyle;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.telemetry.url = "wss://gcs.example.com/ws".to_string();
        config.map.style = MapStyle::Light;
        config.map.latitude = -33.8688;
        config.camera.rotate_with_heading = false;
        config.logging.file = PathBuf::from("/var/log/groundlink.log");

        config.save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_default_config_has_every_section() {
        let text = to_config_string(&ConfigFile::default());
        for section in ["[telemetry]", "[map]", "[camera]", "[logging]"] {
            assert!(text.contains(section), "missing {}", section);
        }
        assert!(text.contains("style = dark"));
        assert!(text.contains("url = ws://localhost:8000/ws"));
    }

    #[test]
    fn test_home_path_written_with_tilde() {
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".groundlink").join("logs").join("x.log");
            assert_eq!(path_to_string(&path), "~/.groundlink/logs/x.log");
        }
    }
}
