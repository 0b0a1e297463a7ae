//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::defaults::{MAX_PITCH, MAX_ZOOM};
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::map::MapStyle;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [telemetry] section
    if let Some(section) = ini.section(Some("telemetry")) {
        if let Some(v) = section.get("url") {
            let v = v.trim();
            if !is_websocket_url(v) {
                return Err(invalid(
                    "telemetry",
                    "url",
                    v,
                    "must be a ws:// or wss:// URL",
                ));
            }
            config.telemetry.url = v.to_string();
        }
        if let Some(v) = parse_number::<u64>(section, "telemetry", "connect_timeout_secs")? {
            if v == 0 {
                return Err(invalid(
                    "telemetry",
                    "connect_timeout_secs",
                    "0",
                    "must be at least 1 second",
                ));
            }
            config.telemetry.connect_timeout_secs = v;
        }
    }

    // [map] section
    if let Some(section) = ini.section(Some("map")) {
        if let Some(v) = parse_ranged(section, "map", "latitude", -90.0, 90.0)? {
            config.map.latitude = v;
        }
        if let Some(v) = parse_ranged(section, "map", "longitude", -180.0, 180.0)? {
            config.map.longitude = v;
        }
        if let Some(v) = parse_ranged(section, "map", "zoom", 0.0, MAX_ZOOM)? {
            config.map.zoom = v;
        }
        if let Some(v) = parse_ranged(section, "map", "pitch", 0.0, MAX_PITCH)? {
            config.map.pitch = v;
        }
        if let Some(v) = parse_number::<f64>(section, "map", "bearing")? {
            if !v.is_finite() {
                return Err(invalid(
                    "map",
                    "bearing",
                    &v.to_string(),
                    "must be a finite number of degrees",
                ));
            }
            config.map.bearing = v.rem_euclid(360.0);
        }
        if let Some(v) = section.get("style") {
            config.map.style = MapStyle::from_str(v)
                .map_err(|_| invalid("map", "style", v, "must be 'dark' or 'light'"))?;
        }
    }

    // [camera] section
    if let Some(section) = ini.section(Some("camera")) {
        if let Some(v) = parse_number::<u64>(section, "camera", "follow_duration_ms")? {
            config.camera.follow_duration_ms = v;
        }
        if let Some(v) = parse_number::<u64>(section, "camera", "recenter_duration_ms")? {
            config.camera.recenter_duration_ms = v;
        }
        if let Some(v) = parse_ranged(section, "camera", "recenter_zoom", 0.0, MAX_ZOOM)? {
            config.camera.recenter_zoom = v;
        }
        if let Some(v) = section.get("rotate_with_heading") {
            config.camera.rotate_with_heading = parse_bool(v);
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// True for `ws://` and `wss://` URLs with something after the scheme.
pub fn is_websocket_url(url: &str) -> bool {
    url.strip_prefix("ws://")
        .or_else(|| url.strip_prefix("wss://"))
        .is_some_and(|rest| !rest.is_empty())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse an optional numeric key.
fn parse_number<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
) -> Result<Option<T>, ConfigFileError> {
    let Some(v) = section.get(key) else {
        return Ok(None);
    };
    v.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| invalid(section_name, key, v, "must be a number"))
}

/// Parse an optional finite number within `[min, max]`.
fn parse_ranged(
    section: &Properties,
    section_name: &str,
    key: &str,
    min: f64,
    max: f64,
) -> Result<Option<f64>, ConfigFileError> {
    match parse_number::<f64>(section, section_name, key)? {
        Some(v) if v.is_finite() && (min..=max).contains(&v) => Ok(Some(v)),
        Some(v) => Err(invalid(
            section_name,
            key,
            &v.to_string(),
            &format!("must be between {} and {}", min, max),
        )),
        None => Ok(None),
    }
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
