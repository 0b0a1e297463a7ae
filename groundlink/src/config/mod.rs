//! User configuration for Groundlink.
//!
//! Settings are read from an INI file (`~/.groundlink/config.ini`) with one
//! section per concern. A missing file means defaults; a present file only
//! needs the keys it wants to change.
//!
//! # Example
//!
//! ```ignore
//! use groundlink::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let ingestor_config = config.ingestor_config();
//! let map_config = config.map_sync_config();
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use parser::is_websocket_url;
pub use settings::{CameraSettings, ConfigFile, LoggingSettings, MapSettings, TelemetrySettings};
