// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON at `<config dir>/freenect/config.json`. A missing file
//! yields the defaults; unknown fields are ignored and missing fields take
//! their default value.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::DEFAULT_USB_TIMEOUT;
use crate::errors::{AdapterError, AdapterResult};
use crate::selector::DeviceSelector;

/// Application directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "freenect";
/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device opened when none is given on the command line
    pub device: DeviceSelector,
    /// Timeout for each USB control transfer in milliseconds
    pub usb_timeout_ms: u64,
    /// Fallback log filter when `RUST_LOG` is not set
    pub log_filter: String,
    /// Use the simulated device instead of USB
    pub use_virtual_device: bool,
    /// Serial numbers of the simulated devices
    pub virtual_serials: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: DeviceSelector::default(),
            usb_timeout_ms: DEFAULT_USB_TIMEOUT.as_millis() as u64,
            // Banner, device list and open notices; quiet USB backend
            log_filter: "warn,freenect=info,freenect::backends=error".to_string(),
            use_virtual_device: false,
            virtual_serials: vec!["VIRTUAL0000000001".to_string()],
        }
    }
}

impl Config {
    /// Default config file location, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> AdapterResult<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`; a missing file gives the defaults
    pub fn load_from(path: &Path) -> AdapterResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text).map_err(|e| {
            AdapterError::Config(format!("{}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> AdapterResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        info!(path = %path.display(), "Saved config");
        Ok(())
    }

    pub fn usb_timeout(&self) -> Duration {
        Duration::from_millis(self.usb_timeout_ms)
    }
}
