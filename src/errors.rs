// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the device adapter

use std::fmt;

use crate::backends::BackendError;
use crate::selector::DeviceSelector;

/// Result type alias using AdapterError
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Adapter-level error type
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterError {
    /// The device context could not be created
    ContextInit(String),
    /// The selected device could not be opened
    DeviceOpen {
        selector: DeviceSelector,
        reason: String,
    },
    /// The adapter has no open device (torn down)
    DeviceNotOpen,
    /// A device call failed
    Device(BackendError),
    /// A message could not be understood
    InvalidMessage(String),
    /// Configuration could not be loaded or saved
    Config(String),
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterError::ContextInit(msg) => write!(f, "Context initialization failed: {}", msg),
            AdapterError::DeviceOpen { selector, reason } => {
                write!(f, "Could not open Kinect {}: {}", selector, reason)
            }
            AdapterError::DeviceNotOpen => write!(f, "No Kinect device is open"),
            AdapterError::Device(e) => write!(f, "Device error: {}", e),
            AdapterError::InvalidMessage(msg) => write!(f, "Invalid message: {}", msg),
            AdapterError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AdapterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdapterError::Device(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BackendError> for AdapterError {
    fn from(err: BackendError) -> Self {
        AdapterError::Device(err)
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Config(err.to_string())
    }
}

impl From<std::io::Error> for AdapterError {
    fn from(err: std::io::Error) -> Self {
        AdapterError::Config(err.to_string())
    }
}
