// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for device backends

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Backend or subdevice is not available
    NotAvailable(String),
    /// No device matches the selector
    DeviceNotFound(String),
    /// A control transfer failed or returned short
    Transfer(String),
    /// The device was already closed
    Closed,
    /// General I/O error
    IoError(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Not available: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::Transfer(msg) => write!(f, "Transfer failed: {}", msg),
            BackendError::Closed => write!(f, "Device already closed"),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::IoError(err.to_string())
    }
}

/// One attached Kinect as seen during enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAttributes {
    /// Camera serial number
    pub camera_serial: String,
    /// USB bus of the camera subdevice
    pub bus: u8,
    /// USB address of the camera subdevice
    pub address: u8,
}
