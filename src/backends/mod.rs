// SPDX-License-Identifier: GPL-3.0-only

//! Device backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │   FreenectAdapter   │  ← message handling, clamping, outlets
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ DeviceContext trait │  ← enumeration, subdevice selection, open
//! └──────────┬──────────┘
//!            │ opens
//!            ▼
//! ┌─────────────────────┐
//! │  MotorDevice trait  │  ← tilt state, motor angle, LED
//! └──────────┬──────────┘
//!            │
//!       ┌────┴────┐
//!       ▼         ▼
//!    ┌─────┐  ┌─────────┐
//!    │ USB │  │ Virtual │
//!    └─────┘  └─────────┘
//! ```

pub mod types;
#[cfg(feature = "usb")]
pub mod usb;
pub mod virtual_device;

pub use types::*;

use crate::led::LedMode;
use crate::subdevice::SubdeviceSet;
use crate::tilt::RawTiltState;

/// Connection to the device subsystem
///
/// A context enumerates attached devices and opens them. Devices opened from
/// a context must be closed before [`DeviceContext::shutdown`] is called.
pub trait DeviceContext {
    type Device: MotorDevice;

    /// Enumerate attached devices in index order
    fn list_device_attributes(&mut self) -> BackendResult<Vec<DeviceAttributes>>;

    /// Subdevices this backend can drive
    fn supported_subdevices(&self) -> SubdeviceSet;

    /// Restrict which subdevices are opened by later `open_*` calls
    fn select_subdevices(&mut self, subdevices: SubdeviceSet);

    /// Open the device at `index` in enumeration order
    fn open_device(&mut self, index: u32) -> BackendResult<Self::Device>;

    /// Open the device whose camera reports `serial`
    fn open_device_by_serial(&mut self, serial: &str) -> BackendResult<Self::Device>;

    /// Release the context
    fn shutdown(&mut self) -> BackendResult<()>;
}

/// An opened Kinect motor subdevice
pub trait MotorDevice {
    /// Read a fresh tilt state from the device
    fn update_tilt_state(&mut self) -> BackendResult<()>;

    /// Last state read by [`MotorDevice::update_tilt_state`]
    fn tilt_state(&self) -> RawTiltState;

    /// Command the motor to an absolute angle in degrees
    fn set_tilt_degrees(&mut self, degrees: f64) -> BackendResult<()>;

    fn set_led(&mut self, mode: LedMode) -> BackendResult<()>;

    /// Release the device
    fn close(&mut self) -> BackendResult<()>;
}
