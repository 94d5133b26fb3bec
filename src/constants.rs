// SPDX-License-Identifier: GPL-3.0-only

//! Device-wide constants
//!
//! Tilt limits, accelerometer scaling and the USB identifiers/requests used to
//! talk to the Kinect motor subdevice.

use std::time::Duration;

/// Lowest tilt angle accepted by the `angle` message (degrees)
pub const TILT_MIN_DEGREES: f64 = -30.0;

/// Highest tilt angle accepted by the `angle` message (degrees)
pub const TILT_MAX_DEGREES: f64 = 30.0;

/// Mechanical limit enforced again by the motor backend (degrees)
pub const HARDWARE_TILT_LIMIT_DEGREES: f64 = 31.0;

/// Raw accelerometer counts for one g
pub const ACCEL_COUNTS_PER_G: f64 = 819.0;

/// Standard gravity (m/s²)
pub const GRAVITY: f64 = 9.80665;

/// Raw tilt angle reported while the motor position is unknown
pub const TILT_ANGLE_UNKNOWN: i8 = -128;

/// Highest LED code accepted by the `led` message
pub const LED_CODE_MAX: i32 = 5;

/// Default device index opened when no selector is given
pub const DEFAULT_DEVICE_INDEX: u32 = 0;

/// Default timeout for USB control transfers
pub const DEFAULT_USB_TIMEOUT: Duration = Duration::from_millis(1000);

/// USB identifiers and vendor requests
pub mod usb {
    /// Microsoft vendor ID
    pub const VENDOR_MICROSOFT: u16 = 0x045e;

    /// Kinect for Xbox 360 motor (tilt, LED, accelerometer)
    pub const PID_NUI_MOTOR: u16 = 0x02b0;
    /// Kinect for Xbox 360 camera (carries the serial number)
    pub const PID_NUI_CAMERA: u16 = 0x02ae;

    /// Set LED mode (vendor OUT, value = LED wire code)
    pub const REQUEST_SET_LED: u8 = 0x06;
    /// Set tilt angle (vendor OUT, value = angle in half degrees)
    pub const REQUEST_SET_TILT: u8 = 0x31;
    /// Read accelerometer, tilt angle and motor status (vendor IN)
    pub const REQUEST_GET_TILT_STATE: u8 = 0x32;

    /// Length of the tilt state reply
    pub const TILT_STATE_LEN: usize = 10;
}
