// SPDX-License-Identifier: GPL-3.0-only

//! Accelerometer and tilt state
//!
//! The motor controller reports raw accelerometer counts (819 per g) and the
//! tilt angle in half degrees. [`RawTiltState`] holds the snapshot as read,
//! [`TiltState`] the values in physical units.

use crate::constants::{ACCEL_COUNTS_PER_G, GRAVITY, TILT_ANGLE_UNKNOWN, usb::TILT_STATE_LEN};

/// Motor status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiltStatus {
    #[default]
    Stopped,
    /// Stopped against a mechanical limit
    Limit,
    Moving,
    Unknown(u8),
}

impl From<u8> for TiltStatus {
    fn from(value: u8) -> Self {
        match value {
            0x00 => TiltStatus::Stopped,
            0x01 => TiltStatus::Limit,
            0x04 => TiltStatus::Moving,
            other => TiltStatus::Unknown(other),
        }
    }
}

/// Tilt state as reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawTiltState {
    pub accelerometer_x: i16,
    pub accelerometer_y: i16,
    pub accelerometer_z: i16,
    /// Half degrees; [`TILT_ANGLE_UNKNOWN`] while the position is unknown
    pub tilt_angle: i8,
    pub tilt_status: TiltStatus,
}

impl RawTiltState {
    /// Decode the reply to the tilt state request
    ///
    /// Layout: two unused bytes, x/y/z as big-endian i16, the angle byte and
    /// the status byte. Returns `None` for short replies.
    pub fn from_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() < TILT_STATE_LEN {
            return None;
        }

        let axis = |offset: usize| i16::from_be_bytes([buf[offset], buf[offset + 1]]);

        Some(Self {
            accelerometer_x: axis(2),
            accelerometer_y: axis(4),
            accelerometer_z: axis(6),
            tilt_angle: buf[8] as i8,
            tilt_status: TiltStatus::from(buf[9]),
        })
    }

    /// Accelerometer in m/s² (x, y, z)
    pub fn mks_accel(&self) -> (f64, f64, f64) {
        let to_mks = |raw: i16| raw as f64 / ACCEL_COUNTS_PER_G * GRAVITY;
        (
            to_mks(self.accelerometer_x),
            to_mks(self.accelerometer_y),
            to_mks(self.accelerometer_z),
        )
    }

    /// Tilt angle in degrees
    pub fn tilt_degrees(&self) -> f64 {
        self.tilt_angle as f64 / 2.0
    }

    pub fn angle_known(&self) -> bool {
        self.tilt_angle != TILT_ANGLE_UNKNOWN
    }

    pub fn to_physical(&self) -> TiltState {
        let (x, y, z) = self.mks_accel();
        TiltState {
            accel: [x, y, z],
            tilt_degrees: self.tilt_degrees(),
            status: self.tilt_status,
        }
    }
}

/// Tilt state in physical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltState {
    /// m/s² on x, y, z
    pub accel: [f64; 3],
    pub tilt_degrees: f64,
    pub status: TiltStatus,
}
