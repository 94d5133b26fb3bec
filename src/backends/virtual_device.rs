// SPDX-License-Identifier: GPL-3.0-only

//! Simulated Kinect backend
//!
//! Behaves like attached hardware without touching USB: the motor reaches a
//! commanded angle immediately and the accelerometer follows the angle.
//! Every call is appended to a shared [`Journal`], which lets callers check
//! what reached the "device" and in which order.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use super::{BackendError, BackendResult, DeviceAttributes, DeviceContext, MotorDevice};
use crate::constants::{ACCEL_COUNTS_PER_G, HARDWARE_TILT_LIMIT_DEGREES};
use crate::led::LedMode;
use crate::subdevice::{Subdevice, SubdeviceSet};
use crate::tilt::{RawTiltState, TiltStatus};

/// A call that reached the simulated device
#[derive(Debug, Clone, PartialEq)]
pub enum VirtualCall {
    ListDevices,
    SelectSubdevices(SubdeviceSet),
    Open { serial: String },
    UpdateTiltState { serial: String },
    SetTilt { serial: String, degrees: f64 },
    SetLed { serial: String, mode: LedMode },
    Close { serial: String },
    Shutdown,
}

/// Shared, append-only record of device calls
#[derive(Debug, Clone, Default)]
pub struct Journal {
    calls: Arc<Mutex<Vec<VirtualCall>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: VirtualCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    /// Snapshot of all calls so far
    pub fn calls(&self) -> Vec<VirtualCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    /// Number of recorded calls matching `pred`
    pub fn count(&self, pred: impl Fn(&VirtualCall) -> bool) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.iter().filter(|c| pred(c)).count())
            .unwrap_or(0)
    }
}

/// Simulated device context
#[derive(Debug)]
pub struct VirtualContext {
    serials: Vec<String>,
    selected: SubdeviceSet,
    journal: Journal,
    shut_down: bool,
}

impl VirtualContext {
    /// Context with one simulated Kinect per serial number
    pub fn new<S: Into<String>>(serials: impl IntoIterator<Item = S>) -> Self {
        let serials: Vec<String> = serials.into_iter().map(Into::into).collect();
        info!(devices = serials.len(), "Virtual Kinect context created");
        Self {
            serials,
            selected: SubdeviceSet::ALL,
            journal: Journal::new(),
            shut_down: false,
        }
    }

    /// Share an existing journal (e.g. to observe calls after the context moves)
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    fn ensure_open(&self) -> BackendResult<()> {
        if self.shut_down {
            Err(BackendError::NotAvailable("context shut down".to_string()))
        } else {
            Ok(())
        }
    }
}

impl DeviceContext for VirtualContext {
    type Device = VirtualMotor;

    fn list_device_attributes(&mut self) -> BackendResult<Vec<DeviceAttributes>> {
        self.ensure_open()?;
        self.journal.record(VirtualCall::ListDevices);

        Ok(self
            .serials
            .iter()
            .enumerate()
            .map(|(i, serial)| DeviceAttributes {
                camera_serial: serial.clone(),
                bus: 1,
                address: (i + 2) as u8,
            })
            .collect())
    }

    fn supported_subdevices(&self) -> SubdeviceSet {
        SubdeviceSet::ALL
    }

    fn select_subdevices(&mut self, subdevices: SubdeviceSet) {
        self.journal.record(VirtualCall::SelectSubdevices(subdevices));
        self.selected = subdevices;
    }

    fn open_device(&mut self, index: u32) -> BackendResult<VirtualMotor> {
        self.ensure_open()?;

        if !self.selected.contains(Subdevice::Motor) {
            return Err(BackendError::NotAvailable(
                "motor subdevice not selected".to_string(),
            ));
        }

        let serial = self.serials.get(index as usize).ok_or_else(|| {
            BackendError::DeviceNotFound(format!(
                "index {} out of range ({} devices)",
                index,
                self.serials.len()
            ))
        })?;

        debug!(index, serial = %serial, "Opening virtual Kinect");
        self.journal.record(VirtualCall::Open {
            serial: serial.clone(),
        });
        Ok(VirtualMotor::new(serial.clone(), self.journal.clone()))
    }

    fn open_device_by_serial(&mut self, serial: &str) -> BackendResult<VirtualMotor> {
        self.ensure_open()?;

        let index = self
            .serials
            .iter()
            .position(|s| s == serial)
            .ok_or_else(|| BackendError::DeviceNotFound(format!("no camera with serial {}", serial)))?;

        self.open_device(index as u32)
    }

    fn shutdown(&mut self) -> BackendResult<()> {
        if self.shut_down {
            warn!("Virtual context already shut down");
            return Ok(());
        }
        self.shut_down = true;
        self.journal.record(VirtualCall::Shutdown);
        Ok(())
    }
}

/// Simulated motor subdevice
#[derive(Debug)]
pub struct VirtualMotor {
    serial: String,
    angle_degrees: f64,
    led: LedMode,
    state: RawTiltState,
    journal: Journal,
    closed: bool,
}

impl VirtualMotor {
    fn new(serial: String, journal: Journal) -> Self {
        Self {
            serial,
            angle_degrees: 0.0,
            led: LedMode::Green,
            state: RawTiltState::default(),
            journal,
            closed: false,
        }
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    pub fn led(&self) -> LedMode {
        self.led
    }

    fn ensure_open(&self) -> BackendResult<()> {
        if self.closed {
            Err(BackendError::Closed)
        } else {
            Ok(())
        }
    }
}

impl MotorDevice for VirtualMotor {
    fn update_tilt_state(&mut self) -> BackendResult<()> {
        self.ensure_open()?;
        self.journal.record(VirtualCall::UpdateTiltState {
            serial: self.serial.clone(),
        });

        // Gravity seen by a sensor pitched by the tilt angle
        let radians = self.angle_degrees.to_radians();
        self.state = RawTiltState {
            accelerometer_x: 0,
            accelerometer_y: (-ACCEL_COUNTS_PER_G * radians.cos()).round() as i16,
            accelerometer_z: (ACCEL_COUNTS_PER_G * radians.sin()).round() as i16,
            tilt_angle: (self.angle_degrees * 2.0) as i8,
            tilt_status: if self.angle_degrees.abs() >= HARDWARE_TILT_LIMIT_DEGREES {
                TiltStatus::Limit
            } else {
                TiltStatus::Stopped
            },
        };
        Ok(())
    }

    fn tilt_state(&self) -> RawTiltState {
        self.state
    }

    fn set_tilt_degrees(&mut self, degrees: f64) -> BackendResult<()> {
        self.ensure_open()?;
        self.journal.record(VirtualCall::SetTilt {
            serial: self.serial.clone(),
            degrees,
        });
        self.angle_degrees = degrees.clamp(-HARDWARE_TILT_LIMIT_DEGREES, HARDWARE_TILT_LIMIT_DEGREES);
        Ok(())
    }

    fn set_led(&mut self, mode: LedMode) -> BackendResult<()> {
        self.ensure_open()?;
        self.journal.record(VirtualCall::SetLed {
            serial: self.serial.clone(),
            mode,
        });
        self.led = mode;
        Ok(())
    }

    fn close(&mut self) -> BackendResult<()> {
        self.ensure_open()?;
        self.closed = true;
        self.journal.record(VirtualCall::Close {
            serial: self.serial.clone(),
        });
        Ok(())
    }
}
