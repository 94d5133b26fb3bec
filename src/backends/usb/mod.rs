// SPDX-License-Identifier: GPL-3.0-only

//! USB backend for the Kinect motor subdevice
//!
//! The Kinect shows up as separate USB devices for motor, camera and audio.
//! Tilt, LED and accelerometer live on the motor device; the serial number
//! lives on the camera. See [`pairing`] for how the two are matched up.

mod motor;
pub mod pairing;

pub use motor::UsbMotor;

use std::time::Duration;

use nusb::DeviceInfo;
use tracing::{debug, info, warn};

use self::pairing::{Sensor, UsbNode};
use super::{BackendError, BackendResult, DeviceAttributes, DeviceContext};
use crate::constants::usb;
use crate::subdevice::{Subdevice, SubdeviceSet};

/// Device context backed by the system USB stack
pub struct UsbContext {
    selected: SubdeviceSet,
    timeout: Duration,
    shut_down: bool,
}

impl UsbContext {
    /// Create a context; fails when the USB stack cannot be enumerated
    pub fn new(timeout: Duration) -> BackendResult<Self> {
        // Enumerate once so that a missing USB stack fails at init, not later
        nusb::list_devices()
            .map(drop)
            .map_err(|e| BackendError::NotAvailable(e.to_string()))?;

        info!(timeout_ms = timeout.as_millis() as u64, "USB context created");
        Ok(Self {
            selected: SubdeviceSet::ALL,
            timeout,
            shut_down: false,
        })
    }

    fn ensure_open(&self) -> BackendResult<()> {
        if self.shut_down {
            Err(BackendError::NotAvailable("context shut down".to_string()))
        } else {
            Ok(())
        }
    }

    /// Microsoft devices currently attached
    fn kinect_devices() -> BackendResult<Vec<DeviceInfo>> {
        Ok(nusb::list_devices()?
            .filter(|d| d.vendor_id() == usb::VENDOR_MICROSOFT)
            .collect())
    }

    fn sensors(devices: &[DeviceInfo]) -> Vec<Sensor> {
        let nodes: Vec<UsbNode> = devices
            .iter()
            .map(|d| UsbNode {
                bus: d.bus_number(),
                address: d.device_address(),
                product_id: d.product_id(),
                serial: d.serial_number().map(str::to_string),
            })
            .collect();
        pairing::pair_sensors(&nodes)
    }
}

impl DeviceContext for UsbContext {
    type Device = UsbMotor;

    fn list_device_attributes(&mut self) -> BackendResult<Vec<DeviceAttributes>> {
        self.ensure_open()?;

        let attributes = Self::sensors(&Self::kinect_devices()?)
            .into_iter()
            .map(|sensor| DeviceAttributes {
                camera_serial: sensor.camera.serial.unwrap_or_else(|| "unknown".to_string()),
                bus: sensor.camera.bus,
                address: sensor.camera.address,
            })
            .collect::<Vec<_>>();

        debug!(count = attributes.len(), "Enumerated Kinect cameras");
        Ok(attributes)
    }

    fn supported_subdevices(&self) -> SubdeviceSet {
        SubdeviceSet::MOTOR
    }

    fn select_subdevices(&mut self, subdevices: SubdeviceSet) {
        debug!(selected = %subdevices, "Selecting subdevices");
        self.selected = subdevices;
    }

    fn open_device(&mut self, index: u32) -> BackendResult<UsbMotor> {
        self.ensure_open()?;

        if !self.selected.contains(Subdevice::Motor) {
            return Err(BackendError::NotAvailable(
                "motor subdevice not selected".to_string(),
            ));
        }

        let devices = Self::kinect_devices()?;
        let sensors = Self::sensors(&devices);
        let motor = pairing::motor_at(&sensors, index)?;

        let info = devices
            .iter()
            .find(|d| {
                d.product_id() == motor.product_id
                    && d.bus_number() == motor.bus
                    && d.device_address() == motor.address
            })
            .ok_or_else(|| BackendError::DeviceNotFound("motor disappeared".to_string()))?;

        debug!(index, bus = motor.bus, address = motor.address, "Opening Kinect motor");

        let device = info.open()?;
        let interface = device.claim_interface(0)?;
        Ok(UsbMotor::new(interface, self.timeout))
    }

    fn open_device_by_serial(&mut self, serial: &str) -> BackendResult<UsbMotor> {
        self.ensure_open()?;

        let index = pairing::index_of_serial(&Self::sensors(&Self::kinect_devices()?), serial)?;
        self.open_device(index)
    }

    fn shutdown(&mut self) -> BackendResult<()> {
        if self.shut_down {
            warn!("USB context already shut down");
            return Ok(());
        }
        self.shut_down = true;
        info!("USB context shut down");
        Ok(())
    }
}
