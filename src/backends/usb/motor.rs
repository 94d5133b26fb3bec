// SPDX-License-Identifier: GPL-3.0-only

//! Kinect motor control transfers

use std::time::Duration;

use nusb::Interface;
use nusb::transfer::{Control, ControlType, Recipient};
use tracing::{debug, info};

use crate::backends::{BackendError, BackendResult, MotorDevice};
use crate::constants::{HARDWARE_TILT_LIMIT_DEGREES, usb};
use crate::led::LedMode;
use crate::tilt::RawTiltState;

/// Opened motor subdevice
pub struct UsbMotor {
    interface: Option<Interface>,
    timeout: Duration,
    state: RawTiltState,
}

impl UsbMotor {
    pub(super) fn new(interface: Interface, timeout: Duration) -> Self {
        Self {
            interface: Some(interface),
            timeout,
            state: RawTiltState::default(),
        }
    }

    fn interface(&self) -> BackendResult<&Interface> {
        self.interface.as_ref().ok_or(BackendError::Closed)
    }

    fn vendor_request(request: u8, value: u16) -> Control {
        Control {
            control_type: ControlType::Vendor,
            recipient: Recipient::Device,
            request,
            value,
            index: 0,
        }
    }

    fn control_out(&self, request: u8, value: u16) -> BackendResult<()> {
        self.interface()?
            .control_out_blocking(Self::vendor_request(request, value), &[], self.timeout)
            .map(|_| ())
            .map_err(|e| BackendError::Transfer(format!("request {:#04x}: {}", request, e)))
    }
}

/// Angle in half degrees as sent in the setup packet value field
fn tilt_wire_value(degrees: f64) -> u16 {
    let degrees = degrees.clamp(-HARDWARE_TILT_LIMIT_DEGREES, HARDWARE_TILT_LIMIT_DEGREES);
    ((degrees * 2.0) as i16) as u16
}

impl MotorDevice for UsbMotor {
    fn update_tilt_state(&mut self) -> BackendResult<()> {
        let mut buf = [0u8; usb::TILT_STATE_LEN];
        let len = self
            .interface()?
            .control_in_blocking(
                Self::vendor_request(usb::REQUEST_GET_TILT_STATE, 0),
                &mut buf,
                self.timeout,
            )
            .map_err(|e| BackendError::Transfer(format!("tilt state: {}", e)))?;

        self.state = RawTiltState::from_bytes(&buf[..len]).ok_or_else(|| {
            BackendError::Transfer(format!(
                "tilt state: got {} bytes, expected {}",
                len,
                usb::TILT_STATE_LEN
            ))
        })?;
        Ok(())
    }

    fn tilt_state(&self) -> RawTiltState {
        self.state
    }

    fn set_tilt_degrees(&mut self, degrees: f64) -> BackendResult<()> {
        let value = tilt_wire_value(degrees);
        debug!(degrees, value, "Setting tilt via USB");
        self.control_out(usb::REQUEST_SET_TILT, value)
    }

    fn set_led(&mut self, mode: LedMode) -> BackendResult<()> {
        debug!(mode = %mode, "Setting LED via USB");
        self.control_out(usb::REQUEST_SET_LED, mode.wire_value())
    }

    fn close(&mut self) -> BackendResult<()> {
        // Dropping the interface releases the claim and the device handle
        self.interface.take().ok_or(BackendError::Closed)?;
        info!("Kinect motor closed");
        Ok(())
    }
}
