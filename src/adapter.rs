// SPDX-License-Identifier: GPL-3.0-only

//! The `freenect` device adapter
//!
//! One adapter owns one device context and one opened Kinect. Inbound
//! messages are validated, clamped and forwarded to the device; query
//! results go out through the adapter's [`Outlet`].
//!
//! | message       | effect                                       |
//! |---------------|----------------------------------------------|
//! | `bang`/`status` | log devices and supported subdevices       |
//! | `accel`       | emit `accel x y z` then `tilt_angle deg`     |
//! | `angle f`     | tilt to `f` clamped to ±30°                  |
//! | `led f`       | set LED mode 0..=5, other codes ignored      |

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::backends::{BackendResult, DeviceAttributes, DeviceContext, MotorDevice};
use crate::constants::{TILT_MAX_DEGREES, TILT_MIN_DEGREES};
use crate::errors::{AdapterError, AdapterResult};
use crate::led::LedMode;
use crate::message::{Atom, Inbound, Outbound, Outlet};
use crate::selector::DeviceSelector;
use crate::subdevice::SubdeviceSet;
use crate::tilt::TiltState;

/// Outbound selector for accelerometer readings
pub const ACCEL_SELECTOR: &str = "accel";
/// Outbound selector for the tilt angle
pub const TILT_ANGLE_SELECTOR: &str = "tilt_angle";

/// Result of a status query
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub devices: Vec<DeviceAttributes>,
    pub supported: SubdeviceSet,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of devices found: {}", self.devices.len())?;
        for (i, device) in self.devices.iter().enumerate() {
            writeln!(f, "Device {} serial: {}", i, device.camera_serial)?;
        }
        write!(f, "Supported subdevices: {}", self.supported)
    }
}

/// Kinect control adapter
pub struct FreenectAdapter<C: DeviceContext, O: Outlet> {
    selector: DeviceSelector,
    context: Option<C>,
    device: Option<C::Device>,
    outlet: Option<O>,
}

impl<C: DeviceContext, O: Outlet> FreenectAdapter<C, O> {
    /// Open the context and the selected device
    ///
    /// Context and device open failures are logged and returned; no adapter
    /// exists afterwards.
    pub fn new(
        selector: DeviceSelector,
        init: impl FnOnce() -> BackendResult<C>,
        outlet: O,
    ) -> AdapterResult<Self> {
        info!("freenect {}", crate::VERSION);

        let mut context = match init() {
            Ok(context) => context,
            Err(e) => {
                error!(error = %e, "Device context initialization failed");
                return Err(AdapterError::ContextInit(e.to_string()));
            }
        };

        match context.list_device_attributes() {
            Ok(devices) => log_devices(&devices),
            Err(e) => warn!(error = %e, "Failed to list devices"),
        }

        context.select_subdevices(SubdeviceSet::MOTOR);

        let opened = match &selector {
            DeviceSelector::Index(index) => {
                debug!(index, "Trying to open Kinect by index");
                context.open_device(*index)
            }
            DeviceSelector::Serial(serial) => {
                info!(serial = %serial, "Trying to open Kinect by serial");
                context.open_device_by_serial(serial)
            }
        };

        let device = match opened {
            Ok(device) => device,
            Err(e) => {
                error!(selector = %selector, error = %e, "Could not open Kinect");
                if let Err(e) = context.shutdown() {
                    warn!(error = %e, "Context shutdown failed");
                }
                return Err(AdapterError::DeviceOpen {
                    selector,
                    reason: e.to_string(),
                });
            }
        };

        info!("Kinect {} opened", selector);

        Ok(Self {
            selector,
            context: Some(context),
            device: Some(device),
            outlet: Some(outlet),
        })
    }

    /// Construct from creation arguments (none, an index, or a serial symbol)
    pub fn from_atoms(
        atoms: &[Atom],
        init: impl FnOnce() -> BackendResult<C>,
        outlet: O,
    ) -> AdapterResult<Self> {
        let selector = DeviceSelector::from_atoms(atoms).map_err(|e| {
            AdapterError::InvalidMessage(format!("device index {} is negative", e.0))
        })?;
        Self::new(selector, init, outlet)
    }

    pub fn selector(&self) -> &DeviceSelector {
        &self.selector
    }

    /// True until [`FreenectAdapter::teardown`]
    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    pub fn outlet(&self) -> Option<&O> {
        self.outlet.as_ref()
    }

    /// Route one inbound message
    pub fn dispatch(&mut self, message: Inbound) -> AdapterResult<()> {
        match message {
            Inbound::Status => self.query_status().map(|_| ()),
            Inbound::Accel => self.query_motion_state().map(|_| ()),
            Inbound::Angle(degrees) => self.set_tilt_angle(degrees).map(|_| ()),
            Inbound::Led(code) => self.set_indicator(code).map(|_| ()),
        }
    }

    /// Parse and route a message given as atoms (selector first)
    pub fn handle_atoms(&mut self, atoms: &[Atom]) -> AdapterResult<()> {
        let message = Inbound::from_atoms(atoms)?;
        self.dispatch(message)
    }

    /// Re-enumerate devices and report backend capabilities
    pub fn query_status(&mut self) -> AdapterResult<StatusReport> {
        let context = self.context.as_mut().ok_or(AdapterError::DeviceNotOpen)?;

        let devices = context.list_device_attributes()?;
        log_devices(&devices);

        let supported = context.supported_subdevices();
        for subdevice in supported.iter() {
            info!(
                subdevice = %subdevice,
                mask = supported.bits(),
                "Backend supports subdevice"
            );
        }

        Ok(StatusReport { devices, supported })
    }

    /// Read accelerometer and tilt, emit `accel` then `tilt_angle`
    pub fn query_motion_state(&mut self) -> AdapterResult<TiltState> {
        let device = self.device.as_mut().ok_or(AdapterError::DeviceNotOpen)?;

        device.update_tilt_state()?;
        let raw = device.tilt_state();
        if !raw.angle_known() {
            debug!("Tilt angle unknown, motor may still be moving");
        }
        let state = raw.to_physical();

        let [x, y, z] = state.accel;
        self.emit(Outbound::floats(
            ACCEL_SELECTOR,
            &[x as f32, y as f32, z as f32],
        ));
        self.emit(Outbound::floats(
            TILT_ANGLE_SELECTOR,
            &[state.tilt_degrees as f32],
        ));

        Ok(state)
    }

    /// Move the motor; the angle is clamped to ±30°. Returns the angle sent.
    pub fn set_tilt_angle(&mut self, degrees: f32) -> AdapterResult<f64> {
        if degrees.is_nan() {
            return Err(AdapterError::InvalidMessage("angle: NaN".to_string()));
        }

        let device = self.device.as_mut().ok_or(AdapterError::DeviceNotOpen)?;

        let clamped = (degrees as f64).clamp(TILT_MIN_DEGREES, TILT_MAX_DEGREES);
        if clamped != degrees as f64 {
            debug!(requested = degrees, clamped, "Tilt angle clamped");
        }

        device.set_tilt_degrees(clamped)?;
        Ok(clamped)
    }

    /// Set the LED; codes outside 0..=5 are ignored and return `None`
    pub fn set_indicator(&mut self, code: f32) -> AdapterResult<Option<LedMode>> {
        let Some(mode) = LedMode::from_code(code) else {
            debug!(code, "Ignoring LED code outside 0..=5");
            return Ok(None);
        };

        let device = self.device.as_mut().ok_or(AdapterError::DeviceNotOpen)?;
        device.set_led(mode)?;
        Ok(Some(mode))
    }

    /// Close the device, shut down the context, release the outlet
    ///
    /// Safe to call more than once; later calls do nothing. Both releases
    /// are attempted even if the first fails; the first error is returned.
    pub fn teardown(&mut self) -> AdapterResult<()> {
        let mut result = Ok(());

        if let Some(mut device) = self.device.take() {
            if let Err(e) = device.close() {
                warn!(error = %e, "Failed to close Kinect");
                result = Err(AdapterError::Device(e));
            }
        }

        if let Some(mut context) = self.context.take() {
            if let Err(e) = context.shutdown() {
                warn!(error = %e, "Failed to shut down device context");
                if result.is_ok() {
                    result = Err(AdapterError::Device(e));
                }
            }
            info!("Kinect {} released", self.selector);
        }

        self.outlet = None;
        result
    }

    fn emit(&mut self, message: Outbound) {
        if let Some(outlet) = self.outlet.as_mut() {
            outlet.emit(message);
        }
    }
}

impl<C: DeviceContext, O: Outlet> Drop for FreenectAdapter<C, O> {
    fn drop(&mut self) {
        let _ = self.teardown();
    }
}

fn log_devices(devices: &[DeviceAttributes]) {
    info!(count = devices.len(), "Number of devices found");
    for (i, device) in devices.iter().enumerate() {
        info!(index = i, serial = %device.camera_serial, "Device serial");
    }
}
