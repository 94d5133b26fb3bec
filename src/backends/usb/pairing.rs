// SPDX-License-Identifier: GPL-3.0-only

//! Camera/motor pairing
//!
//! A Kinect is a hub with separate camera and motor devices behind it, so
//! both always sit on the same bus. Pairing is done per bus: the n-th camera
//! on a bus (by address) goes with the n-th motor on that bus. Only camera
//! models that expose a separate motor device take part. Sensors are then
//! ordered by (bus, camera address), which defines the device index.

use crate::backends::{BackendError, BackendResult};
use crate::constants::usb;

/// A USB device as far as pairing is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbNode {
    pub bus: u8,
    pub address: u8,
    pub product_id: u16,
    pub serial: Option<String>,
}

/// One Kinect: its camera and, if found on the same bus, its motor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sensor {
    pub camera: UsbNode,
    pub motor: Option<UsbNode>,
}

/// Group Kinect cameras and motors into sensors in index order
pub fn pair_sensors(nodes: &[UsbNode]) -> Vec<Sensor> {
    let sorted = |product_id: u16| {
        let mut list: Vec<&UsbNode> = nodes.iter().filter(|n| n.product_id == product_id).collect();
        list.sort_by_key(|n| (n.bus, n.address));
        list
    };

    let cameras = sorted(usb::PID_NUI_CAMERA);
    let motors = sorted(usb::PID_NUI_MOTOR);

    let mut sensors = Vec::with_capacity(cameras.len());
    for (i, camera) in cameras.iter().enumerate() {
        // Position of this camera among the cameras on its own bus
        let slot = cameras[..i].iter().filter(|c| c.bus == camera.bus).count();
        let motor = motors
            .iter()
            .filter(|m| m.bus == camera.bus)
            .nth(slot)
            .map(|m| (*m).clone());

        sensors.push(Sensor {
            camera: (*camera).clone(),
            motor,
        });
    }
    sensors
}

/// Motor of the sensor at `index`
pub fn motor_at(sensors: &[Sensor], index: u32) -> BackendResult<&UsbNode> {
    let sensor = sensors.get(index as usize).ok_or_else(|| {
        BackendError::DeviceNotFound(format!(
            "index {} out of range ({} devices)",
            index,
            sensors.len()
        ))
    })?;

    sensor.motor.as_ref().ok_or_else(|| {
        BackendError::DeviceNotFound(format!(
            "no motor found for camera at bus {} address {}",
            sensor.camera.bus, sensor.camera.address
        ))
    })
}

/// Index of the sensor whose camera reports `serial`
pub fn index_of_serial(sensors: &[Sensor], serial: &str) -> BackendResult<u32> {
    sensors
        .iter()
        .position(|s| s.camera.serial.as_deref() == Some(serial))
        .map(|i| i as u32)
        .ok_or_else(|| BackendError::DeviceNotFound(format!("no camera with serial {}", serial)))
}
