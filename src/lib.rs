// SPDX-License-Identifier: GPL-3.0-only

//! freenect - Kinect motor, LED and accelerometer control
//!
//! Exposes the Kinect control surface as patch-style messages: a host sends
//! `accel`, `angle`, `led` and `status` to a [`FreenectAdapter`], which talks
//! to the device and emits `accel` / `tilt_angle` messages back.
//!
//! # Architecture
//!
//! - [`adapter`]: message handling and device lifecycle
//! - [`message`]: atoms, inbound and outbound messages, outlets
//! - [`backends`]: USB and virtual device backends
//! - [`tilt`], [`led`], [`subdevice`]: device data model
//! - [`config`]: user configuration
//!
//! # Example
//!
//! ```
//! use freenect::backends::virtual_device::VirtualContext;
//! use freenect::{DeviceSelector, FreenectAdapter, Inbound, Outbound};
//!
//! let ctx = VirtualContext::new(["A00362A08602047A"]);
//! let mut adapter =
//!     FreenectAdapter::new(DeviceSelector::default(), || Ok(ctx), Vec::<Outbound>::new())?;
//!
//! adapter.dispatch(Inbound::Angle(45.0))?; // clamped to 30°
//! adapter.dispatch(Inbound::Accel)?;
//! assert_eq!(adapter.outlet().map(Vec::len), Some(2));
//! # Ok::<(), freenect::AdapterError>(())
//! ```

pub mod adapter;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod led;
pub mod message;
pub mod selector;
pub mod subdevice;
pub mod tilt;

/// Build version shown in the startup banner
pub const VERSION: &str = env!("FREENECT_BUILD_VERSION");

pub use adapter::{FreenectAdapter, StatusReport};
pub use config::Config;
pub use errors::{AdapterError, AdapterResult};
pub use led::LedMode;
pub use message::{Atom, Inbound, Outbound, Outlet};
pub use selector::DeviceSelector;
pub use subdevice::{Subdevice, SubdeviceSet};
pub use tilt::{RawTiltState, TiltState, TiltStatus};
