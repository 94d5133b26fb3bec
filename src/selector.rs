// SPDX-License-Identifier: GPL-3.0-only

//! Device selection by ordinal index or camera serial number

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DEVICE_INDEX;
use crate::message::Atom;

/// Which physical Kinect to open
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceSelector {
    /// Position in the enumeration order
    Index(u32),
    /// Camera serial number
    Serial(String),
}

impl Default for DeviceSelector {
    fn default() -> Self {
        DeviceSelector::Index(DEFAULT_DEVICE_INDEX)
    }
}

/// Reason a selector could not be built from constructor atoms
#[derive(Debug, Clone, PartialEq)]
pub struct NegativeIndex(pub i32);

impl DeviceSelector {
    /// Build a selector from creation arguments
    ///
    /// No atoms select index 0, a float selects the (truncated) index and a
    /// symbol selects by serial. Only the first atom is considered.
    pub fn from_atoms(atoms: &[Atom]) -> Result<Self, NegativeIndex> {
        match atoms.first() {
            None => Ok(Self::default()),
            Some(Atom::Float(f)) => {
                let index = *f as i32;
                u32::try_from(index)
                    .map(DeviceSelector::Index)
                    .map_err(|_| NegativeIndex(index))
            }
            Some(Atom::Symbol(serial)) => Ok(DeviceSelector::Serial(serial.clone())),
        }
    }
}

impl FromStr for DeviceSelector {
    type Err = std::convert::Infallible;

    /// All-digit text is an index, anything else a serial number
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = s.parse::<u32>() {
                return Ok(DeviceSelector::Index(index));
            }
        }
        Ok(DeviceSelector::Serial(s.to_string()))
    }
}

impl fmt::Display for DeviceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceSelector::Index(index) => write!(f, "Nr {}", index),
            DeviceSelector::Serial(serial) => write!(f, "with serial {}", serial),
        }
    }
}
