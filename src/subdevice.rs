// SPDX-License-Identifier: GPL-3.0-only

//! Named subdevice capability flags

use std::fmt;

/// Independently addressable Kinect subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subdevice {
    Motor,
    Camera,
    Audio,
}

impl Subdevice {
    pub const ALL: [Subdevice; 3] = [Subdevice::Motor, Subdevice::Camera, Subdevice::Audio];

    /// Bit in the capability mask (motor = bit 0, camera = bit 1, audio = bit 2)
    pub const fn bit(self) -> u8 {
        match self {
            Subdevice::Motor => 1 << 0,
            Subdevice::Camera => 1 << 1,
            Subdevice::Audio => 1 << 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Subdevice::Motor => "motor",
            Subdevice::Camera => "camera",
            Subdevice::Audio => "audio",
        }
    }
}

impl fmt::Display for Subdevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of subdevices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SubdeviceSet {
    bits: u8,
}

impl SubdeviceSet {
    pub const EMPTY: SubdeviceSet = SubdeviceSet { bits: 0 };
    pub const MOTOR: SubdeviceSet = SubdeviceSet::only(Subdevice::Motor);
    pub const ALL: SubdeviceSet = SubdeviceSet {
        bits: Subdevice::Motor.bit() | Subdevice::Camera.bit() | Subdevice::Audio.bit(),
    };

    pub const fn only(subdevice: Subdevice) -> Self {
        Self {
            bits: subdevice.bit(),
        }
    }

    /// Build from a raw mask; unknown bits are dropped
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            bits: bits & Self::ALL.bits,
        }
    }

    pub const fn bits(self) -> u8 {
        self.bits
    }

    pub const fn contains(self, subdevice: Subdevice) -> bool {
        self.bits & subdevice.bit() != 0
    }

    pub fn with(self, subdevice: Subdevice) -> Self {
        Self {
            bits: self.bits | subdevice.bit(),
        }
    }

    /// Members in motor, camera, audio order
    pub fn iter(self) -> impl Iterator<Item = Subdevice> {
        Subdevice::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

impl FromIterator<Subdevice> for SubdeviceSet {
    fn from_iter<I: IntoIterator<Item = Subdevice>>(iter: I) -> Self {
        iter.into_iter().fold(SubdeviceSet::EMPTY, SubdeviceSet::with)
    }
}

impl fmt::Display for SubdeviceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Subdevice::name).collect();
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join(", "))
        }
    }
}
