// SPDX-License-Identifier: GPL-3.0-only

//! Status LED modes

use std::fmt;

use crate::constants::LED_CODE_MAX;

/// Fixed states of the front status light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedMode {
    Off,
    Green,
    Red,
    Yellow,
    BlinkGreen,
    /// Alternates red and yellow
    BlinkRedYellow,
}

impl LedMode {
    pub const ALL: [LedMode; 6] = [
        LedMode::Off,
        LedMode::Green,
        LedMode::Red,
        LedMode::Yellow,
        LedMode::BlinkGreen,
        LedMode::BlinkRedYellow,
    ];

    /// Map a `led` message argument to a mode
    ///
    /// The value is truncated toward zero; codes outside 0..=5 give `None`.
    pub fn from_code(code: f32) -> Option<Self> {
        let code = code as i32;
        if !(0..=LED_CODE_MAX).contains(&code) {
            return None;
        }
        Self::ALL.get(code as usize).copied()
    }

    /// Value sent to the motor controller; 5 is unused on the wire
    pub fn wire_value(self) -> u16 {
        match self {
            LedMode::Off => 0,
            LedMode::Green => 1,
            LedMode::Red => 2,
            LedMode::Yellow => 3,
            LedMode::BlinkGreen => 4,
            LedMode::BlinkRedYellow => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LedMode::Off => "off",
            LedMode::Green => "green",
            LedMode::Red => "red",
            LedMode::Yellow => "yellow",
            LedMode::BlinkGreen => "blink green",
            LedMode::BlinkRedYellow => "blink red/yellow",
        }
    }
}

impl fmt::Display for LedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_table() {
        assert_eq!(LedMode::from_code(0.0), Some(LedMode::Off));
        assert_eq!(LedMode::from_code(1.0), Some(LedMode::Green));
        assert_eq!(LedMode::from_code(2.0), Some(LedMode::Red));
        assert_eq!(LedMode::from_code(3.0), Some(LedMode::Yellow));
        assert_eq!(LedMode::from_code(4.0), Some(LedMode::BlinkGreen));
        assert_eq!(LedMode::from_code(5.0), Some(LedMode::BlinkRedYellow));
    }

    #[test]
    fn test_truncation() {
        assert_eq!(LedMode::from_code(4.9), Some(LedMode::BlinkGreen));
        assert_eq!(LedMode::from_code(5.99), Some(LedMode::BlinkRedYellow));
        // Truncates toward zero, so small negatives still mean off
        assert_eq!(LedMode::from_code(-0.5), Some(LedMode::Off));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(LedMode::from_code(6.0), None);
        assert_eq!(LedMode::from_code(-1.0), None);
        assert_eq!(LedMode::from_code(1000.0), None);
    }

    #[test]
    fn test_codes_round_trip() {
        for (code, mode) in LedMode::ALL.into_iter().enumerate() {
            assert_eq!(LedMode::from_code(code as f32), Some(mode));
        }
        assert_eq!(LedMode::BlinkRedYellow.wire_value(), 6);
    }
}
