// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use freenect::constants::{
    ACCEL_COUNTS_PER_G, GRAVITY, HARDWARE_TILT_LIMIT_DEGREES, LED_CODE_MAX, TILT_MAX_DEGREES,
    TILT_MIN_DEGREES, usb,
};
use freenect::LedMode;

#[test]
fn test_tilt_range_is_symmetric() {
    assert_eq!(TILT_MIN_DEGREES, -TILT_MAX_DEGREES);
    assert_eq!(TILT_MAX_DEGREES, 30.0);
}

#[test]
fn test_message_range_within_hardware_limit() {
    // The adapter clamp must never be wider than the motor's own limit
    assert!(TILT_MAX_DEGREES <= HARDWARE_TILT_LIMIT_DEGREES);
}

#[test]
fn test_accel_scaling() {
    assert_eq!(ACCEL_COUNTS_PER_G, 819.0);
    assert!((GRAVITY - 9.80665).abs() < f64::EPSILON);
}

#[test]
fn test_led_code_max_matches_modes() {
    assert_eq!(LedMode::ALL.len() as i32, LED_CODE_MAX + 1);
}

#[test]
fn test_usb_ids() {
    assert_eq!(usb::VENDOR_MICROSOFT, 0x045e);
    assert_eq!(usb::PID_NUI_MOTOR, 0x02b0);
    assert_eq!(usb::PID_NUI_CAMERA, 0x02ae);
    assert_eq!(usb::TILT_STATE_LEN, 10);
}
