// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the device adapter, using the virtual backend

use freenect::adapter::{ACCEL_SELECTOR, TILT_ANGLE_SELECTOR};
use freenect::backends::virtual_device::{Journal, VirtualCall, VirtualContext};
use freenect::{
    AdapterError, Atom, DeviceSelector, FreenectAdapter, Inbound, LedMode, Outbound,
    SubdeviceSet,
};

const SERIALS: [&str; 3] = ["A00362A08602047A", "B00364707472050B", "A00365917784047A"];

type TestAdapter = FreenectAdapter<VirtualContext, Vec<Outbound>>;

fn open(selector: DeviceSelector) -> (TestAdapter, Journal) {
    let journal = Journal::new();
    let ctx = VirtualContext::new(SERIALS).with_journal(journal.clone());
    let adapter = FreenectAdapter::new(selector, || Ok(ctx), Vec::new()).unwrap();
    (adapter, journal)
}

fn opened_serial(journal: &Journal) -> Option<String> {
    journal.calls().into_iter().find_map(|call| match call {
        VirtualCall::Open { serial } => Some(serial),
        _ => None,
    })
}

fn tilt_commands(journal: &Journal) -> Vec<f64> {
    journal
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            VirtualCall::SetTilt { degrees, .. } => Some(degrees),
            _ => None,
        })
        .collect()
}

fn led_commands(journal: &Journal) -> Vec<LedMode> {
    journal
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            VirtualCall::SetLed { mode, .. } => Some(mode),
            _ => None,
        })
        .collect()
}

// ===== Construction =====

#[test]
fn test_no_arguments_opens_index_zero() {
    let journal = Journal::new();
    let ctx = VirtualContext::new(SERIALS).with_journal(journal.clone());
    let adapter: TestAdapter = FreenectAdapter::from_atoms(&[], || Ok(ctx), Vec::new()).unwrap();

    assert_eq!(adapter.selector(), &DeviceSelector::Index(0));
    assert_eq!(opened_serial(&journal).as_deref(), Some(SERIALS[0]));
}

#[test]
fn test_integer_argument_opens_that_index() {
    let journal = Journal::new();
    let ctx = VirtualContext::new(SERIALS).with_journal(journal.clone());
    let _adapter: TestAdapter =
        FreenectAdapter::from_atoms(&[Atom::Float(2.0)], || Ok(ctx), Vec::new()).unwrap();

    assert_eq!(opened_serial(&journal).as_deref(), Some(SERIALS[2]));
}

#[test]
fn test_symbol_argument_opens_by_serial() {
    let journal = Journal::new();
    let ctx = VirtualContext::new(SERIALS).with_journal(journal.clone());
    let _adapter: TestAdapter = FreenectAdapter::from_atoms(
        &[Atom::Symbol(SERIALS[1].to_string())],
        || Ok(ctx),
        Vec::new(),
    )
    .unwrap();

    assert_eq!(opened_serial(&journal).as_deref(), Some(SERIALS[1]));
}

#[test]
fn test_unknown_serial_fails_construction() {
    let ctx = VirtualContext::new(SERIALS);
    let result: Result<TestAdapter, _> = FreenectAdapter::new(
        DeviceSelector::Serial("NOPE".into()),
        || Ok(ctx),
        Vec::new(),
    );

    match result {
        Err(AdapterError::DeviceOpen { selector, .. }) => {
            assert_eq!(selector, DeviceSelector::Serial("NOPE".into()));
        }
        other => panic!("expected DeviceOpen error, got {:?}", other.err()),
    }
}

#[test]
fn test_negative_index_fails_construction() {
    let ctx = VirtualContext::new(SERIALS);
    let result: Result<TestAdapter, _> =
        FreenectAdapter::from_atoms(&[Atom::Float(-1.0)], || Ok(ctx), Vec::new());
    assert!(result.is_err());
}

#[test]
fn test_construction_order() {
    let (_adapter, journal) = open(DeviceSelector::default());
    let calls = journal.calls();

    // enumerate, restrict to motor, open
    assert_eq!(calls[0], VirtualCall::ListDevices);
    assert_eq!(calls[1], VirtualCall::SelectSubdevices(SubdeviceSet::MOTOR));
    assert!(matches!(calls[2], VirtualCall::Open { .. }));
}

#[test]
fn test_adapters_are_independent() {
    let (mut first, first_journal) = open(DeviceSelector::Index(0));
    let (mut second, second_journal) = open(DeviceSelector::Index(1));

    first.set_tilt_angle(5.0).unwrap();
    second.set_tilt_angle(-5.0).unwrap();
    first.teardown().unwrap();

    assert_eq!(tilt_commands(&first_journal), vec![5.0]);
    assert_eq!(tilt_commands(&second_journal), vec![-5.0]);
    assert!(second.is_open());
    assert!(second.set_indicator(1.0).is_ok());
}

// ===== angle =====

#[test]
fn test_angle_is_clamped() {
    let (mut adapter, journal) = open(DeviceSelector::default());

    let inputs = [-90.0_f32, -30.5, -30.0, -12.25, 0.0, 17.5, 30.0, 30.01, 1000.0];
    for input in inputs {
        let applied = adapter.set_tilt_angle(input).unwrap();
        assert_eq!(applied, (input as f64).clamp(-30.0, 30.0));
    }

    assert_eq!(
        tilt_commands(&journal),
        vec![-30.0, -30.0, -30.0, -12.25, 0.0, 17.5, 30.0, 30.0, 30.0]
    );
}

#[test]
fn test_angle_message_produces_no_output() {
    let (mut adapter, _) = open(DeviceSelector::default());
    adapter.dispatch(Inbound::Angle(10.0)).unwrap();
    assert_eq!(adapter.outlet().map(Vec::len), Some(0));
}

// ===== led =====

#[test]
fn test_led_mapping() {
    let (mut adapter, journal) = open(DeviceSelector::default());

    for code in 0..=5 {
        adapter.set_indicator(code as f32).unwrap();
    }

    assert_eq!(
        led_commands(&journal),
        vec![
            LedMode::Off,
            LedMode::Green,
            LedMode::Red,
            LedMode::Yellow,
            LedMode::BlinkGreen,
            LedMode::BlinkRedYellow,
        ]
    );
}

#[test]
fn test_led_out_of_range_is_ignored() {
    let (mut adapter, journal) = open(DeviceSelector::default());
    adapter.set_indicator(2.0).unwrap();

    assert_eq!(adapter.set_indicator(6.0).unwrap(), None);
    assert_eq!(adapter.set_indicator(-1.0).unwrap(), None);
    assert_eq!(adapter.set_indicator(255.0).unwrap(), None);

    // Only the valid call reached the device
    assert_eq!(led_commands(&journal), vec![LedMode::Red]);
}

#[test]
fn test_led_truncates_fractional_codes() {
    let (mut adapter, _) = open(DeviceSelector::default());
    assert_eq!(adapter.set_indicator(3.7).unwrap(), Some(LedMode::Yellow));
}

// ===== accel =====

#[test]
fn test_accel_emits_accel_then_tilt_angle() {
    let (mut adapter, _) = open(DeviceSelector::default());

    adapter.set_tilt_angle(20.0).unwrap();
    let state = adapter.query_motion_state().unwrap();

    let outlet = adapter.outlet().unwrap();
    assert_eq!(outlet.len(), 2);
    assert_eq!(outlet[0].selector, ACCEL_SELECTOR);
    assert_eq!(outlet[0].args.len(), 3);
    assert_eq!(outlet[1].selector, TILT_ANGLE_SELECTOR);
    assert_eq!(outlet[1].args, vec![Atom::Float(20.0)]);
    assert_eq!(state.tilt_degrees, 20.0);
}

#[test]
fn test_accel_values_in_mks() {
    let (mut adapter, _) = open(DeviceSelector::default());
    let state = adapter.query_motion_state().unwrap();

    // Level sensor: gravity on y only
    let [x, y, z] = state.accel;
    assert_eq!(x, 0.0);
    assert!((y + 9.80665).abs() < 1e-6);
    assert_eq!(z, 0.0);
}

#[test]
fn test_accel_order_is_stable_across_queries() {
    let (mut adapter, _) = open(DeviceSelector::default());

    for angle in [-30.0, 0.0, 12.0] {
        adapter.set_tilt_angle(angle).unwrap();
        adapter.dispatch(Inbound::Accel).unwrap();
    }

    let selectors: Vec<&str> = adapter
        .outlet()
        .unwrap()
        .iter()
        .map(|m| m.selector)
        .collect();
    assert_eq!(
        selectors,
        vec![
            ACCEL_SELECTOR,
            TILT_ANGLE_SELECTOR,
            ACCEL_SELECTOR,
            TILT_ANGLE_SELECTOR,
            ACCEL_SELECTOR,
            TILT_ANGLE_SELECTOR,
        ]
    );
}

// ===== status =====

#[test]
fn test_status_reports_devices_without_output() {
    let (mut adapter, _) = open(DeviceSelector::default());
    let report = adapter.query_status().unwrap();

    let serials: Vec<&str> = report
        .devices
        .iter()
        .map(|d| d.camera_serial.as_str())
        .collect();
    assert_eq!(serials, SERIALS.to_vec());
    assert_eq!(report.supported, SubdeviceSet::ALL);

    adapter.handle_atoms(&[Atom::Symbol("bang".into())]).unwrap();
    assert_eq!(adapter.outlet().map(Vec::len), Some(0));
}

// ===== messages =====

#[test]
fn test_handle_atoms_routes_messages() {
    let (mut adapter, journal) = open(DeviceSelector::default());

    adapter
        .handle_atoms(&[Atom::Symbol("angle".into()), Atom::Float(-45.0)])
        .unwrap();
    adapter
        .handle_atoms(&[Atom::Symbol("led".into()), Atom::Float(4.0)])
        .unwrap();
    adapter.handle_atoms(&[Atom::Symbol("accel".into())]).unwrap();

    assert_eq!(tilt_commands(&journal), vec![-30.0]);
    assert_eq!(led_commands(&journal), vec![LedMode::BlinkGreen]);
    assert_eq!(adapter.outlet().map(Vec::len), Some(2));

    assert!(matches!(
        adapter.handle_atoms(&[Atom::Symbol("depth".into())]),
        Err(AdapterError::InvalidMessage(_))
    ));
}

// ===== teardown =====

#[test]
fn test_teardown_closes_device_before_context() {
    let (mut adapter, journal) = open(DeviceSelector::default());
    journal.clear();

    adapter.teardown().unwrap();

    assert_eq!(
        journal.calls(),
        vec![
            VirtualCall::Close {
                serial: SERIALS[0].to_string()
            },
            VirtualCall::Shutdown,
        ]
    );
    assert!(adapter.outlet().is_none());
}

#[test]
fn test_teardown_is_idempotent() {
    let (mut adapter, journal) = open(DeviceSelector::default());

    adapter.teardown().unwrap();
    adapter.teardown().unwrap();
    drop(adapter);

    assert_eq!(
        journal.count(|c| matches!(c, VirtualCall::Close { .. })),
        1
    );
    assert_eq!(journal.count(|c| matches!(c, VirtualCall::Shutdown)), 1);
}

#[test]
fn test_drop_tears_down() {
    let (adapter, journal) = open(DeviceSelector::default());
    drop(adapter);

    let calls = journal.calls();
    let close = calls
        .iter()
        .position(|c| matches!(c, VirtualCall::Close { .. }))
        .unwrap();
    let shutdown = calls
        .iter()
        .position(|c| matches!(c, VirtualCall::Shutdown))
        .unwrap();
    assert!(close < shutdown);
}

#[test]
fn test_operations_after_teardown_fail() {
    let (mut adapter, _) = open(DeviceSelector::default());
    adapter.teardown().unwrap();

    assert!(!adapter.is_open());
    assert_eq!(adapter.query_motion_state().unwrap_err(), AdapterError::DeviceNotOpen);
    assert_eq!(adapter.set_tilt_angle(1.0).unwrap_err(), AdapterError::DeviceNotOpen);
    assert_eq!(adapter.set_indicator(1.0).unwrap_err(), AdapterError::DeviceNotOpen);
    assert_eq!(adapter.query_status().unwrap_err(), AdapterError::DeviceNotOpen);
}
