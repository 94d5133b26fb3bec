// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for Kinect control
//!
//! Every command opens the selected device, performs one or more adapter
//! operations and tears the adapter down again. `repl` reads messages in
//! patch syntax (`angle 10;`) from stdin and prints outbound messages.

use std::error::Error;
use std::io::{self, BufRead, Write};

use freenect::backends::DeviceContext;
use freenect::backends::virtual_device::VirtualContext;
use freenect::message::parse_line;
use freenect::{Config, DeviceSelector, FreenectAdapter, Inbound, Outbound, Outlet};
use tracing::{debug, warn};

/// What to do once the device is open
#[derive(Debug, Clone, Copy)]
pub enum Action {
    Status,
    Accel,
    Angle(f32),
    Led(f32),
    Repl,
}

/// Prints outbound messages to stdout, one per line
pub struct StdoutOutlet;

impl Outlet for StdoutOutlet {
    fn emit(&mut self, message: Outbound) {
        println!("{}", message);
    }
}

type CliResult = Result<(), Box<dyn Error>>;

/// Open the device through the configured backend and run `action`
pub fn execute(
    selector: DeviceSelector,
    config: &Config,
    use_virtual: bool,
    action: Action,
) -> CliResult {
    if use_virtual || config.use_virtual_device {
        let serials = config.virtual_serials.clone();
        let mut adapter = FreenectAdapter::new(
            selector,
            || Ok(VirtualContext::new(serials)),
            StdoutOutlet,
        )?;
        return run(&mut adapter, action);
    }

    execute_usb(selector, config, action)
}

#[cfg(feature = "usb")]
fn execute_usb(selector: DeviceSelector, config: &Config, action: Action) -> CliResult {
    use freenect::backends::usb::UsbContext;

    let timeout = config.usb_timeout();
    let mut adapter = FreenectAdapter::new(selector, || UsbContext::new(timeout), StdoutOutlet)?;
    run(&mut adapter, action)
}

#[cfg(not(feature = "usb"))]
fn execute_usb(_selector: DeviceSelector, _config: &Config, _action: Action) -> CliResult {
    Err("built without USB support; use --virtual".into())
}

fn run<C: DeviceContext>(adapter: &mut FreenectAdapter<C, StdoutOutlet>, action: Action) -> CliResult {
    let result = match action {
        Action::Status => print_status(adapter),
        Action::Accel => adapter.query_motion_state().map(|_| ()).map_err(Into::into),
        Action::Angle(degrees) => {
            let applied = adapter.set_tilt_angle(degrees)?;
            println!("Tilt angle set to {}°", applied);
            Ok(())
        }
        Action::Led(code) => {
            match adapter.set_indicator(code)? {
                Some(mode) => println!("LED set to {}", mode),
                None => println!("LED code {} ignored (valid codes are 0-5)", code),
            }
            Ok(())
        }
        Action::Repl => repl(adapter),
    };

    adapter.teardown()?;
    result
}

fn print_status<C: DeviceContext>(adapter: &mut FreenectAdapter<C, StdoutOutlet>) -> CliResult {
    let report = adapter.query_status()?;
    println!("{}", report);
    Ok(())
}

/// Read messages from stdin until EOF or `quit`
fn repl<C: DeviceContext>(adapter: &mut FreenectAdapter<C, StdoutOutlet>) -> CliResult {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    eprintln!("Messages: status, accel, angle <deg>, led <0-5>, quit");

    for line in stdin.lock().lines() {
        let line = line?;
        for atoms in parse_line(&line) {
            if matches!(atoms.first(), Some(freenect::Atom::Symbol(s)) if s == "quit") {
                debug!("Leaving REPL");
                return Ok(());
            }

            let outcome = match Inbound::from_atoms(&atoms) {
                Ok(Inbound::Status) => print_status(adapter),
                Ok(message) => adapter.dispatch(message).map_err(Into::into),
                Err(e) => Err(e.into()),
            };

            if let Err(e) = outcome {
                warn!(error = %e, "Message failed");
                eprintln!("error: {}", e);
            }
        }
        stdout.flush()?;
    }

    Ok(())
}
