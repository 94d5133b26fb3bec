// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use freenect::{Config, DeviceSelector};

mod cli;

use cli::Action;

#[derive(Parser)]
#[command(name = "freenect")]
#[command(about = "Kinect motor, LED and accelerometer control")]
#[command(version = freenect::VERSION)]
#[command(subcommand_required = false)]
struct Cli {
    /// Device index or camera serial number (default: from config, else 0)
    #[arg(short, long, global = true)]
    device: Option<DeviceSelector>,

    /// Use a simulated Kinect instead of USB hardware
    #[arg(long = "virtual", global = true)]
    use_virtual: bool,

    /// Config file (default: <config dir>/freenect/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List devices and supported subdevices
    Status,

    /// Print accelerometer (m/s²) and tilt angle
    Accel,

    /// Tilt the sensor (clamped to -30..30 degrees)
    Angle {
        #[arg(allow_negative_numbers = true)]
        degrees: f32,
    },

    /// Set the LED: 0 off, 1 green, 2 red, 3 yellow, 4 blink green, 5 blink red/yellow
    Led {
        #[arg(allow_negative_numbers = true)]
        code: f32,
    },

    /// Read messages such as `angle 10;` from stdin
    Repl,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Initialize logging
    // RUST_LOG takes precedence over the config's log_filter
    // Examples: RUST_LOG=debug, RUST_LOG=freenect=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let selector = cli.device.unwrap_or_else(|| config.device.clone());

    let action = match cli.command {
        None | Some(Commands::Status) => Action::Status,
        Some(Commands::Accel) => Action::Accel,
        Some(Commands::Angle { degrees }) => Action::Angle(degrees),
        Some(Commands::Led { code }) => Action::Led(code),
        Some(Commands::Repl) => Action::Repl,
    };

    cli::execute(selector, &config, cli.use_virtual, action)
}
