//! parking-lot: console front end for the parking lot simulator.
//!
//! ## Modes
//!
//! - interactive (default): menu-driven prompt on stdin/stdout
//! - `--json`: one JSON command per line in, one JSON response per line out
//!
//! `parking-lot 11 9` sets the lot up before the first prompt, as does a
//! `[lot]` section in the config file.

mod json;
mod logging;
mod render;
mod repl;

use std::io;
use std::path::PathBuf;

use clap::Parser;
use parking_core::validation::{parse_dimension, MINIMUM_SIZE};
use parking_core::{load_config, ParkingConfig, ParkingError, ParkingSession, Result};

#[derive(Parser)]
#[command(name = "parking-lot")]
#[command(about = "Drive vehicles around a simulated parking lot")]
#[command(version)]
struct Cli {
    /// Lot length (columns), at least 7
    #[arg(value_name = "LENGTH", requires = "width")]
    length: Option<String>,

    /// Lot width (rows), at least 7
    #[arg(value_name = "WIDTH")]
    width: Option<String>,

    /// Config file (defaults to ~/.parking-lot/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read JSON commands from stdin instead of the interactive prompt
    #[arg(long)]
    json: bool,
}

/// Positional arguments win over the config file's `[lot]` section.
fn startup_dimensions(cli: &Cli, config: &ParkingConfig) -> Result<Option<(usize, usize)>> {
    match (&cli.length, &cli.width) {
        (Some(length), Some(width)) => {
            let length = parse_dimension("length", length)?;
            let width = parse_dimension("width", width)?;
            Ok(Some((width, length)))
        }
        _ => Ok(config.lot.dimensions()),
    }
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "Ignoring config; using defaults");
            ParkingConfig::default()
        }
    };

    let dimensions = startup_dimensions(&cli, &config);
    let mut session = ParkingSession::new(config.prices);
    let startup = match dimensions {
        Ok(Some((width, length))) => session.init_lot(width, length).map(|_| ()),
        Ok(None) => Ok(()),
        Err(err) => Err(err),
    };
    if let Err(err) = startup {
        tracing::warn!(error = %err, "Invalid start-up lot size");
        match err {
            ParkingError::SizeTooLarge { max, .. } => {
                println!("ParkingLot size cannot be more than {}. Goodbye!", max)
            }
            _ => println!("ParkingLot size cannot be less than {}. Goodbye!", MINIMUM_SIZE),
        }
        std::process::exit(1);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = if cli.json {
        json::run(&mut session, stdin.lock(), stdout.lock())
    } else {
        repl::Repl::new(session, stdin.lock(), stdout.lock()).run()
    };
    if let Err(err) = result {
        tracing::error!(error = %err, "parking-lot failed");
        std::process::exit(1);
    }
}
