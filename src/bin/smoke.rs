//! Lotkeeper Smoke Scenario Binary
//!
//! A standalone binary that drives the full park → remove → bill → pay flow
//! end to end. Run with: `cargo run --bin smoke -- [OPTIONS]`
//!
//! This is separate from the regular test suite because:
//! 1. It exercises the real filesystem layout, not tempdir fixtures
//! 2. It is handy for poking at a live data directory while developing
//! 3. It doubles as a restart demo: run it twice against the same directory
//!    and watch occupancy survive
//!
//! # Examples
//!
//! ```bash
//! # In-memory scenario plus a disk-backed restart scenario in a temp dir
//! cargo run --bin smoke
//!
//! # Use (and leave behind) a real data directory
//! cargo run --bin smoke -- --data-dir ./data
//!
//! # Skip the filesystem entirely
//! cargo run --bin smoke -- --ephemeral-only
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use lotkeeper::{Error, LotConfig, ParkingLot, Vehicle, VehicleCategory};

/// Smoke scenario configuration.
struct Config {
    /// Spots in the scenario lots.
    capacity: usize,
    /// Data directory for the disk scenario (temp dir if None).
    data_dir: Option<PathBuf>,
    /// Skip the disk-backed scenario.
    ephemeral_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 2,
            data_dir: None,
            ephemeral_only: false,
        }
    }
}

fn parse_args() -> Config {
    let args: Vec<String> = std::env::args().collect();
    let mut config = Config::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--capacity" | "-c" => {
                i += 1;
                config.capacity = args[i].parse().expect("Invalid --capacity value");
            }
            "--data-dir" | "-d" => {
                i += 1;
                config.data_dir = Some(PathBuf::from(&args[i]));
            }
            "--ephemeral-only" => {
                config.ephemeral_only = true;
            }
            "--help" | "-h" => {
                println!(
                    r#"Lotkeeper Smoke Scenario

Usage: smoke [OPTIONS]

Options:
  -c, --capacity <N>   Spots in the scenario lots (default: 2)
  -d, --data-dir <DIR> Data directory for the disk scenario (default: temp)
  --ephemeral-only     Skip the disk-backed scenario
  -h, --help           Show this help
"#
                );
                std::process::exit(0);
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    config
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = parse_args();
    let mut passed = true;

    passed &= report("ephemeral fill/overflow", run_fill_scenario(config.capacity));
    if !config.ephemeral_only {
        let dir = config.data_dir.clone().unwrap_or_else(|| {
            std::env::temp_dir().join(format!("lotkeeper-smoke-{}", std::process::id()))
        });
        passed &= report("disk-backed restart", run_restart_scenario(config.capacity, &dir));
        println!("disk scenario data directory: {}", dir.display());
    }

    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn report(name: &str, result: Result<(), String>) -> bool {
    match result {
        Ok(()) => {
            println!("[PASS] {name}");
            true
        }
        Err(details) => {
            println!("[FAIL] {name} - {details}");
            false
        }
    }
}

/// Fills an ephemeral lot, overflows it, frees a spot, and parks the
/// previously rejected vehicle - checking capacity behavior end to end.
fn run_fill_scenario(capacity: usize) -> Result<(), String> {
    let lot = ParkingLot::ephemeral(capacity);

    for n in 0..capacity {
        let plate = format!("FILL{n}");
        let vehicle = Vehicle::new(&plate, VehicleCategory::Car).expect("valid plate");
        lot.park(vehicle)
            .map_err(|err| format!("park {plate}: {err}"))?;
    }

    let overflow = Vehicle::new("OVER1", VehicleCategory::Truck).expect("valid plate");
    match lot.park(overflow.clone()) {
        Err(Error::LotFull { .. }) => {}
        other => return Err(format!("expected a full lot, got {other:?}")),
    }

    let exit = lot
        .remove("fill0")
        .map_err(|err| format!("remove FILL0: {err}"))?;
    let cost = exit.cost.ok_or("no cost billed for FILL0")?;
    lot.record_payment(exit.vehicle.plate(), cost);

    let receipt = lot
        .park(overflow)
        .map_err(|err| format!("re-park OVER1: {err}"))?;
    if receipt.spot.as_raw() != 1 {
        return Err(format!("expected the freed spot 1, got {}", receipt.spot));
    }

    Ok(())
}

/// Parks into a real data directory, reopens the lot as a second "process",
/// and verifies occupancy survived the restart.
fn run_restart_scenario(capacity: usize, dir: &Path) -> Result<(), String> {
    let config = LotConfig::new(capacity, dir);

    {
        let lot = ParkingLot::open(config.clone());
        let vehicle = Vehicle::new("KEEP1", VehicleCategory::Bike).expect("valid plate");
        // Ignore residue from earlier runs against the same directory.
        if lot.status().iter().all(|spot| spot.is_available()) {
            lot.park(vehicle).map_err(|err| format!("park KEEP1: {err}"))?;
        }
    }

    let reopened = ParkingLot::open(config);
    if reopened.occupied_count() == 0 {
        return Err("occupancy did not survive the restart".to_string());
    }

    let exit = reopened
        .remove("KEEP1")
        .map_err(|err| format!("remove KEEP1: {err}"))?;
    if exit.cost.is_some() {
        return Err("restored occupancy should have no tracked ticket".to_string());
    }

    Ok(())
}
