#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use lotkeeper::{LotConfig, Vehicle, VehicleCategory};

/// Creates a temp data directory and a config pointing at it.
///
/// The `TempDir` guard must stay alive for the duration of the test; the
/// directory is deleted when it drops.
pub fn temp_lot_config(capacity: usize) -> (tempfile::TempDir, LotConfig) {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    let config = LotConfig::new(capacity, dir.path());
    (dir, config)
}

/// Seeds the snapshot file with raw lines, exactly as written.
pub fn write_state_lines(config: &LotConfig, lines: &[&str]) {
    fs::create_dir_all(&config.data_dir).expect("create data dir");
    let mut contents = lines.join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    fs::write(config.state_path(), contents).expect("seed snapshot");
}

/// Reads the snapshot file back as trimmed lines.
pub fn read_state_lines(config: &LotConfig) -> Vec<String> {
    read_lines(&config.state_path())
}

/// Reads any log file back as lines.
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("read file")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Seeds the capacity config file.
pub fn write_capacity(dir: &Path, raw: &str) -> PathBuf {
    fs::create_dir_all(dir).expect("create data dir");
    let path = dir.join("config.txt");
    fs::write(&path, raw).expect("seed capacity");
    path
}

pub fn car(plate: &str) -> Vehicle {
    Vehicle::new(plate, VehicleCategory::Car).expect("valid plate")
}

pub fn bike(plate: &str) -> Vehicle {
    Vehicle::new(plate, VehicleCategory::Bike).expect("valid plate")
}

pub fn truck(plate: &str) -> Vehicle {
    Vehicle::new(plate, VehicleCategory::Truck).expect("valid plate")
}
