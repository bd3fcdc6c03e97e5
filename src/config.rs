//! # Lot Configuration
//!
//! Capacity and file layout for a lot instance. Configuration is a plain
//! struct handed to [`ParkingLot::open`] - there is no global state and no
//! config framework, just one integer and one directory.
//!
//! The capacity comes from `config.txt` inside the data directory: a single
//! positive integer. Anything else (missing file, garbage, zero, negative)
//! falls back to [`DEFAULT_CAPACITY`] with a warning, because a lot that
//! refuses to start over a config typo helps nobody.
//!
//! [`ParkingLot::open`]: crate::api::ParkingLot::open

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Number of spots when no usable capacity is configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Snapshot of current occupancy, fully rewritten on each mutation.
pub const STATE_FILE_NAME: &str = "lot_state.txt";

/// Append-only audit trail of PARK / REMOVE / PAYMENT events.
pub const EVENT_LOG_FILE_NAME: &str = "logs.txt";

/// Append-only log of closed, billed tickets.
pub const TICKET_LOG_FILE_NAME: &str = "tickets.txt";

/// Capacity configuration: one positive integer.
pub const CONFIG_FILE_NAME: &str = "config.txt";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for one lot instance.
#[derive(Debug, Clone)]
pub struct LotConfig {
    /// Number of spots, ids `1..=capacity`.
    pub capacity: usize,
    /// Directory holding the snapshot, logs, and capacity file.
    pub data_dir: PathBuf,
}

impl Default for LotConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl LotConfig {
    /// Builds a config with an explicit capacity.
    pub fn new(capacity: usize, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            capacity,
            data_dir: data_dir.into(),
        }
    }

    /// Builds a config by resolving the capacity from `config.txt` in
    /// `data_dir`, defaulting when the file is absent or unusable.
    pub fn load(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let capacity = resolve_capacity(&data_dir.join(CONFIG_FILE_NAME));
        Self { capacity, data_dir }
    }

    /// Path of the occupancy snapshot file.
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(STATE_FILE_NAME)
    }

    /// Path of the audit event log.
    pub fn event_log_path(&self) -> PathBuf {
        self.data_dir.join(EVENT_LOG_FILE_NAME)
    }

    /// Path of the closed-ticket log.
    pub fn ticket_log_path(&self) -> PathBuf {
        self.data_dir.join(TICKET_LOG_FILE_NAME)
    }
}

/// Reads a capacity from a single-integer file, defaulting on any failure.
///
/// The failure modes all resolve the same way (use the default, keep going),
/// so this returns a plain `usize` and reports the reason via the log.
pub fn resolve_capacity(path: &Path) -> usize {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return DEFAULT_CAPACITY,
        Err(err) => {
            warn!(path = %path.display(), %err, "config read failed, using default capacity");
            return DEFAULT_CAPACITY;
        }
    };

    match raw.trim().parse::<usize>() {
        Ok(capacity) if capacity > 0 => capacity,
        Ok(_) => {
            warn!(path = %path.display(), "configured capacity must be positive, using default");
            DEFAULT_CAPACITY
        }
        Err(_) => {
            warn!(
                path = %path.display(),
                value = raw.trim(),
                "configured capacity is not a number, using default"
            );
            DEFAULT_CAPACITY
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
