//! # Occupancy State Store
//!
//! Durable snapshot of current occupancy, one pipe-delimited line per
//! occupied spot. The snapshot is loaded once at startup and fully rewritten
//! after every successful mutation, so at rest the file always describes one
//! consistent lot.
//!
//! ## Recovery Discipline
//!
//! The load path is built for ugly files. Snapshots get hand-edited, copied
//! around, and occasionally half-written by a crash, so every per-line
//! problem - wrong field count, junk spot id, unknown category, blank plate,
//! an id beyond the configured capacity - is skipped with a warning and the
//! load keeps going. One rotten line never costs the rest of the lot.
//!
//! A read failure mid-parse is different: the file itself is suspect. We
//! keep whatever was restored so far, then truncate the snapshot to empty
//! rather than leave it undefined; the next save rewrites it from live
//! state.
//!
//! ## Invariant: Memory Leads Disk
//!
//! Unlike a database, the snapshot is advisory: the in-memory registry is
//! the source of truth and the file trails it. A failed save is logged and
//! the mutation stands - losing a snapshot write costs durability of the
//! latest change, never correctness of the running process.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::codec;
use crate::error::Result;
use crate::types::{Spot, SpotId};

// =============================================================================
// State Store
// =============================================================================

/// Loads and saves the occupancy snapshot.
///
/// Built either [`on_disk`](StateStore::on_disk) or
/// [`ephemeral`](StateStore::ephemeral). Ephemeral stores never touch the
/// filesystem: `load` hands back an all-free lot and `save` is a no-op.
/// That is the isolation used by tests and throwaway instances - a second
/// constructor path, not a different type.
#[derive(Debug)]
pub struct StateStore {
    /// Snapshot file path; `None` disables persistence entirely.
    state_path: Option<PathBuf>,
}

impl StateStore {
    /// A store backed by the given snapshot file.
    pub fn on_disk(state_path: impl Into<PathBuf>) -> Self {
        Self {
            state_path: Some(state_path.into()),
        }
    }

    /// A store that never touches the filesystem.
    pub fn ephemeral() -> Self {
        Self { state_path: None }
    }

    /// True when persistence is disabled.
    pub fn is_ephemeral(&self) -> bool {
        self.state_path.is_none()
    }

    // =========================================================================
    // Load
    // =========================================================================

    /// Builds the spot vector for a lot of `capacity` spots, restoring any
    /// persisted occupancy.
    ///
    /// Runs once at startup, before concurrent access begins, so it takes no
    /// lock. All failures degrade: the worst case is an emptier lot than the
    /// file described, plus warnings saying exactly what was dropped.
    pub fn load(&self, capacity: usize) -> Vec<Spot> {
        let mut spots: Vec<Spot> = (1..=capacity as u32)
            .map(|id| Spot::new(SpotId::from_raw(id)))
            .collect();

        let Some(path) = &self.state_path else {
            return spots;
        };

        if let Err(err) = self.ensure_state_file() {
            warn!(%err, "failed to prepare snapshot file, starting empty");
            return spots;
        }

        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                warn!(%err, path = %path.display(), "could not read persisted occupancy");
                self.truncate_snapshot();
                return spots;
            }
        };

        let mut restored = 0usize;
        for (index, read) in BufReader::new(file).lines().enumerate() {
            let line = match read {
                Ok(line) => line,
                Err(err) => {
                    // The file went bad under us. Keep what we have and
                    // reset the snapshot so the next save starts clean.
                    warn!(%err, "snapshot became unreadable mid-parse, truncating it");
                    self.truncate_snapshot();
                    return spots;
                }
            };

            let record = match codec::parse_occupancy(index + 1, &line) {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(err) => {
                    warn!(%err, "skipping snapshot record");
                    continue;
                }
            };

            let slot_index = record.spot_id.as_raw() as usize;
            if slot_index > capacity {
                warn!(
                    spot = %record.spot_id,
                    capacity,
                    "saved spot exceeds current lot size, ignoring record"
                );
                continue;
            }

            let spot = &mut spots[slot_index - 1];
            if !spot.is_available() {
                // Duplicate ids should not occur, but a later record beats
                // an earlier one over leaving the file's order ambiguous.
                warn!(spot = %record.spot_id, "duplicate snapshot record, later one wins");
                spot.clear();
            }
            spot.park(record.vehicle);
            restored += 1;
        }

        debug!(restored, capacity, "occupancy restored from snapshot");
        spots
    }

    // =========================================================================
    // Save
    // =========================================================================

    /// Rewrites the snapshot to match `spots`: truncate, then one line per
    /// occupied spot. Free spots are implicit - no line at all.
    ///
    /// The registry calls this inside its critical section, so from any
    /// caller's perspective the rewrite is atomic: no interleaved mutation
    /// can be captured halfway.
    ///
    /// # Errors
    ///
    /// Propagates the underlying I/O failure. The registry logs it and moves
    /// on; by design the in-memory mutation is never rolled back over a
    /// snapshot problem.
    pub fn save(&self, spots: &[Spot]) -> Result<()> {
        let Some(path) = &self.state_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        for spot in spots {
            if let Some(vehicle) = spot.occupant() {
                writeln!(writer, "{}", codec::encode_occupancy(spot.id(), vehicle))?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    // =========================================================================
    // File Management
    // =========================================================================

    /// Creates the data directory and an empty snapshot file if absent.
    fn ensure_state_file(&self) -> std::io::Result<()> {
        let Some(path) = &self.state_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        // append(true) creates the file without clobbering existing content.
        OpenOptions::new().create(true).append(true).open(path)?;
        Ok(())
    }

    /// Resets the snapshot to empty after a failed read.
    fn truncate_snapshot(&self) {
        let Some(path) = &self.state_path else {
            return;
        };
        if let Err(err) = fs::write(path, "") {
            warn!(%err, path = %path.display(), "could not reset snapshot file");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
