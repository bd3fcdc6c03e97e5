//! # Spot Registry
//!
//! The registry owns the ordered collection of spots and is the only shared
//! mutable state in the engine. Every operation - allocate, release, status -
//! runs under one exclusive lock.
//!
//! ## One Lock, One Critical Section
//!
//! The lock deliberately covers the whole unit of work: scanning for a spot,
//! mutating it, rewriting the snapshot, and appending the audit event.
//!
//! ```text
//! allocate()                      release()
//! ┌──────── lock ────────┐        ┌──────── lock ────────┐
//! │ scan for free spot   │        │ scan for plate match │
//! │ bind vehicle         │        │ clear the spot       │
//! │ rewrite snapshot     │        │ rewrite snapshot     │
//! │ append audit event   │        │ append audit event   │
//! └──────────────────────┘        └──────────────────────┘
//! ```
//!
//! Splitting this into finer locks would open a window where two allocations
//! interleave between "claim the spot" and "persist the claim", and the
//! snapshot on disk would capture an ordering that never existed in memory.
//! Hold time is bounded: in-memory scans over a small vector plus one file
//! write. Nothing inside the section blocks on the network or waits
//! indefinitely.
//!
//! Persistence failures inside the section are logged and swallowed: the
//! in-memory mutation is the source of truth and is never rolled back over
//! a snapshot or audit problem.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::events::{EventKind, EventLog};
use crate::store::StateStore;
use crate::types::{LicensePlate, Spot, SpotId, Vehicle};

// =============================================================================
// Registry
// =============================================================================

/// Allocation and release of numbered spots, serialized by one lock.
#[derive(Debug)]
pub struct SpotRegistry {
    capacity: usize,
    inner: Mutex<RegistryInner>,
}

#[derive(Debug)]
struct RegistryInner {
    spots: Vec<Spot>,
    store: StateStore,
    events: Arc<EventLog>,
}

impl SpotRegistry {
    /// Builds a registry of `capacity` spots, restoring persisted occupancy
    /// through the given store.
    ///
    /// The load happens here, before the registry is shared, so it needs no
    /// lock and concurrent callers only ever observe a fully built lot.
    pub fn new(capacity: usize, store: StateStore, events: Arc<EventLog>) -> Self {
        let spots = store.load(capacity);
        Self {
            capacity,
            inner: Mutex::new(RegistryInner {
                spots,
                store,
                events,
            }),
        }
    }

    /// The configured number of spots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Parks a vehicle in the first free spot, lowest id first.
    ///
    /// First-fit is deterministic on purpose: given the same occupancy, the
    /// same spot is always chosen, which keeps snapshots and audit trails
    /// reproducible.
    ///
    /// # Errors
    ///
    /// [`Error::LotFull`] when no spot is free; the registry is untouched.
    pub fn allocate(&self, vehicle: Vehicle) -> Result<SpotId> {
        let mut inner = self.inner.lock();

        let Some(index) = inner.spots.iter().position(Spot::is_available) else {
            return Err(Error::LotFull {
                capacity: self.capacity,
            });
        };

        let spot_id = inner.spots[index].id();
        let message = format!("{vehicle} grabbed spot {spot_id}");
        inner.spots[index].park(vehicle);

        debug!(spot = %spot_id, "allocated");
        inner.persist_and_log(EventKind::Park, &message);
        Ok(spot_id)
    }

    /// Releases the vehicle with the given plate, freeing its spot.
    ///
    /// The query plate is normalized the same way stored plates are, so the
    /// match is effectively case-insensitive: a vehicle parked as `AB12CD`
    /// is released by `ab12cd`.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyPlate`] for a blank query, [`Error::VehicleNotFound`]
    /// when no occupied spot matches; no mutation in either case.
    pub fn release(&self, plate: &str) -> Result<(Vehicle, SpotId)> {
        let query = LicensePlate::parse(plate)?;
        let mut inner = self.inner.lock();

        for index in 0..inner.spots.len() {
            let matched = inner.spots[index]
                .occupant()
                .is_some_and(|occupant| occupant.plate() == query.as_str());
            if !matched {
                continue;
            }

            // The occupant was just observed under this same lock.
            let Some(vehicle) = inner.spots[index].clear() else {
                continue;
            };
            let spot_id = inner.spots[index].id();
            let message = format!("{} left spot {spot_id}", vehicle.plate());

            debug!(spot = %spot_id, plate = vehicle.plate(), "released");
            inner.persist_and_log(EventKind::Remove, &message);
            return Ok((vehicle, spot_id));
        }

        Err(Error::VehicleNotFound {
            plate: query.as_str().to_string(),
        })
    }

    /// An owned snapshot of every spot, in id order.
    ///
    /// Taken under the lock, so the result reflects one consistent instant
    /// even while other threads are allocating and releasing.
    pub fn status(&self) -> Vec<Spot> {
        self.inner.lock().spots.clone()
    }

    /// How many spots are currently occupied.
    pub fn occupied_count(&self) -> usize {
        self.inner
            .lock()
            .spots
            .iter()
            .filter(|spot| !spot.is_available())
            .count()
    }
}

impl RegistryInner {
    /// Snapshot save plus audit append, still under the caller's lock.
    ///
    /// Exactly one of each per successful mutation. Failures are demoted to
    /// warnings; durability is advisory relative to in-memory state.
    fn persist_and_log(&self, kind: EventKind, message: &str) {
        if let Err(err) = self.store.save(&self.spots) {
            warn!(%err, "snapshot save failed; in-memory state stands");
        }
        if let Err(err) = self.events.append(kind, message) {
            warn!(%err, "audit append failed");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
