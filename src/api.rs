//! # Parking Lot Facade
//!
//! [`ParkingLot`] wires the engine together: the spot registry, the state
//! store it persists through, the audit event log, and the ticket ledger.
//! It is the one type a front end needs to hold.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       ParkingLot                         │
//! │                                                          │
//! │  park/remove/status      remove (billing)     payments   │
//! │        │                       │                  │      │
//! │        ▼                       ▼                  ▼      │
//! │  ┌─────────────┐        ┌────────────┐     ┌──────────┐  │
//! │  │ SpotRegistry│ ──┐    │ active     │     │ EventLog │  │
//! │  │  (one lock) │   │    │ tickets    │     │ PAYMENT  │  │
//! │  └─────────────┘   │    └────────────┘     └──────────┘  │
//! │        │           │          │                          │
//! │        ▼           ▼          ▼                          │
//! │   StateStore    EventLog  TicketLedger                   │
//! │  lot_state.txt  logs.txt  tickets.txt                    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no global instance. The process entry point constructs a
//! `ParkingLot` explicitly and passes it to whoever needs it; tests and
//! throwaway tools use [`ParkingLot::ephemeral`], which is the same type
//! with persistence disabled - a second constructor path, not a subclass.
//!
//! ## Ticket Tracking
//!
//! The facade keeps the open ticket for each parked plate, the bookkeeping a
//! console front end would otherwise do by hand. `remove` closes the ticket,
//! appends it to the ledger exactly once (removal from the map is what makes
//! it at-most-once), and reports the billed cost. A vehicle restored from a
//! snapshot by a previous process has no tracked ticket; removing it still
//! succeeds, with no cost to report.
//!
//! Lock ordering is trivial by construction: the ticket-map mutex is only
//! ever taken after the registry's own lock has been released, so the two
//! can never deadlock.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::LotConfig;
use crate::error::Result;
use crate::events::EventLog;
use crate::registry::SpotRegistry;
use crate::store::StateStore;
use crate::ticket::{Ticket, TicketLedger};
use crate::types::{LicensePlate, Spot, SpotId, Vehicle};

// =============================================================================
// Receipts
// =============================================================================

/// What a successful park hands back to the caller.
#[derive(Debug, Clone)]
pub struct ParkReceipt {
    /// The allocated spot.
    pub spot: SpotId,
    /// When the ticket was opened.
    pub entry_time: DateTime<Local>,
}

/// What a successful removal hands back to the caller.
#[derive(Debug, Clone)]
pub struct ExitReceipt {
    /// The vehicle that was released.
    pub vehicle: Vehicle,
    /// The spot it vacated.
    pub spot: SpotId,
    /// The billed cost, when a ticket was tracked for this stay.
    ///
    /// `None` means the occupancy predates this process (restored from a
    /// snapshot) and there was no ticket to close.
    pub cost: Option<f64>,
}

// =============================================================================
// Facade
// =============================================================================

/// The assembled engine: registry + persistence + billing + audit.
#[derive(Debug)]
pub struct ParkingLot {
    registry: SpotRegistry,
    ledger: TicketLedger,
    events: Arc<EventLog>,
    active_tickets: Mutex<HashMap<String, Ticket>>,
}

impl ParkingLot {
    /// Opens a lot against its data directory, restoring persisted
    /// occupancy.
    pub fn open(config: LotConfig) -> Self {
        let events = Arc::new(EventLog::on_disk(config.event_log_path()));
        let store = StateStore::on_disk(config.state_path());
        let registry = SpotRegistry::new(config.capacity, store, Arc::clone(&events));
        let ledger = TicketLedger::on_disk(config.ticket_log_path());

        info!(
            capacity = config.capacity,
            data_dir = %config.data_dir.display(),
            restored = registry.occupied_count(),
            "parking lot opened"
        );

        Self {
            registry,
            ledger,
            events,
            active_tickets: Mutex::new(HashMap::new()),
        }
    }

    /// An isolated lot with persistence disabled everywhere.
    ///
    /// Used by tests and throwaway instances; nothing it does touches the
    /// filesystem.
    pub fn ephemeral(capacity: usize) -> Self {
        let events = Arc::new(EventLog::ephemeral());
        let registry = SpotRegistry::new(capacity, StateStore::ephemeral(), Arc::clone(&events));
        Self {
            registry,
            ledger: TicketLedger::ephemeral(),
            events,
            active_tickets: Mutex::new(HashMap::new()),
        }
    }

    /// The configured number of spots.
    pub fn capacity(&self) -> usize {
        self.registry.capacity()
    }

    /// Parks a vehicle: allocates a spot and opens a ticket for the stay.
    ///
    /// # Errors
    ///
    /// [`Error::LotFull`] when every spot is occupied; no ticket is opened.
    ///
    /// [`Error::LotFull`]: crate::error::Error::LotFull
    pub fn park(&self, vehicle: Vehicle) -> Result<ParkReceipt> {
        let spot = self.registry.allocate(vehicle.clone())?;

        let ticket = Ticket::open(&vehicle);
        let entry_time = ticket.entry_time();
        self.active_tickets
            .lock()
            .insert(ticket.plate().to_string(), ticket);

        Ok(ParkReceipt { spot, entry_time })
    }

    /// Removes a vehicle by plate: releases the spot, closes and records the
    /// ticket, and reports the billed cost.
    ///
    /// # Errors
    ///
    /// [`Error::VehicleNotFound`] when no occupied spot matches, or
    /// [`Error::EmptyPlate`] for a blank query; nothing changes in either
    /// case.
    ///
    /// [`Error::VehicleNotFound`]: crate::error::Error::VehicleNotFound
    /// [`Error::EmptyPlate`]: crate::error::Error::EmptyPlate
    pub fn remove(&self, plate: &str) -> Result<ExitReceipt> {
        let (vehicle, spot) = self.registry.release(plate)?;

        let tracked = self.active_tickets.lock().remove(vehicle.plate());
        let cost = match tracked {
            Some(mut ticket) => {
                let cost = ticket.close();
                if let Err(err) = self.ledger.append(&ticket) {
                    warn!(%err, plate = vehicle.plate(), "could not record closed ticket");
                }
                Some(cost)
            }
            None => {
                // Parked by a previous process; the spot was restored from
                // the snapshot without a live ticket.
                debug!(plate = vehicle.plate(), "removed vehicle had no tracked ticket");
                None
            }
        };

        Ok(ExitReceipt {
            vehicle,
            spot,
            cost,
        })
    }

    /// An ordered, consistent snapshot of every spot.
    pub fn status(&self) -> Vec<Spot> {
        self.registry.status()
    }

    /// How many spots are currently occupied.
    pub fn occupied_count(&self) -> usize {
        self.registry.occupied_count()
    }

    /// Records a confirmed payment in the audit log.
    ///
    /// The payment dialogue calls this with the cost it collected. The plate
    /// is normalized before logging; a blank plate is recorded as `UNKNOWN`
    /// rather than refused, because the payment already happened.
    pub fn record_payment(&self, plate: &str, amount: f64) {
        match LicensePlate::parse(plate) {
            Ok(normalized) => self.events.record_payment(normalized.as_str(), amount),
            Err(_) => self.events.record_payment("UNKNOWN", amount),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::VehicleCategory;

    fn vehicle(plate: &str, category: VehicleCategory) -> Vehicle {
        Vehicle::new(plate, category).unwrap()
    }

    #[test]
    fn test_park_and_remove_bills_the_stay() {
        let lot = ParkingLot::ephemeral(2);

        let receipt = lot.park(vehicle("AB12CD", VehicleCategory::Car)).unwrap();
        assert_eq!(receipt.spot.as_raw(), 1);
        assert_eq!(lot.occupied_count(), 1);

        let exit = lot.remove("ab12cd").unwrap();
        assert_eq!(exit.vehicle.plate(), "AB12CD");
        assert_eq!(exit.spot.as_raw(), 1);
        // Closed immediately: the one-hour floor applies.
        assert_eq!(exit.cost, Some(5.0));
        assert_eq!(lot.occupied_count(), 0);
    }

    #[test]
    fn test_failed_park_tracks_no_ticket() {
        let lot = ParkingLot::ephemeral(1);
        lot.park(vehicle("IN1", VehicleCategory::Car)).unwrap();

        let err = lot.park(vehicle("OUT1", VehicleCategory::Bike)).unwrap_err();
        assert!(matches!(err, Error::LotFull { capacity: 1 }));

        // The rejected vehicle never got a ticket or a spot.
        let err = lot.remove("OUT1").unwrap_err();
        assert!(matches!(err, Error::VehicleNotFound { .. }));
    }

    #[test]
    fn test_remove_without_tracked_ticket_reports_no_cost() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = LotConfig::new(2, dir.path());

        // First process parks and goes away without removing.
        let first = ParkingLot::open(config.clone());
        first.park(vehicle("STAY1", VehicleCategory::Car)).unwrap();
        drop(first);

        // Second process restores the occupancy but has no live ticket.
        let second = ParkingLot::open(config);
        assert_eq!(second.occupied_count(), 1);

        let exit = second.remove("STAY1").unwrap();
        assert_eq!(exit.cost, None);
        assert_eq!(second.occupied_count(), 0);
    }

    #[test]
    fn test_record_payment_normalizes_plate() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = LotConfig::new(1, dir.path());
        let lot = ParkingLot::open(config.clone());

        lot.record_payment("  ab12cd ", 12.5);
        lot.record_payment("   ", 3.0);

        let contents = std::fs::read_to_string(config.event_log_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert!(lines[0].ends_with("| PAYMENT | AB12CD settled $12.50"));
        assert!(lines[1].ends_with("| PAYMENT | UNKNOWN settled $3.00"));
    }
}
