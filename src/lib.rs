//! # Lotkeeper - Parking Lot Allocation Engine
//!
//! Lotkeeper tracks occupancy of a fixed set of numbered parking spots,
//! issues a time-stamped ticket per stay, bills on exit, and persists both
//! current occupancy and historical logs to durable line-delimited files so
//! state survives process restarts. It provides:
//!
//! - **Deterministic allocation**: first-fit, lowest spot id wins
//! - **Ticket lifecycle**: open → close → billed, with an idempotent close
//! - **Crash-tolerant persistence**: snapshot + append-only logs, with
//!   recovery that skips malformed records instead of dying on them
//! - **Thread safety**: one exclusive lock around scan, mutation, and the
//!   durable writes they trigger
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      ParkingLot Facade                          │
//! │              (park, remove, status, payments)                   │
//! └───────────────┬─────────────────────────────┬───────────────────┘
//!                 │                             │
//!                 ▼                             ▼
//! ┌───────────────────────────────┐  ┌─────────────────────────────┐
//! │         Spot Registry         │  │       Ticket Ledger         │
//! │   (one lock: scan + mutate    │  │  (open/close/bill, append   │
//! │    + snapshot + audit event)  │  │   closed stays durably)     │
//! └───────────────┬───────────────┘  └──────────────┬──────────────┘
//!                 │                                 │
//!                 ▼                                 ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Line-Delimited Files                          │
//! │        lot_state.txt    logs.txt    tickets.txt                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Core Invariants
//!
//! These invariants are enforced throughout the codebase and must never be
//! violated:
//!
//! 1. **Capacity**: occupied spots never exceed the configured count
//! 2. **Determinism**: allocation always picks the lowest-id free spot
//! 3. **Single critical section**: a mutation and its snapshot/audit writes
//!    happen under one lock, never interleaved with another mutation
//! 4. **Memory leads disk**: persistence is advisory; a failed write is
//!    logged and the in-memory state stands
//! 5. **Bill once**: closing a ticket twice returns the same cost, and each
//!    closed ticket is appended to the ledger at most once
//!
//! ## Quick Start
//!
//! ```rust
//! use lotkeeper::{ParkingLot, Vehicle, VehicleCategory};
//!
//! # fn main() -> lotkeeper::Result<()> {
//! let lot = ParkingLot::ephemeral(10);
//!
//! let car = Vehicle::new("AB12CD", VehicleCategory::Car)?;
//! let receipt = lot.park(car)?;
//! println!("parked in spot {}", receipt.spot);
//!
//! let exit = lot.remove("ab12cd")?;  // plates match case-insensitively
//! if let Some(cost) = exit.cost {
//!     lot.record_payment(exit.vehicle.plate(), cost);
//! }
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

/// Error types for lot operations.
pub mod error;

/// Domain types: spots, plates, categories, vehicles.
pub mod types;

/// On-disk line formats: snapshot records, audit lines, ticket lines.
pub mod codec;

/// Capacity resolution and data-directory layout.
pub mod config;

/// Occupancy snapshot load/save with malformed-record recovery.
pub mod store;

/// Append-only audit trail (PARK / REMOVE / PAYMENT).
pub mod events;

/// Spot allocation and release under one exclusive lock.
pub mod registry;

/// Ticket lifecycle, billing, and the durable ticket log.
pub mod ticket;

/// The `ParkingLot` facade wiring the engine together.
pub mod api;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{ExitReceipt, ParkReceipt, ParkingLot};
pub use config::LotConfig;
pub use error::{Error, Result};
pub use events::{EventKind, EventLog};
pub use registry::SpotRegistry;
pub use store::StateStore;
pub use ticket::{Ticket, TicketLedger, HOURLY_RATE};
pub use types::{LicensePlate, Spot, SpotId, Vehicle, VehicleCategory};
