//! # Tickets and the Ticket Ledger
//!
//! A [`Ticket`] is the time-bounded billing record for one occupancy
//! episode: stamped on entry, closed and billed on exit, then appended to
//! the durable ticket log by the [`TicketLedger`].
//!
//! ## Billing Model
//!
//! Charges are flat-rate per billable hour. Any partial hour rounds up to a
//! whole one, and every stay is billed at least one hour - so a 1-second
//! stay and a 59-minute stay both cost one hour, and a 61-minute stay costs
//! two. The floor also absorbs clock weirdness: if the wall clock stepped
//! backwards between entry and exit, the elapsed time goes negative and the
//! stay still bills the minimum.
//!
//! ## Idempotent Close
//!
//! `close` stamps the exit time and computes the cost exactly once. Closing
//! an already-closed ticket returns the stored cost unchanged - callers can
//! close defensively without double-billing anyone.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::codec;
use crate::error::{Error, Result};
use crate::types::Vehicle;

/// Flat rate charged per billable hour.
pub const HOURLY_RATE: f64 = 5.0;

// =============================================================================
// Tickets
// =============================================================================

/// The billing record for one stay.
#[derive(Debug, Clone)]
pub struct Ticket {
    plate: String,
    entry_time: DateTime<Local>,
    exit_time: Option<DateTime<Local>>,
    cost: f64,
}

impl Ticket {
    /// Opens a ticket for the vehicle, stamped with the current time.
    pub fn open(vehicle: &Vehicle) -> Self {
        Self::open_at(vehicle, Local::now())
    }

    /// Opens a ticket with an explicit entry instant.
    ///
    /// The seam that lets billing be tested against crafted durations
    /// instead of sleeping through them.
    pub fn open_at(vehicle: &Vehicle, entry_time: DateTime<Local>) -> Self {
        Self {
            plate: vehicle.plate().to_string(),
            entry_time,
            exit_time: None,
            cost: 0.0,
        }
    }

    /// Closes the ticket now and returns the billed cost.
    ///
    /// Idempotent: a second close returns the previously computed cost
    /// without restamping or recomputing anything.
    pub fn close(&mut self) -> f64 {
        self.close_at(Local::now())
    }

    /// Closes the ticket at an explicit exit instant.
    pub fn close_at(&mut self, now: DateTime<Local>) -> f64 {
        if self.exit_time.is_some() {
            return self.cost;
        }
        self.exit_time = Some(now);

        // Whole billable hours: partial hours round up, minimum one. A
        // negative elapsed time (clock skew) falls through to the floor.
        let minutes = (now - self.entry_time).num_minutes();
        let billable_hours = (minutes as f64 / 60.0).ceil().max(1.0);
        self.cost = round_to_cents(billable_hours * HOURLY_RATE);
        self.cost
    }

    /// True until the ticket has been closed.
    pub fn is_open(&self) -> bool {
        self.exit_time.is_none()
    }

    /// The normalized plate this ticket bills.
    pub fn plate(&self) -> &str {
        &self.plate
    }

    /// When the stay began.
    pub fn entry_time(&self) -> DateTime<Local> {
        self.entry_time
    }

    /// When the stay ended, once closed.
    pub fn exit_time(&self) -> Option<DateTime<Local>> {
        self.exit_time
    }

    /// The billed cost; zero until closed.
    pub fn cost(&self) -> f64 {
        self.cost
    }
}

/// Rounds to two decimals, half away from zero.
///
/// Costs are non-negative, so this is plain half-up on the cent.
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Ticket Ledger
// =============================================================================

/// Append-only writer for closed tickets.
///
/// One line per closed ticket: `<PLATE> | <entry> | <exit> | $<cost>`. The
/// ledger does not deduplicate; the facade appends each ticket at most once
/// by removing it from its active map before writing.
#[derive(Debug)]
pub struct TicketLedger {
    /// Ledger file path; `None` disables persistence.
    path: Option<PathBuf>,
}

impl TicketLedger {
    /// A ledger backed by the given file, created on first append.
    pub fn on_disk(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A ledger that drops every record (ephemeral instances).
    pub fn ephemeral() -> Self {
        Self { path: None }
    }

    /// Appends one closed ticket to the log.
    ///
    /// # Errors
    ///
    /// [`Error::TicketOpen`] if the ticket has not been closed - the log
    /// stores completed stays only. Otherwise any underlying I/O failure;
    /// callers treat that as advisory, the billing already happened.
    pub fn append(&self, ticket: &Ticket) -> Result<()> {
        let Some(exit_time) = ticket.exit_time() else {
            return Err(Error::TicketOpen {
                plate: ticket.plate().to_string(),
            });
        };

        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let line = codec::format_ticket_line(
            ticket.plate(),
            &ticket.entry_time(),
            &exit_time,
            ticket.cost(),
        );
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
