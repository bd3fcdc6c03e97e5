//! # Error Handling for Lotkeeper
//!
//! This module defines the error types used throughout the engine. We use a
//! single error enum ([`Error`]) to represent all possible failure modes,
//! which simplifies error handling for library users.
//!
//! ## Why a Single Error Type?
//!
//! Libraries commonly choose between:
//! 1. **Single enum** (our choice): Easy to match on, simple function signatures
//! 2. **Separate error types per module**: More precise, but verbose
//!
//! For an engine this size a single enum works well: callers typically want
//! to distinguish "lot is full" from "vehicle not found" from "disk trouble",
//! and nothing more fine-grained than that.
//!
//! ## Error Categories
//!
//! | Category    | Variants                     | Typical Response              |
//! |-------------|------------------------------|-------------------------------|
//! | Occupancy   | `LotFull`, `VehicleNotFound` | Report to caller, no mutation |
//! | Validation  | `EmptyPlate`, `TicketOpen`   | Fix the input and retry       |
//! | Persistence | `MalformedRecord`, `Io`      | Skip/warn, state stands       |
//!
//! No variant is fatal to the process. Occupancy and validation errors are
//! returned to the caller with no state change; persistence errors degrade to
//! warnings because durability is advisory relative to in-memory correctness.

use thiserror::Error;

// =============================================================================
// Error Type
// =============================================================================

/// All errors that can occur in lotkeeper operations.
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Occupancy Errors (Recoverable; registry state is untouched)
    // =========================================================================

    /// Every spot is occupied; the allocation did not happen.
    ///
    /// There is no queueing or waitlisting: the caller decides whether to
    /// retry later. The registry guarantees no mutation occurred.
    #[error("parking lot is full: all {capacity} spots are occupied")]
    LotFull {
        /// The configured number of spots.
        capacity: usize,
    },

    /// No occupied spot matches the given license plate.
    ///
    /// Matching is case-insensitive (plates are normalized on both sides),
    /// so this genuinely means the vehicle is not in the lot.
    #[error("no parked vehicle matches plate '{plate}'")]
    VehicleNotFound {
        /// The normalized plate that was searched for.
        plate: String,
    },

    // =========================================================================
    // Validation Errors (Caller passed something unusable)
    // =========================================================================

    /// A license plate was empty or all whitespace.
    ///
    /// Plates are trimmed and upper-cased at construction; a plate that is
    /// blank after trimming can never identify a vehicle, so [`Vehicle`]
    /// construction rejects it up front instead of letting an unusable
    /// record into the registry.
    ///
    /// [`Vehicle`]: crate::types::Vehicle
    #[error("license plate cannot be empty")]
    EmptyPlate,

    /// A ticket was handed to the ledger before being closed.
    ///
    /// The ticket log stores only completed stays (entry time, exit time,
    /// billed cost). Close the ticket first; `close` is idempotent so there
    /// is no harm in closing defensively.
    #[error("ticket for '{plate}' is still open")]
    TicketOpen {
        /// The plate on the offending ticket.
        plate: String,
    },

    // =========================================================================
    // Persistence Errors (Degraded to warnings on the recovery path)
    // =========================================================================

    /// A persisted line could not be parsed.
    ///
    /// Raised by the codec during snapshot load. The store does not treat
    /// this as fatal: the offending line is skipped with a warning and the
    /// load continues, so one corrupt record never takes down recovery.
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number within the snapshot file.
        line: usize,
        /// Human-readable description of what was wrong.
        reason: String,
    },

    /// An underlying file operation failed.
    ///
    /// Writes are best-effort: the in-memory mutation that triggered the
    /// write stands, and the failure is logged rather than propagated out
    /// of the registry's critical section.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// A `Result` type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Error messages appear in logs and operator output; keep them readable.
    #[test]
    fn test_error_display() {
        let full = Error::LotFull { capacity: 10 };
        assert_eq!(
            full.to_string(),
            "parking lot is full: all 10 spots are occupied"
        );

        let missing = Error::VehicleNotFound {
            plate: "AB12CD".to_string(),
        };
        assert_eq!(missing.to_string(), "no parked vehicle matches plate 'AB12CD'");

        let malformed = Error::MalformedRecord {
            line: 3,
            reason: "expected 3 fields, found 2".to_string(),
        };
        assert_eq!(
            malformed.to_string(),
            "malformed record on line 3: expected 3 fields, found 2"
        );
    }

    /// The `#[from]` attribute on `Error::Io` lets `?` convert io errors.
    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let our_err: Error = io_err.into();
        assert!(matches!(our_err, Error::Io(_)));
        assert!(our_err.to_string().contains("i/o error"));
    }
}
