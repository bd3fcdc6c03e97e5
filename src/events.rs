//! # Audit Event Log
//!
//! Append-only trail of what happened to the lot: one line per event,
//! `<timestamp> | <ACTION> | <message>`. The log exists for observability -
//! it is never read back by the engine, and writing it is best-effort by
//! contract. An audit line that fails to land is worth a warning, never a
//! failed parking operation.
//!
//! Ordering between appends is handled by the filesystem: every append opens
//! the file in `O_APPEND` mode and writes one line in a single call, which
//! the OS serializes. No lock of our own is needed here.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use tracing::warn;

use crate::codec;
use crate::error::Result;

// =============================================================================
// Event Kinds
// =============================================================================

/// The action recorded by an audit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A vehicle was allocated a spot.
    Park,
    /// A vehicle was released from its spot.
    Remove,
    /// A payment was confirmed for a closed ticket.
    Payment,
}

impl EventKind {
    /// The ACTION token written into the log line.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Park => "PARK",
            EventKind::Remove => "REMOVE",
            EventKind::Payment => "PAYMENT",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Event Log
// =============================================================================

/// Append-only writer for the audit trail.
#[derive(Debug)]
pub struct EventLog {
    /// Log file path; `None` disables the log (ephemeral instances).
    path: Option<PathBuf>,
}

impl EventLog {
    /// A log backed by the given file, created on first append.
    pub fn on_disk(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A log that drops every event (ephemeral instances).
    pub fn ephemeral() -> Self {
        Self { path: None }
    }

    /// Appends one event line stamped with the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Propagates the underlying I/O failure so the caller can decide how
    /// loudly to complain. Callers inside the engine log it and move on.
    pub fn append(&self, kind: EventKind, message: &str) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let line = codec::format_event_line(&Local::now(), kind.as_str(), message);
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Records a confirmed payment: `<PLATE> settled $<amount>`.
    ///
    /// This is the entry point the payment dialogue calls after collecting
    /// the computed cost. It never returns an error - a lost audit line must
    /// not unwind a payment that already happened.
    pub fn record_payment(&self, plate: &str, amount: f64) {
        let message = format!("{plate} settled ${amount:.2}");
        if let Err(err) = self.append(EventKind::Payment, &message) {
            warn!(%err, plate, "unable to append payment event");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(EventKind::Park.to_string(), "PARK");
        assert_eq!(EventKind::Remove.to_string(), "REMOVE");
        assert_eq!(EventKind::Payment.to_string(), "PAYMENT");
    }

    #[test]
    fn test_append_writes_one_line_per_event() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs.txt");
        let log = EventLog::on_disk(&path);

        log.append(EventKind::Park, "Car (XY1) grabbed spot 1").unwrap();
        log.append(EventKind::Remove, "XY1 left spot 1").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("| PARK | Car (XY1) grabbed spot 1"));
        assert!(lines[1].ends_with("| REMOVE | XY1 left spot 1"));

        // Timestamp prefix: "yyyy-MM-dd HH:mm:ss | ..."
        assert_eq!(lines[0].as_bytes()[4], b'-');
        assert_eq!(&lines[0][19..22], " | ");
    }

    #[test]
    fn test_record_payment_formats_two_decimals() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs.txt");
        let log = EventLog::on_disk(&path);

        log.record_payment("AB12CD", 12.5);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.trim_end().ends_with("| PAYMENT | AB12CD settled $12.50"));
    }

    #[test]
    fn test_ephemeral_log_drops_events() {
        let log = EventLog::ephemeral();
        log.append(EventKind::Park, "nobody will read this").unwrap();
        log.record_payment("NOPE", 1.0);
    }
}
