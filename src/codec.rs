//! # Line Formats and Parsing
//!
//! This module owns the on-disk text formats. Everything the engine persists
//! is a newline-terminated, pipe-delimited line:
//!
//! ```text
//! lot_state.txt   3|Car|AB12CD                                  (snapshot)
//! logs.txt        2026-08-06 14:02:11 | PARK | Car (AB12CD) ...  (audit)
//! tickets.txt     AB12CD | 2026-08-06 14:02:11 | 2026-08-06 15:40:00 | $10.00
//! ```
//!
//! Only the snapshot format is ever parsed back; the two logs are
//! write-only. Parsing returns typed [`Error::MalformedRecord`] values so
//! the store can decide what "malformed" means operationally (skip with a
//! warning, never abort the load).

use chrono::{DateTime, Local};

use crate::error::{Error, Result};
use crate::types::{SpotId, Vehicle, VehicleCategory};

/// Field separator inside snapshot records.
pub const FIELD_SEPARATOR: char = '|';

/// Wall-clock timestamp layout shared by the audit and ticket logs.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a timestamp the way both logs expect it.
pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

// =============================================================================
// Snapshot Records
// =============================================================================

/// One parsed line of the occupancy snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyRecord {
    /// The spot the vehicle was parked in.
    pub spot_id: SpotId,
    /// The reconstructed occupant.
    pub vehicle: Vehicle,
}

/// Encodes an occupied spot as a snapshot line (no trailing newline).
pub fn encode_occupancy(spot_id: SpotId, vehicle: &Vehicle) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        spot_id,
        vehicle.category(),
        vehicle.plate(),
        sep = FIELD_SEPARATOR,
    )
}

/// Parses one snapshot line.
///
/// Returns `Ok(None)` for blank lines (they carry no record and are not an
/// error). Everything else must be exactly three fields: spot id, category
/// label, plate.
///
/// # Errors
///
/// [`Error::MalformedRecord`] with a reason naming the broken field. The
/// caller decides whether that is fatal; during snapshot load it never is.
pub fn parse_occupancy(line_number: usize, line: &str) -> Result<Option<OccupancyRecord>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = trimmed.split(FIELD_SEPARATOR).collect();
    if fields.len() != 3 {
        return Err(malformed(
            line_number,
            format!("expected 3 fields, found {}", fields.len()),
        ));
    }

    let raw_id = fields[0].trim();
    let spot_id = match raw_id.parse::<u32>() {
        Ok(value) if value > 0 => SpotId::from_raw(value),
        Ok(_) => return Err(malformed(line_number, "spot id must be positive".to_string())),
        Err(_) => {
            return Err(malformed(
                line_number,
                format!("spot id '{raw_id}' is not a number"),
            ))
        }
    };

    let category = VehicleCategory::from_label(fields[1]).ok_or_else(|| {
        malformed(
            line_number,
            format!("unknown vehicle category '{}'", fields[1].trim()),
        )
    })?;

    let vehicle = Vehicle::new(fields[2], category)
        .map_err(|_| malformed(line_number, "empty license plate".to_string()))?;

    Ok(Some(OccupancyRecord { spot_id, vehicle }))
}

fn malformed(line: usize, reason: String) -> Error {
    Error::MalformedRecord { line, reason }
}

// =============================================================================
// Log Lines
// =============================================================================

/// Formats an audit log line: `<timestamp> | <ACTION> | <message>`.
pub fn format_event_line(ts: &DateTime<Local>, action: &str, message: &str) -> String {
    format!("{} | {} | {}", format_timestamp(ts), action, message)
}

/// Formats a closed-ticket line: `<PLATE> | <entry> | <exit> | $<cost>`.
///
/// The cost is always rendered with two decimals; the billing math rounds
/// before it gets here, so the rendering never truncates anything real.
pub fn format_ticket_line(
    plate: &str,
    entry: &DateTime<Local>,
    exit: &DateTime<Local>,
    cost: f64,
) -> String {
    format!(
        "{} | {} | {} | ${:.2}",
        plate,
        format_timestamp(entry),
        format_timestamp(exit),
        cost,
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn car(plate: &str) -> Vehicle {
        Vehicle::new(plate, VehicleCategory::Car).unwrap()
    }

    #[test]
    fn test_occupancy_round_trip() {
        let vehicle = car("ab12cd");
        let line = encode_occupancy(SpotId::from_raw(3), &vehicle);
        assert_eq!(line, "3|Car|AB12CD");

        let record = parse_occupancy(1, &line).unwrap().unwrap();
        assert_eq!(record.spot_id.as_raw(), 3);
        assert_eq!(record.vehicle, vehicle);
    }

    #[test]
    fn test_blank_lines_are_not_records() {
        assert_eq!(parse_occupancy(1, "").unwrap(), None);
        assert_eq!(parse_occupancy(2, "   \t").unwrap(), None);
    }

    #[test]
    fn test_field_whitespace_tolerated() {
        // Hand-edited files tend to grow stray spaces around the pipes.
        let record = parse_occupancy(1, " 2 | bike | zz9 ").unwrap().unwrap();
        assert_eq!(record.spot_id.as_raw(), 2);
        assert_eq!(record.vehicle.category(), VehicleCategory::Bike);
        assert_eq!(record.vehicle.plate(), "ZZ9");
    }

    #[test]
    fn test_wrong_field_count_rejected() {
        let err = parse_occupancy(4, "3|Car").unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed record on line 4: expected 3 fields, found 2"
        );

        let err = parse_occupancy(5, "3|Car|AB12CD|extra").unwrap_err();
        assert!(err.to_string().contains("found 4"));
    }

    #[test]
    fn test_bad_spot_id_rejected() {
        let err = parse_occupancy(1, "x|Car|AB12CD").unwrap_err();
        assert!(err.to_string().contains("is not a number"));

        let err = parse_occupancy(2, "0|Car|AB12CD").unwrap_err();
        assert!(err.to_string().contains("must be positive"));

        let err = parse_occupancy(3, "-1|Car|AB12CD").unwrap_err();
        assert!(err.to_string().contains("is not a number"));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = parse_occupancy(1, "1|Boat|AB12CD").unwrap_err();
        assert!(err.to_string().contains("unknown vehicle category 'Boat'"));
    }

    #[test]
    fn test_empty_plate_rejected() {
        let err = parse_occupancy(1, "1|Car|  ").unwrap_err();
        assert!(err.to_string().contains("empty license plate"));
    }

    #[test]
    fn test_log_line_formats() {
        let ts = Local.with_ymd_and_hms(2026, 8, 6, 14, 2, 11).unwrap();
        assert_eq!(
            format_event_line(&ts, "PARK", "Car (AB12CD) grabbed spot 3"),
            "2026-08-06 14:02:11 | PARK | Car (AB12CD) grabbed spot 3"
        );

        let exit = Local.with_ymd_and_hms(2026, 8, 6, 15, 40, 0).unwrap();
        assert_eq!(
            format_ticket_line("AB12CD", &ts, &exit, 10.0),
            "AB12CD | 2026-08-06 14:02:11 | 2026-08-06 15:40:00 | $10.00"
        );
    }
}
