//! # Domain Types for Lotkeeper
//!
//! This module defines the core types used throughout the engine: spots,
//! vehicle categories, license plates, and vehicles.
//!
//! ## Design Philosophy: Newtypes for Safety
//!
//! We use the "newtype pattern" for identifiers - wrapping primitive types in
//! single-field structs. This provides:
//!
//! - **Type safety**: Can't accidentally pass a raw count where a [`SpotId`]
//!   is expected
//! - **Self-documenting code**: Function signatures tell you what they expect
//! - **Encapsulation**: Validation happens once, at construction
//!
//! ## Invariants
//!
//! - [`SpotId`]: positive, contiguous `1..=N` within a registry, immutable
//!   after creation
//! - [`LicensePlate`]: trimmed and upper-cased at construction, never blank
//! - [`Spot::occupant`]: mutated only through [`Spot::park`] / [`Spot::clear`]

use std::fmt;

use crate::error::{Error, Result};

// =============================================================================
// Spot Identification
// =============================================================================

/// The stable numeric identifier of a parking spot.
///
/// Spot ids are assigned at registry construction as a contiguous run
/// starting at 1, and never change for the lifetime of the process. Zero is
/// invalid; the snapshot format stores ids as plain positive integers and a
/// zero would mean a corrupted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpotId(u32);

impl SpotId {
    /// The first spot in any lot (1, not 0).
    ///
    /// Starting at 1 matches the on-disk snapshot records and the signage
    /// painted on actual parking spots.
    pub const FIRST: SpotId = SpotId(1);

    /// Creates a SpotId from a raw value.
    ///
    /// # Panics
    ///
    /// Panics if `value` is 0. Snapshot parsing rejects zero before this is
    /// ever reached; hitting the assert means a bug in the caller.
    pub fn from_raw(value: u32) -> Self {
        assert!(value > 0, "SpotId cannot be zero");
        Self(value)
    }

    /// Returns the raw u32 value for display and persistence.
    pub fn as_raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Vehicle Category
// =============================================================================

/// The category tag attached to a parked vehicle.
///
/// This is a closed set: billing is flat-rate, so no behavior varies by
/// category and the tag exists purely for record keeping. Adding a category
/// means adding a variant here and a label below - the compiler then points
/// at every match that needs updating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleCategory {
    Car,
    Bike,
    Truck,
}

impl VehicleCategory {
    /// All categories, in display order.
    pub const ALL: [VehicleCategory; 3] = [
        VehicleCategory::Car,
        VehicleCategory::Bike,
        VehicleCategory::Truck,
    ];

    /// The canonical label, as written into snapshot records.
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::Car => "Car",
            VehicleCategory::Bike => "Bike",
            VehicleCategory::Truck => "Truck",
        }
    }

    /// Parses a label case-insensitively.
    ///
    /// Snapshot files may have been hand-edited, so `car`, `CAR`, and `Car`
    /// all resolve. Returns `None` for anything outside the closed set;
    /// the store turns that into a skipped record, not an error.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "car" => Some(VehicleCategory::Car),
            "bike" => Some(VehicleCategory::Bike),
            "truck" => Some(VehicleCategory::Truck),
            _ => None,
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// License Plates
// =============================================================================

/// A normalized license plate.
///
/// Plates are the lookup key for release and for ticket tracking, and the
/// outside world is sloppy about case and whitespace. Normalizing once at
/// construction (trim + upper-case) means every later comparison is a plain
/// equality check - there is no "case-insensitive compare" scattered through
/// the codebase to forget.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LicensePlate(String);

impl LicensePlate {
    /// Normalizes and validates a raw plate string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPlate`] if the input is empty or all whitespace
    /// after trimming. This is a constructor-time validation result, not a
    /// panic: an unusable plate is an expected caller mistake.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(Error::EmptyPlate);
        }
        Ok(Self(normalized))
    }

    /// Returns the normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LicensePlate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Vehicles
// =============================================================================

/// The immutable identity of an occupant: normalized plate plus category.
///
/// A `Vehicle` is owned by whichever [`Spot`] currently holds it, or by an
/// active ticket; it is handed back to the caller on release. There is no
/// shared ownership and no interior mutability - the record never changes
/// once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    plate: LicensePlate,
    category: VehicleCategory,
}

impl Vehicle {
    /// Builds a vehicle record from a raw plate and a category.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPlate`] when the plate is blank after trimming.
    pub fn new(raw_plate: &str, category: VehicleCategory) -> Result<Self> {
        Ok(Self {
            plate: LicensePlate::parse(raw_plate)?,
            category,
        })
    }

    /// The normalized plate string.
    pub fn plate(&self) -> &str {
        self.plate.as_str()
    }

    /// The category tag.
    pub fn category(&self) -> VehicleCategory {
        self.category
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.category, self.plate)
    }
}

// =============================================================================
// Spots
// =============================================================================

/// A single allocatable spot with a stable id.
///
/// Spots are created at registry construction and never destroyed during the
/// process lifetime. Only the occupant changes, and only via [`Spot::park`]
/// and [`Spot::clear`]. The type is `Clone` so `status` can hand out an
/// owned snapshot of the whole lot taken at one consistent instant.
#[derive(Debug, Clone)]
pub struct Spot {
    id: SpotId,
    occupant: Option<Vehicle>,
}

impl Spot {
    /// Creates a free spot with the given id.
    pub fn new(id: SpotId) -> Self {
        Self { id, occupant: None }
    }

    /// The spot's stable id.
    pub fn id(&self) -> SpotId {
        self.id
    }

    /// True when no vehicle occupies the spot.
    pub fn is_available(&self) -> bool {
        self.occupant.is_none()
    }

    /// The current occupant, if any.
    pub fn occupant(&self) -> Option<&Vehicle> {
        self.occupant.as_ref()
    }

    /// Binds a vehicle to the spot if it is free.
    ///
    /// Returns `false` (and leaves the spot untouched) when already
    /// occupied. The registry checks availability before calling this, but
    /// the double-check keeps the spot itself unable to double-book.
    pub fn park(&mut self, vehicle: Vehicle) -> bool {
        if self.occupant.is_some() {
            return false;
        }
        self.occupant = Some(vehicle);
        true
    }

    /// Removes and returns the occupant, freeing the spot.
    pub fn clear(&mut self) -> Option<Vehicle> {
        self.occupant.take()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_id_basics() {
        let id = SpotId::from_raw(7);
        assert_eq!(id.as_raw(), 7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(SpotId::FIRST.as_raw(), 1);
    }

    #[test]
    #[should_panic(expected = "SpotId cannot be zero")]
    fn test_spot_id_zero_panics() {
        SpotId::from_raw(0);
    }

    #[test]
    fn test_plate_normalization() {
        let plate = LicensePlate::parse("  ab12cd ").unwrap();
        assert_eq!(plate.as_str(), "AB12CD");

        // Already normalized input passes through unchanged.
        let same = LicensePlate::parse("AB12CD").unwrap();
        assert_eq!(plate, same);
    }

    #[test]
    fn test_blank_plate_rejected() {
        assert!(matches!(LicensePlate::parse(""), Err(Error::EmptyPlate)));
        assert!(matches!(LicensePlate::parse("   "), Err(Error::EmptyPlate)));
        assert!(matches!(
            Vehicle::new("\t", VehicleCategory::Car),
            Err(Error::EmptyPlate)
        ));
    }

    #[test]
    fn test_category_labels_round_trip() {
        for category in VehicleCategory::ALL {
            assert_eq!(VehicleCategory::from_label(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!(VehicleCategory::from_label("CAR"), Some(VehicleCategory::Car));
        assert_eq!(VehicleCategory::from_label(" bike "), Some(VehicleCategory::Bike));
        assert_eq!(VehicleCategory::from_label("tRuCk"), Some(VehicleCategory::Truck));
        assert_eq!(VehicleCategory::from_label("boat"), None);
        assert_eq!(VehicleCategory::from_label(""), None);
    }

    #[test]
    fn test_spot_park_and_clear() {
        let mut spot = Spot::new(SpotId::from_raw(1));
        assert!(spot.is_available());

        let car = Vehicle::new("XY1", VehicleCategory::Car).unwrap();
        assert!(spot.park(car.clone()));
        assert!(!spot.is_available());
        assert_eq!(spot.occupant(), Some(&car));

        // A second park on an occupied spot is refused outright.
        let bike = Vehicle::new("ZZ9", VehicleCategory::Bike).unwrap();
        assert!(!spot.park(bike));
        assert_eq!(spot.occupant().map(Vehicle::plate), Some("XY1"));

        let freed = spot.clear();
        assert_eq!(freed, Some(car));
        assert!(spot.is_available());
        assert_eq!(spot.clear(), None);
    }

    #[test]
    fn test_vehicle_display() {
        let truck = Vehicle::new("hgv 77", VehicleCategory::Truck).unwrap();
        assert_eq!(truck.to_string(), "Truck (HGV 77)");
    }
}
