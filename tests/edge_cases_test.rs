mod common;

use lotkeeper::{ParkingLot, Vehicle};

/// A snapshot with one well-formed line and one line with only two fields
/// loads without crashing, keeping only the well-formed spot occupied.
#[test]
fn malformed_line_is_skipped_not_fatal() {
    let (_dir, config) = common::temp_lot_config(3);
    common::write_state_lines(&config, &["1|Car|GOOD1", "2|Bike"]);

    let lot = ParkingLot::open(config);
    let status = lot.status();

    assert_eq!(status[0].occupant().map(Vehicle::plate), Some("GOOD1"));
    assert!(status[1].is_available());
    assert_eq!(lot.occupied_count(), 1);
}

/// Each flavor of rot is skipped independently; the one sound record
/// survives them all.
#[test]
fn every_malformed_flavor_is_tolerated() {
    let (_dir, config) = common::temp_lot_config(3);
    common::write_state_lines(
        &config,
        &[
            "",                 // blank line
            "not a record",     // one field
            "x|Car|NOPE1",      // non-numeric spot id
            "0|Car|NOPE2",      // zero spot id
            "2|Boat|NOPE3",     // unknown category
            "2|Car|   ",        // blank plate
            "1|Car|GOOD1|junk", // four fields
            "3|Truck|GOOD2",    // the survivor
        ],
    );

    let lot = ParkingLot::open(config);
    let status = lot.status();

    assert!(status[0].is_available());
    assert!(status[1].is_available());
    assert_eq!(status[2].occupant().map(Vehicle::plate), Some("GOOD2"));
    assert_eq!(lot.occupied_count(), 1);
}

/// A spot id beyond the configured capacity is ignored with a warning; the
/// lot is not resized to fit the stale record.
#[test]
fn out_of_range_spot_is_ignored() {
    let (_dir, config) = common::temp_lot_config(2);
    common::write_state_lines(&config, &["1|Car|KEEP1", "7|Car|STALE1"]);

    let lot = ParkingLot::open(config);
    assert_eq!(lot.occupied_count(), 1);
    assert_eq!(lot.status()[0].occupant().map(Vehicle::plate), Some("KEEP1"));
}

/// Duplicate records for the same spot should not occur, but when they do
/// the later record wins.
#[test]
fn duplicate_spot_record_last_wins() {
    let (_dir, config) = common::temp_lot_config(2);
    common::write_state_lines(&config, &["1|Car|FIRST1", "1|Bike|SECOND1"]);

    let lot = ParkingLot::open(config);
    let status = lot.status();

    assert_eq!(status[0].occupant().map(Vehicle::plate), Some("SECOND1"));
    assert_eq!(lot.occupied_count(), 1);
}

/// Categories in the snapshot parse case-insensitively; the rewrite
/// canonicalizes them.
#[test]
fn category_labels_are_canonicalized_on_rewrite() {
    let (_dir, config) = common::temp_lot_config(2);
    common::write_state_lines(&config, &["1|car|LOW1", "2|TRUCK|UP1"]);

    let lot = ParkingLot::open(config.clone());
    assert_eq!(lot.occupied_count(), 2);

    // Any mutation rewrites the whole file in canonical form.
    lot.park(common::bike("X")).unwrap_err(); // full lot, no rewrite yet
    lot.remove("LOW1").unwrap();
    assert_eq!(common::read_state_lines(&config), vec!["2|Truck|UP1"]);
}

/// The capacity file feeds the facade: a valid value sizes the lot, a
/// broken one falls back to the default of 10.
#[test]
fn capacity_config_drives_lot_size() {
    let dir = tempfile::TempDir::new().expect("create temp dir");

    common::write_capacity(dir.path(), "3");
    let config = lotkeeper::LotConfig::load(dir.path());
    assert_eq!(ParkingLot::open(config).capacity(), 3);

    common::write_capacity(dir.path(), "many");
    let config = lotkeeper::LotConfig::load(dir.path());
    assert_eq!(ParkingLot::open(config).capacity(), 10);
}
