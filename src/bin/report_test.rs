use visit_report::closet::{DeviceKind, RackDevice};
use visit_report::inventory::FieldValue;
use visit_report::report::{RecyclingStatus, ReportError, Severity, VisitReport};
use visit_report::saving;

// Custom equipment types: add, edit, delete, and the validation around them
fn test_custom_row_lifecycle() {
    println!("\n====== Testing custom row lifecycle ======");

    let mut report = VisitReport::new();
    let seeded = report.inventory.len();
    assert!(seeded > 0, "a fresh report should carry the built-in rows");

    // A blank name must be rejected without creating a row
    let err = report.add_custom_row("   ").unwrap_err();
    assert_eq!(err, ReportError::MissingField("equipment type name"));
    assert_eq!(report.inventory.len(), seeded);
    println!("✓ Blank name rejected, no row created");

    let id = report.add_custom_row("Projectors").unwrap().id.clone();
    assert_eq!(report.inventory.len(), seeded + 1);
    println!("✓ Custom row added");

    let totals = report
        .update_row_field(&id, "inUseByEmployees", &FieldValue::from("4"))
        .unwrap();
    assert_eq!(totals.row_total, 4);
    println!("✓ Field update returned fresh totals");

    // Unknown field and unknown id both surface as errors
    assert_eq!(
        report.update_row_field(&id, "sparesInGarage", &FieldValue::from(1)),
        Err(ReportError::UnknownField("sparesInGarage".to_string()))
    );
    assert_eq!(
        report.update_row_field("nope", "broken", &FieldValue::from(1)),
        Err(ReportError::UnknownId("nope".to_string()))
    );
    println!("✓ Unknown field and unknown id rejected");

    // Renaming keeps the rest of the row intact
    report
        .update_row_field(&id, "name", &FieldValue::from("Projectors (HDMI)"))
        .unwrap();
    let row = report.row(&id).unwrap();
    assert_eq!(row.name, "Projectors (HDMI)");
    assert_eq!(row.in_use_by_employees, 4);
    println!("✓ Rename left counters untouched");

    // Built-in rows cannot be deleted; custom rows can
    let builtin_id = report.inventory[0].id.clone();
    assert_eq!(report.delete_row(&builtin_id), Err(ReportError::ProtectedRow));
    report.delete_row(&id).unwrap();
    assert!(report.row(&id).is_none());
    println!("✓ Built-in row protected, custom row deleted");
}

// Issues, repairs, recommendations and recycling share the same contract
fn test_tracking_sections() {
    println!("\n====== Testing tracking sections ======");

    let mut report = VisitReport::new();

    assert_eq!(
        report.add_issue("", Severity::High, None).unwrap_err(),
        ReportError::MissingField("issue description")
    );
    println!("✓ Blank issue rejected");

    let issue_id = report
        .add_issue("Switch port 12 dead", Severity::High, None)
        .unwrap()
        .id
        .clone();
    report.set_issue_resolved(&issue_id, true).unwrap();
    assert!(report.issues[0].resolved);
    report.delete_issue(&issue_id).unwrap();
    assert!(report.issues.is_empty());
    println!("✓ Issue add/resolve/delete");

    let repair_id = report
        .add_repair("Reseated patch panel B")
        .unwrap()
        .id
        .clone();
    report.set_repair_completed(&repair_id, true, None).unwrap();
    assert!(report.repairs[0].completed);

    // An accidental completion can be undone
    report.set_repair_completed(&repair_id, false, None).unwrap();
    assert!(!report.repairs[0].completed);
    assert_eq!(report.repairs[0].completed_on, None);
    println!("✓ Repair add/complete/undo");

    report.add_recommendation("Replace UPS batteries").unwrap();
    assert_eq!(report.recommendations.len(), 1);
    println!("✓ Recommendation added");

    // Recycling quantities take raw form input
    let entry_id = report
        .add_recycling("CRT monitors", &FieldValue::from("1,200"), None)
        .unwrap()
        .id
        .clone();
    assert_eq!(report.recycling[0].quantity, 1200);
    assert_eq!(report.recycling[0].status, RecyclingStatus::AwaitingPickup);

    report
        .set_recycling_status(&entry_id, RecyclingStatus::Recycled)
        .unwrap();
    assert_eq!(report.recycling[0].status, RecyclingStatus::Recycled);
    println!("✓ Recycling entry logged with sanitized quantity");

    assert_eq!(
        report.delete_recycling("missing"),
        Err(ReportError::UnknownId("missing".to_string()))
    );
    println!("✓ Deleting a missing entry rejected");
}

// Rack placement rules and the usage figures
fn test_data_closet() {
    println!("\n====== Testing data closet ======");

    let mut report = VisitReport::new();

    assert_eq!(
        report.closet.add_rack("", 42, 24).unwrap_err(),
        ReportError::MissingField("rack name")
    );

    let rack_id = report.closet.add_rack("Rack A", 42, 24).unwrap().id.clone();
    println!("✓ Rack added");

    report
        .closet
        .mount_device(
            &rack_id,
            RackDevice::new("Core switch", DeviceKind::Switch, 1, 1, None),
        )
        .unwrap();
    report
        .closet
        .mount_device(
            &rack_id,
            RackDevice::new("File server", DeviceKind::Server, 2, 4, Some(2)),
        )
        .unwrap();
    println!("✓ Devices mounted");

    // Overlapping and out-of-bounds placements must be rejected
    let overlap = report.closet.mount_device(
        &rack_id,
        RackDevice::new("Rogue server", DeviceKind::Server, 3, 2, None),
    );
    assert_eq!(overlap, Err(ReportError::UnitOverlap(2, 5)));

    let outside = report.closet.mount_device(
        &rack_id,
        RackDevice::new("Tall UPS", DeviceKind::Ups, 41, 4, None),
    );
    assert_eq!(outside, Err(ReportError::DeviceDoesNotFit));
    println!("✓ Overlap and out-of-bounds placements rejected");

    let rack = report.closet.rack(&rack_id).unwrap();
    let usage = rack.usage();
    assert_eq!(usage.units_used, 5);
    assert_eq!(usage.units_free, 37);
    assert_eq!(usage.power_ports_used, 3); // switch default 1 + server's recorded 2
    assert_eq!(usage.power_ports_free, 21);
    println!("✓ Usage figures correct");

    let device_id = rack.devices[0].id.clone();
    report.closet.unmount_device(&rack_id, &device_id).unwrap();
    assert_eq!(report.closet.rack(&rack_id).unwrap().devices.len(), 1);
    println!("✓ Device unmounted");
}

// Snapshot persistence round-trip
fn test_save_and_load() -> std::io::Result<()> {
    println!("\n====== Testing save and load ======");

    let dir = tempfile::tempdir()?;

    let mut report = VisitReport::new();
    report.update_site(Some("Springfield office"), Some("R. Smith"), None);
    report.add_custom_row("Projectors").unwrap();
    report
        .update_row_field("pcs", "inUseByEmployees", &FieldValue::from(12))
        .unwrap();
    report
        .add_issue("Loose floor tile by rack", Severity::Low, None)
        .unwrap();

    let path = saving::report_path(dir.path(), saving::STORAGE_KEY);
    saving::save_report(&report, &path)?;
    assert!(path.exists(), "snapshot file should exist");

    let loaded = saving::load_report(&path)?;
    assert_eq!(loaded, report);
    assert_eq!(loaded.summary(), report.summary());
    println!("✓ File snapshot round-trip preserved the report");

    let bytes = saving::snapshot_to_bytes(&report)?;
    let from_bytes = saving::snapshot_from_bytes(&bytes)?;
    assert_eq!(from_bytes, report);
    println!("✓ In-memory snapshot round-trip preserved the report");

    assert!(saving::is_valid_report_name("site-42_final"));
    assert!(!saving::is_valid_report_name("../escape"));
    assert!(!saving::is_valid_report_name(""));
    println!("✓ Report name validation");

    Ok(())
}

fn main() {
    println!("=== Visit Report Test Suite ===");

    test_custom_row_lifecycle();
    test_tracking_sections();
    test_data_closet();

    if let Err(e) = test_save_and_load() {
        eprintln!("save/load test failed: {}", e);
        std::process::exit(1);
    }

    println!("\nAll tests completed.");
}
