use visit_report::inventory::{
    self, FieldValue, InventoryRow, InventorySummary, RawInventoryRow, RawOtherUse,
};

// Helper function to check the sanitizer against one input
fn assert_sanitized(value: FieldValue, expected: u64) {
    let got = inventory::sanitize_count(&value);
    assert_eq!(got, expected, "sanitize({:?}) should be {}", value, expected);

    println!("✓ sanitize({:?}) = {} as expected", value, got);
}

fn assert_row_totals(row: &InventoryRow, other_use: u64, spares: u64, total: u64) {
    let totals = inventory::row_totals(row);
    assert_eq!(totals.total_other_use, other_use);
    assert_eq!(totals.spares_auto, spares);
    assert_eq!(totals.row_total, total);

    println!(
        "✓ Row '{}' has totalOtherUse={}, sparesAuto={}, rowTotal={} as expected",
        row.name, totals.total_other_use, totals.spares_auto, totals.row_total
    );
}

// Test the numeric sanitizer against every input class it accepts
fn test_sanitize_count() {
    println!("\n====== Testing sanitize_count ======");

    assert_sanitized(FieldValue::from(""), 0);
    assert_sanitized(FieldValue::from("invalid"), 0);
    assert_sanitized(FieldValue::from(-5), 0);
    assert_sanitized(FieldValue::from("3,000"), 3000);
    assert_sanitized(FieldValue::from("2.7"), 2);
    assert_sanitized(FieldValue::Null, 0);
    assert_sanitized(FieldValue::from("  42  "), 42);
    assert_sanitized(FieldValue::from("1,234,567"), 1234567);
    assert_sanitized(FieldValue::from("-12"), 0);
    assert_sanitized(FieldValue::from(7.9), 7);
    assert_sanitized(FieldValue::Number(f64::NAN), 0);
    assert_sanitized(FieldValue::Number(f64::INFINITY), 0);
}

// Scenario: a filled-in row with plain numbers
fn test_basic_row() {
    println!("\n====== Testing basic row totals ======");

    let mut row = InventoryRow::new("pcs", "PCs", true);
    row.set_count("inUseByEmployees", &FieldValue::from(10));
    row.set_count("training", &FieldValue::from(2));
    row.set_count("conferenceRoom", &FieldValue::from(3));
    row.set_count("gsmOffice", &FieldValue::from(1));
    row.set_count("prospectingStation", &FieldValue::from(1));
    row.set_count("applicantStation", &FieldValue::from(0));
    row.set_count("visitorStation", &FieldValue::from(1));
    row.set_count("other", &FieldValue::from(2));
    row.set_count("sparesOnFloor", &FieldValue::from(5));
    row.set_count("sparesInStorage", &FieldValue::from(3));
    row.set_count("broken", &FieldValue::from(2));

    assert_row_totals(&row, 10, 8, 30);
}

// Scenario: the same pipeline fed the messy strings a real form produces
fn test_string_sanitization_row() {
    println!("\n====== Testing string sanitization through a raw row ======");

    let raw = RawInventoryRow {
        name: Some("Laptops".to_string()),
        in_use_by_employees: Some(FieldValue::from("15")),
        training: Some(FieldValue::from("2.7")),
        conference_room: Some(FieldValue::from("3,000")),
        gsm_office: Some(FieldValue::from("")),
        prospecting_station: Some(FieldValue::from("invalid")),
        applicant_station: Some(FieldValue::from(-5)),
        visitor_station: Some(FieldValue::from("1")),
        other: Some(FieldValue::from("0")),
        spares_on_floor: Some(FieldValue::from("10")),
        spares_in_storage: Some(FieldValue::from("5")),
        broken: Some(FieldValue::from("1")),
        ..Default::default()
    };

    let row = raw.normalize();
    assert_eq!(row.in_use_by_employees, 15);
    assert_eq!(row.conference_room, 3000);
    assert_eq!(row.applicant_station, 0);
    println!("✓ Raw counters normalized correctly");

    assert_row_totals(&row, 3003, 15, 3034);
}

// Scenario: an untouched row contributes nothing anywhere
fn test_all_zero_row() {
    println!("\n====== Testing all-zero row ======");

    let row = InventoryRow::new("monitors", "Monitors", true);
    assert_row_totals(&row, 0, 0, 0);
}

// Scenario: the two-row report summary
fn test_two_row_summary() {
    println!("\n====== Testing two-row summary ======");

    let mut first = InventoryRow::new("pcs", "PCs", true);
    first.set_count("inUseByEmployees", &FieldValue::from(10));
    first.set_count("training", &FieldValue::from(2));
    first.set_count("conferenceRoom", &FieldValue::from(1));
    first.set_count("prospectingStation", &FieldValue::from(1));
    first.set_count("other", &FieldValue::from(1));
    first.set_count("sparesOnFloor", &FieldValue::from(5));
    first.set_count("sparesInStorage", &FieldValue::from(2));
    first.set_count("broken", &FieldValue::from(1));

    let mut second = InventoryRow::new("laptops", "Laptops", true);
    second.set_count("inUseByEmployees", &FieldValue::from(15));
    second.set_count("training", &FieldValue::from(3));
    second.set_count("conferenceRoom", &FieldValue::from(2));
    second.set_count("gsmOffice", &FieldValue::from(1));
    second.set_count("applicantStation", &FieldValue::from(1));
    second.set_count("visitorStation", &FieldValue::from(1));
    second.set_count("sparesOnFloor", &FieldValue::from(3));
    second.set_count("sparesInStorage", &FieldValue::from(4));
    second.set_count("broken", &FieldValue::from(2));

    let rows = vec![first, second];
    let summary = inventory::summarize(&rows);

    assert_eq!(summary.total_in_use, 25);
    assert_eq!(summary.total_other_use, 13);
    assert_eq!(summary.total_spares, 14);
    assert_eq!(summary.total_broken, 3);
    assert_eq!(summary.grand_total, 55);
    println!("✓ Summary over both rows matches expected figures");

    // Row order must not matter to any summary field
    let mut reversed = rows.clone();
    reversed.reverse();
    assert_eq!(inventory::summarize(&reversed), summary);
    println!("✓ Summary unchanged after reordering rows");
}

// Summary of an empty collection is all zeros, not an error
fn test_empty_summary() {
    println!("\n====== Testing empty summary ======");

    let summary = inventory::summarize(&[]);
    assert_eq!(summary, InventorySummary::default());
    println!("✓ Empty collection gives an all-zero summary");
}

// The nested otherUse object from older exports wins over flat fields
fn test_legacy_nested_shape() {
    println!("\n====== Testing legacy nested otherUse shape ======");

    let raw = RawInventoryRow {
        id: Some("pcs".to_string()),
        name: Some("PCs".to_string()),
        training: Some(FieldValue::from(1)),
        other_use: Some(RawOtherUse {
            training: Some(FieldValue::from(9)),
            ..Default::default()
        }),
        ..Default::default()
    };

    let row = raw.normalize();
    assert_eq!(row.id, "pcs");
    assert_eq!(row.training, 9, "nested otherUse.training should win");
    println!("✓ Nested otherUse.training took precedence over the flat field");

    // A raw row with no id gets a fresh one
    let anonymous = RawInventoryRow::default().normalize();
    assert!(!anonymous.id.is_empty());
    println!("✓ Row without an id was assigned one");
}

fn main() {
    println!("=== Inventory Aggregation Test Suite ===");

    test_sanitize_count();
    test_basic_row();
    test_string_sanitization_row();
    test_all_zero_row();
    test_two_row_summary();
    test_empty_summary();
    test_legacy_nested_shape();

    println!("\nAll tests completed.");
}
