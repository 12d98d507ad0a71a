use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A form value exactly as the browser sends it: a number, free text, or
/// null for a field the technician cleared. `sanitize_count` turns any of
/// these into a usable counter.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Null,
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// One tracked equipment type with its usage, spare and broken counts.
/// Counters are already sanitized; raw form data goes through
/// `RawInventoryRow::normalize` before it ever becomes one of these.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRow {
    pub id: String,
    pub name: String,
    pub builtin: bool,
    pub in_use_by_employees: u64,
    pub training: u64,
    pub conference_room: u64,
    pub gsm_office: u64,
    pub prospecting_station: u64,
    pub applicant_station: u64,
    pub visitor_station: u64,
    pub other: u64,
    pub spares_on_floor: u64,
    pub spares_in_storage: u64,
    pub broken: u64,
}

/// Derived per-row figures. Never stored, always recomputed.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RowTotals {
    pub total_other_use: u64,
    pub spares_auto: u64,
    pub row_total: u64,
}

/// Derived figures over the whole row collection.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_in_use: u64,
    pub total_other_use: u64,
    pub total_spares: u64,
    pub total_broken: u64,
    pub grand_total: u64,
}

// Equipment types every report starts with. These rows cannot be deleted.
const BUILTIN_TYPES: [(&str, &str); 6] = [
    ("pcs", "PCs"),
    ("laptops", "Laptops"),
    ("monitors", "Monitors"),
    ("desk-phones", "Desk Phones"),
    ("headsets", "Headsets"),
    ("printers", "Printers"),
];

impl InventoryRow {
    pub fn new(id: &str, name: &str, builtin: bool) -> Self {
        InventoryRow {
            id: id.to_string(),
            name: name.to_string(),
            builtin,
            in_use_by_employees: 0,
            training: 0,
            conference_room: 0,
            gsm_office: 0,
            prospecting_station: 0,
            applicant_station: 0,
            visitor_station: 0,
            other: 0,
            spares_on_floor: 0,
            spares_in_storage: 0,
            broken: 0,
        }
    }

    /// Set one counter by its wire name, sanitizing the incoming value.
    /// Returns false when the name matches no counter.
    pub fn set_count(&mut self, field: &str, value: &FieldValue) -> bool {
        let slot = match field {
            "inUseByEmployees" => &mut self.in_use_by_employees,
            "training" => &mut self.training,
            "conferenceRoom" => &mut self.conference_room,
            "gsmOffice" => &mut self.gsm_office,
            "prospectingStation" => &mut self.prospecting_station,
            "applicantStation" => &mut self.applicant_station,
            "visitorStation" => &mut self.visitor_station,
            "other" => &mut self.other,
            "sparesOnFloor" => &mut self.spares_on_floor,
            "sparesInStorage" => &mut self.spares_in_storage,
            "broken" => &mut self.broken,
            _ => return false,
        };
        *slot = sanitize_count(value);
        true
    }
}

/// Coerce an arbitrary form value into a non-negative whole count.
///
/// Strings are trimmed and stripped of thousands-separator commas before
/// parsing; an empty string parses to 0. Anything that does not come out as
/// a finite, non-negative number becomes 0, and fractional counts truncate
/// toward zero. Total over all inputs: this never fails, because the form
/// must always be able to render a number.
pub fn sanitize_count(value: &FieldValue) -> u64 {
    match value {
        FieldValue::Null => 0,
        FieldValue::Number(n) => clamp_count(*n),
        FieldValue::Text(s) => {
            let cleaned = s.trim().replace(',', "");
            if cleaned.is_empty() {
                return 0;
            }
            match cleaned.parse::<f64>() {
                Ok(n) => clamp_count(n),
                Err(_) => 0,
            }
        }
    }
}

fn clamp_count(n: f64) -> u64 {
    if !n.is_finite() || n < 0.0 {
        0
    } else {
        n.trunc() as u64
    }
}

fn sanitize_opt(value: Option<&FieldValue>) -> u64 {
    value.map(sanitize_count).unwrap_or(0)
}

/// Compute the derived figures for one row. Sanitized counters can sit at
/// `u64::MAX` (an oversized numeric string saturates on parse), so every sum
/// saturates too; a total is never allowed to panic.
pub fn row_totals(row: &InventoryRow) -> RowTotals {
    let total_other_use = row
        .training
        .saturating_add(row.conference_room)
        .saturating_add(row.gsm_office)
        .saturating_add(row.prospecting_station)
        .saturating_add(row.applicant_station)
        .saturating_add(row.visitor_station)
        .saturating_add(row.other);
    let spares_auto = row.spares_on_floor.saturating_add(row.spares_in_storage);
    let row_total = row
        .in_use_by_employees
        .saturating_add(total_other_use)
        .saturating_add(spares_auto)
        .saturating_add(row.broken);

    RowTotals {
        total_other_use,
        spares_auto,
        row_total,
    }
}

/// Fold a row collection into the report-level summary. An empty collection
/// gives an all-zero summary; row order does not matter.
pub fn summarize(rows: &[InventoryRow]) -> InventorySummary {
    let mut summary = InventorySummary::default();

    for row in rows {
        let totals = row_totals(row);
        summary.total_in_use = summary.total_in_use.saturating_add(row.in_use_by_employees);
        summary.total_other_use = summary.total_other_use.saturating_add(totals.total_other_use);
        summary.total_spares = summary.total_spares.saturating_add(totals.spares_auto);
        summary.total_broken = summary.total_broken.saturating_add(row.broken);
        summary.grand_total = summary.grand_total.saturating_add(totals.row_total);
    }

    summary
}

/// The seed rows a fresh report starts with, all counters at zero.
pub fn default_rows() -> Vec<InventoryRow> {
    BUILTIN_TYPES
        .iter()
        .map(|(id, name)| InventoryRow::new(id, name, true))
        .collect()
}

/// The seven other-use counters as they appear nested in older exports.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawOtherUse {
    pub training: Option<FieldValue>,
    pub conference_room: Option<FieldValue>,
    pub gsm_office: Option<FieldValue>,
    pub prospecting_station: Option<FieldValue>,
    pub applicant_station: Option<FieldValue>,
    pub visitor_station: Option<FieldValue>,
    pub other: Option<FieldValue>,
}

/// A row as found in exported browser data. Every counter may be absent,
/// string-typed, or negative, and the seven other-use counters may sit in a
/// nested `otherUse` object (the older export shape) instead of at the top
/// level. Nested values win when both are present.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawInventoryRow {
    pub id: Option<String>,
    pub name: Option<String>,
    pub builtin: Option<bool>,
    pub in_use_by_employees: Option<FieldValue>,
    pub training: Option<FieldValue>,
    pub conference_room: Option<FieldValue>,
    pub gsm_office: Option<FieldValue>,
    pub prospecting_station: Option<FieldValue>,
    pub applicant_station: Option<FieldValue>,
    pub visitor_station: Option<FieldValue>,
    pub other: Option<FieldValue>,
    pub other_use: Option<RawOtherUse>,
    pub spares_on_floor: Option<FieldValue>,
    pub spares_in_storage: Option<FieldValue>,
    pub broken: Option<FieldValue>,
}

impl RawInventoryRow {
    /// Map any accepted export shape onto one canonical row. Rows without a
    /// usable id get a fresh one.
    pub fn normalize(&self) -> InventoryRow {
        let nested = self.other_use.clone().unwrap_or_default();
        let pick = |nested: Option<&FieldValue>, flat: Option<&FieldValue>| {
            sanitize_opt(nested.or(flat))
        };

        InventoryRow {
            id: self
                .id
                .clone()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: self.name.clone().unwrap_or_default(),
            builtin: self.builtin.unwrap_or(false),
            in_use_by_employees: sanitize_opt(self.in_use_by_employees.as_ref()),
            training: pick(nested.training.as_ref(), self.training.as_ref()),
            conference_room: pick(nested.conference_room.as_ref(), self.conference_room.as_ref()),
            gsm_office: pick(nested.gsm_office.as_ref(), self.gsm_office.as_ref()),
            prospecting_station: pick(
                nested.prospecting_station.as_ref(),
                self.prospecting_station.as_ref(),
            ),
            applicant_station: pick(
                nested.applicant_station.as_ref(),
                self.applicant_station.as_ref(),
            ),
            visitor_station: pick(nested.visitor_station.as_ref(), self.visitor_station.as_ref()),
            other: pick(nested.other.as_ref(), self.other.as_ref()),
            spares_on_floor: sanitize_opt(self.spares_on_floor.as_ref()),
            spares_in_storage: sanitize_opt(self.spares_in_storage.as_ref()),
            broken: sanitize_opt(self.broken.as_ref()),
        }
    }
}
