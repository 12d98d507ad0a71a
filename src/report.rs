use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::closet::DataCloset;
use crate::inventory::{
    self, FieldValue, InventoryRow, InventorySummary, RawInventoryRow, RowTotals,
};

/// Everything a report operation can reject. These surface to the form as
/// in-app notification text, never as a crash.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("no entry with id '{0}'")]
    UnknownId(String),
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("built-in equipment types cannot be deleted")]
    ProtectedRow,
    #[error("device does not fit inside the rack")]
    DeviceDoesNotFit,
    #[error("rack units {0} through {1} are already occupied")]
    UnitOverlap(u64, u64),
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssueEntry {
    pub id: String,
    pub description: String,
    pub severity: Severity,
    pub resolved: bool,
    pub noted_on: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepairEntry {
    pub id: String,
    pub description: String,
    pub completed: bool,
    pub completed_on: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub description: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecyclingStatus {
    AwaitingPickup,
    PickedUp,
    Recycled,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecyclingEntry {
    pub id: String,
    pub item: String,
    pub quantity: u64,
    pub status: RecyclingStatus,
    pub logged_on: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    pub office_name: String,
    pub technician: String,
    pub visit_date: Option<NaiveDate>,
}

/// The whole visit report: site info, the inventory row collection, the
/// data closet and the four tracking sections. One editor at a time, every
/// operation synchronous; last write wins.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisitReport {
    pub site: SiteInfo,
    pub inventory: Vec<InventoryRow>,
    pub closet: DataCloset,
    pub issues: Vec<IssueEntry>,
    pub repairs: Vec<RepairEntry>,
    pub recommendations: Vec<Recommendation>,
    pub recycling: Vec<RecyclingEntry>,
}

impl Default for VisitReport {
    fn default() -> Self {
        Self::new()
    }
}

fn remove_by_id<T>(
    entries: &mut Vec<T>,
    id: &str,
    entry_id: impl Fn(&T) -> &str,
) -> Result<(), ReportError> {
    match entries.iter().position(|e| entry_id(e) == id) {
        Some(pos) => {
            entries.remove(pos);
            Ok(())
        }
        None => Err(ReportError::UnknownId(id.to_string())),
    }
}

fn require_text(text: &str, what: &'static str) -> Result<String, ReportError> {
    let text = text.trim();
    if text.is_empty() {
        Err(ReportError::MissingField(what))
    } else {
        Ok(text.to_string())
    }
}

impl VisitReport {
    pub fn new() -> Self {
        VisitReport {
            site: SiteInfo::default(),
            inventory: inventory::default_rows(),
            closet: DataCloset::default(),
            issues: Vec::new(),
            repairs: Vec::new(),
            recommendations: Vec::new(),
            recycling: Vec::new(),
        }
    }

    /// Partial update of the site header; fields left as None are kept.
    pub fn update_site(
        &mut self,
        office_name: Option<&str>,
        technician: Option<&str>,
        visit_date: Option<NaiveDate>,
    ) {
        if let Some(office_name) = office_name {
            self.site.office_name = office_name.trim().to_string();
        }
        if let Some(technician) = technician {
            self.site.technician = technician.trim().to_string();
        }
        if let Some(visit_date) = visit_date {
            self.site.visit_date = Some(visit_date);
        }
    }

    pub fn summary(&self) -> InventorySummary {
        inventory::summarize(&self.inventory)
    }

    pub fn row(&self, id: &str) -> Option<&InventoryRow> {
        self.inventory.iter().find(|r| r.id == id)
    }

    /// Append a custom equipment type with all counters at zero. A blank
    /// name is rejected and no row is created.
    pub fn add_custom_row(&mut self, name: &str) -> Result<&InventoryRow, ReportError> {
        let name = require_text(name, "equipment type name")?;
        let row = InventoryRow::new(&Uuid::new_v4().to_string(), &name, false);

        self.inventory.push(row);
        Ok(self.inventory.last().unwrap())
    }

    /// Replace exactly one field of one row. Counter values are sanitized
    /// on the way in; every other field of the row is untouched. Returns
    /// the row's fresh derived totals so the form can refresh its display.
    pub fn update_row_field(
        &mut self,
        id: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<RowTotals, ReportError> {
        let row = self
            .inventory
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ReportError::UnknownId(id.to_string()))?;

        if field == "name" {
            match value {
                FieldValue::Text(name) if !name.trim().is_empty() => {
                    row.name = name.trim().to_string();
                }
                _ => return Err(ReportError::MissingField("equipment type name")),
            }
        } else if !row.set_count(field, value) {
            return Err(ReportError::UnknownField(field.to_string()));
        }

        Ok(inventory::row_totals(row))
    }

    /// Remove one row by id. Rows from the built-in seed set are protected.
    pub fn delete_row(&mut self, id: &str) -> Result<(), ReportError> {
        let row = self
            .row(id)
            .ok_or_else(|| ReportError::UnknownId(id.to_string()))?;
        if row.builtin {
            return Err(ReportError::ProtectedRow);
        }

        remove_by_id(&mut self.inventory, id, |r| &r.id)
    }

    /// Swap the whole row collection for normalized copies of `rows`, the
    /// path a legacy browser export takes into the report.
    pub fn import_rows(&mut self, rows: &[RawInventoryRow]) {
        self.inventory = rows.iter().map(RawInventoryRow::normalize).collect();
    }

    pub fn add_issue(
        &mut self,
        description: &str,
        severity: Severity,
        noted_on: Option<NaiveDate>,
    ) -> Result<&IssueEntry, ReportError> {
        let description = require_text(description, "issue description")?;

        self.issues.push(IssueEntry {
            id: Uuid::new_v4().to_string(),
            description,
            severity,
            resolved: false,
            noted_on,
        });
        Ok(self.issues.last().unwrap())
    }

    pub fn set_issue_resolved(&mut self, id: &str, resolved: bool) -> Result<(), ReportError> {
        let issue = self
            .issues
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ReportError::UnknownId(id.to_string()))?;
        issue.resolved = resolved;
        Ok(())
    }

    pub fn delete_issue(&mut self, id: &str) -> Result<(), ReportError> {
        remove_by_id(&mut self.issues, id, |i| &i.id)
    }

    pub fn add_repair(&mut self, description: &str) -> Result<&RepairEntry, ReportError> {
        let description = require_text(description, "repair description")?;

        self.repairs.push(RepairEntry {
            id: Uuid::new_v4().to_string(),
            description,
            completed: false,
            completed_on: None,
        });
        Ok(self.repairs.last().unwrap())
    }

    /// Mark a repair completed or not. Undoing a completion clears the
    /// completion date along with the flag.
    pub fn set_repair_completed(
        &mut self,
        id: &str,
        completed: bool,
        completed_on: Option<NaiveDate>,
    ) -> Result<(), ReportError> {
        let repair = self
            .repairs
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ReportError::UnknownId(id.to_string()))?;
        repair.completed = completed;
        repair.completed_on = if completed { completed_on } else { None };
        Ok(())
    }

    pub fn delete_repair(&mut self, id: &str) -> Result<(), ReportError> {
        remove_by_id(&mut self.repairs, id, |r| &r.id)
    }

    pub fn add_recommendation(&mut self, description: &str) -> Result<&Recommendation, ReportError> {
        let description = require_text(description, "recommendation")?;

        self.recommendations.push(Recommendation {
            id: Uuid::new_v4().to_string(),
            description,
        });
        Ok(self.recommendations.last().unwrap())
    }

    pub fn delete_recommendation(&mut self, id: &str) -> Result<(), ReportError> {
        remove_by_id(&mut self.recommendations, id, |r| &r.id)
    }

    /// Log equipment handed off for recycling. The quantity arrives as raw
    /// form input and is sanitized like any inventory counter.
    pub fn add_recycling(
        &mut self,
        item: &str,
        quantity: &FieldValue,
        logged_on: Option<NaiveDate>,
    ) -> Result<&RecyclingEntry, ReportError> {
        let item = require_text(item, "recycling item")?;

        self.recycling.push(RecyclingEntry {
            id: Uuid::new_v4().to_string(),
            item,
            quantity: inventory::sanitize_count(quantity),
            status: RecyclingStatus::AwaitingPickup,
            logged_on,
        });
        Ok(self.recycling.last().unwrap())
    }

    pub fn set_recycling_status(
        &mut self,
        id: &str,
        status: RecyclingStatus,
    ) -> Result<(), ReportError> {
        let entry = self
            .recycling
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ReportError::UnknownId(id.to_string()))?;
        entry.status = status;
        Ok(())
    }

    pub fn delete_recycling(&mut self, id: &str) -> Result<(), ReportError> {
        remove_by_id(&mut self.recycling, id, |e| &e.id)
    }
}
