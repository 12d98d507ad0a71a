/*!
# RSS Visit Report

A visit-report application for field technicians documenting office-site
visits, built in Rust.

## Overview

Technicians walk an office site and record what they find: equipment
inventory counts, the data-closet rack layout, issues and repairs,
recommendations, and equipment handed off for recycling. This crate keeps
the whole report in memory, derives every displayed total on demand, and
persists snapshots to disk. The browser form binds its inputs to the JSON
API and calls back on every edit to refresh the figures it shows.

## Architecture

The application follows a client-server architecture:

### Frontend Layer
- A browser form whose inputs map one-to-one onto report fields
- Calls the API on each edit and re-renders the returned totals

### Backend Layer
- **Technologies**: Rust, axum (behind the `web` feature)
- **Core Components**:
  - Inventory Aggregator - Sanitizes raw form values and derives per-row
    totals plus the report summary
  - Shape Adapter - Maps legacy browser-export row shapes onto canonical
    rows before any arithmetic sees them
  - Report State - The row collection, data closet and tracking sections,
    with validated CRUD operations
  - Closet Bookkeeper - Rack/device placement with unit and power-port
    accounting

### Data Persistence Layer
- File storage with gzip compression and bincode serialization
- Named snapshots under a data directory plus a fixed autosave slot
- Snapshot export/import over the API for off-machine backups

## Key Features

- Defensive numeric coercion: any form value (string, number, null,
  negative, fractional) becomes a usable non-negative count
- Derived figures are never stored, always recomputed, so they cannot go
  stale or drift from the rows
- Built-in equipment types seeded into every report and protected from
  deletion; custom types added and removed freely
- Rack placement validation: devices must fit the rack and may not overlap
- Issue/repair/recommendation/recycling tracking with the same validation
  contract as the inventory

## Modules

- **inventory**: canonical rows, the numeric sanitizer, per-row totals and
  the collection summary, plus the legacy-shape adapter
- **report**: the report state and every CRUD operation over it
- **closet**: rack and device bookkeeping
- **saving**: snapshot persistence with compression
- **app**: routing and handlers (requires the `web` feature)
*/

pub mod closet;
pub mod inventory;
pub mod report;
pub mod saving;

#[cfg(feature = "web")]
pub mod app;

/// Re-export everything from these modules to make it easier to use
pub use closet::*;
pub use inventory::*;
pub use report::*;
pub use saving::*;
