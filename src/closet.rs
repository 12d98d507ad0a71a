use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::report::ReportError;

/// What kind of device occupies a rack slot. Drives the default power draw
/// when the technician does not record one.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceKind {
    Switch,
    Router,
    Server,
    PatchPanel,
    Ups,
    Shelf,
    Other,
}

impl DeviceKind {
    pub fn default_power_draw(&self) -> u64 {
        match self {
            DeviceKind::Switch => 1,
            DeviceKind::Router => 1,
            DeviceKind::Server => 2,
            DeviceKind::PatchPanel => 0,
            DeviceKind::Ups => 0,
            DeviceKind::Shelf => 0,
            DeviceKind::Other => 1,
        }
    }
}

/// A device mounted in a rack. Positions are 1-based from the bottom of the
/// rack; `unit_position` is the lowest unit the device occupies.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RackDevice {
    pub id: String,
    pub name: String,
    pub kind: DeviceKind,
    pub unit_position: u64,
    pub unit_height: u64,
    pub power_ports: Option<u64>,
}

impl RackDevice {
    pub fn new(
        name: &str,
        kind: DeviceKind,
        unit_position: u64,
        unit_height: u64,
        power_ports: Option<u64>,
    ) -> Self {
        RackDevice {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            kind,
            unit_position,
            unit_height,
            power_ports,
        }
    }

    pub fn power_draw(&self) -> u64 {
        self.power_ports.unwrap_or_else(|| self.kind.default_power_draw())
    }

    /// Highest unit the device occupies. Only meaningful for a device with
    /// a non-zero height. Saturates so an absurd position or height from the
    /// wire still compares against the rack bounds instead of overflowing.
    pub fn top_unit(&self) -> u64 {
        self.unit_position
            .saturating_add(self.unit_height)
            .saturating_sub(1)
    }

    fn overlaps(&self, other: &RackDevice) -> bool {
        self.unit_position <= other.top_unit() && other.unit_position <= self.top_unit()
    }
}

/// Occupancy figures for one rack, recomputed on demand. Free counts floor
/// at zero when a rack is oversubscribed.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RackUsage {
    pub units_used: u64,
    pub units_free: u64,
    pub power_ports_used: u64,
    pub power_ports_free: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rack {
    pub id: String,
    pub name: String,
    pub units: u64,
    pub power_ports: u64,
    pub devices: Vec<RackDevice>,
}

impl Rack {
    pub fn new(name: &str, units: u64, power_ports: u64) -> Self {
        Rack {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            units,
            power_ports,
            devices: Vec::new(),
        }
    }

    pub fn usage(&self) -> RackUsage {
        let units_used = self
            .devices
            .iter()
            .fold(0u64, |acc, d| acc.saturating_add(d.unit_height));
        let power_ports_used = self
            .devices
            .iter()
            .fold(0u64, |acc, d| acc.saturating_add(d.power_draw()));

        RackUsage {
            units_used,
            units_free: self.units.saturating_sub(units_used),
            power_ports_used,
            power_ports_free: self.power_ports.saturating_sub(power_ports_used),
        }
    }

    /// Mount a device, rejecting placements that fall outside the rack or
    /// collide with a device already mounted. The rack is unchanged on
    /// rejection.
    pub fn mount(&mut self, device: RackDevice) -> Result<(), ReportError> {
        if device.unit_position == 0 || device.unit_height == 0 || device.top_unit() > self.units {
            return Err(ReportError::DeviceDoesNotFit);
        }
        if let Some(existing) = self.devices.iter().find(|d| d.overlaps(&device)) {
            return Err(ReportError::UnitOverlap(
                existing.unit_position,
                existing.top_unit(),
            ));
        }

        self.devices.push(device);
        Ok(())
    }

    pub fn unmount(&mut self, device_id: &str) -> Result<(), ReportError> {
        match self.devices.iter().position(|d| d.id == device_id) {
            Some(pos) => {
                self.devices.remove(pos);
                Ok(())
            }
            None => Err(ReportError::UnknownId(device_id.to_string())),
        }
    }
}

/// The data-closet section of a report: every rack on site with its
/// mounted devices.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DataCloset {
    pub racks: Vec<Rack>,
}

impl DataCloset {
    pub fn add_rack(&mut self, name: &str, units: u64, power_ports: u64) -> Result<&Rack, ReportError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ReportError::MissingField("rack name"));
        }

        self.racks.push(Rack::new(name, units, power_ports));
        Ok(self.racks.last().unwrap())
    }

    pub fn remove_rack(&mut self, rack_id: &str) -> Result<(), ReportError> {
        match self.racks.iter().position(|r| r.id == rack_id) {
            Some(pos) => {
                self.racks.remove(pos);
                Ok(())
            }
            None => Err(ReportError::UnknownId(rack_id.to_string())),
        }
    }

    pub fn rack(&self, rack_id: &str) -> Option<&Rack> {
        self.racks.iter().find(|r| r.id == rack_id)
    }

    fn rack_mut(&mut self, rack_id: &str) -> Result<&mut Rack, ReportError> {
        self.racks
            .iter_mut()
            .find(|r| r.id == rack_id)
            .ok_or_else(|| ReportError::UnknownId(rack_id.to_string()))
    }

    pub fn mount_device(&mut self, rack_id: &str, device: RackDevice) -> Result<(), ReportError> {
        self.rack_mut(rack_id)?.mount(device)
    }

    pub fn unmount_device(&mut self, rack_id: &str, device_id: &str) -> Result<(), ReportError> {
        self.rack_mut(rack_id)?.unmount(device_id)
    }
}
