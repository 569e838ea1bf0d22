// Virtual machine inventory models: reference, power state, configuration snapshot

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque managed-object reference issued by the endpoint (e.g. "vm-42").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRef(pub String);

impl EntityRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Power state; serializes to camelCase JSON (e.g. "poweredOn").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerState {
    PoweredOn,
    PoweredOff,
    Suspended,
}

impl PowerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerState::PoweredOn => "poweredOn",
            PowerState::PoweredOff => "poweredOff",
            PowerState::Suspended => "suspended",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, PowerState::PoweredOn)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inventory lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySummary {
    #[serde(rename = "ref")]
    pub entity: EntityRef,
    pub name: String,
    pub power_state: PowerState,
}

/// CPU or memory allocation. `limit == -1` and `reservation == 0` mean "unset".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAllocation {
    pub limit: i64,
    pub reservation: i64,
}

impl ResourceAllocation {
    pub const UNLIMITED: i64 = -1;
    pub const NO_RESERVATION: i64 = 0;

    pub fn limit_value(&self) -> Option<i64> {
        (self.limit != Self::UNLIMITED).then_some(self.limit)
    }

    pub fn reservation_value(&self) -> Option<i64> {
        (self.reservation != Self::NO_RESERVATION).then_some(self.reservation)
    }
}

impl Default for ResourceAllocation {
    fn default() -> Self {
        Self {
            limit: Self::UNLIMITED,
            reservation: Self::NO_RESERVATION,
        }
    }
}

/// Device keys 2000..3000 are virtual disks, 4000..5000 are virtual NICs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualDevice {
    pub key: i32,
    pub label: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub capacity_kb: Option<u64>,
    #[serde(default)]
    pub thin_provisioned: Option<bool>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Disk,
    Nic,
    Other,
}

impl VirtualDevice {
    pub fn kind(&self) -> DeviceKind {
        match self.key {
            2000..=2999 => DeviceKind::Disk,
            4000..=4999 => DeviceKind::Nic,
            _ => DeviceKind::Other,
        }
    }
}

/// Parent host hardware and current usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSummary {
    pub name: String,
    pub cpu_model: String,
    pub num_cpu_pkgs: u32,
    pub num_cpu_cores: u32,
    pub cpu_mhz: u64,
    pub overall_cpu_usage_mhz: u64,
    pub overall_memory_usage_mb: u64,
    pub memory_size_bytes: u64,
}

/// Static (non time-series) attributes read once per report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityConfig {
    pub name: String,
    #[serde(default)]
    pub annotation: String,
    #[serde(default)]
    pub guest_full_name: String,
    #[serde(default)]
    pub vm_path_name: String,
    pub num_cpu: u32,
    #[serde(default)]
    pub memory_size_mb: Option<u64>,
    #[serde(default)]
    pub has_snapshots: bool,
    #[serde(default)]
    pub devices: Vec<VirtualDevice>,
    #[serde(default)]
    pub cpu_allocation: ResourceAllocation,
    #[serde(default)]
    pub memory_allocation: ResourceAllocation,
    pub host: HostSummary,
}
