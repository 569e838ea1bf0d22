// Section assembly: static configuration rows + derived metric rows

use super::stats::{VmMetrics, memory_percent};
use crate::error::Result;
use crate::models::{
    DeviceKind, EntityConfig, HostSummary, Report, ReportRow, ReportSection, ResourceAllocation,
    VirtualDevice,
};

pub const CORE_INFORMATION: &str = "Core Information";
pub const CPU_AND_MEMORY: &str = "vCPU and Memory Information";
pub const DATASTORE_AND_NETWORK: &str = "Datastore and Network Information";
pub const PARENT_HOST: &str = "Parent Host Information";

const KB_PER_GB: f64 = 1024.0 * 1024.0;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Sentinel-aware display: `None` for unset, otherwise value with unit suffix.
pub fn allocation_display(value: Option<i64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{} {}", v, unit),
        None => "None".to_string(),
    }
}

pub fn limits_display(cpu: &ResourceAllocation, memory: &ResourceAllocation) -> String {
    format!(
        "CPU: {}, Memory: {}",
        allocation_display(cpu.limit_value(), "Mhz"),
        allocation_display(memory.limit_value(), "MB")
    )
}

pub fn reservations_display(cpu: &ResourceAllocation, memory: &ResourceAllocation) -> String {
    format!(
        "CPU: {}, Memory: {}",
        allocation_display(cpu.reservation_value(), "Mhz"),
        allocation_display(memory.reservation_value(), "MB")
    )
}

fn disk_line(d: &VirtualDevice) -> String {
    let capacity_gb = d.capacity_kb.unwrap_or(0) as f64 / KB_PER_GB;
    let thin = d
        .thin_provisioned
        .map(|t| t.to_string())
        .unwrap_or_else(|| "unknown".into());
    format!(
        "{} | {:.1}GB | Thin: {} | {}",
        d.label,
        capacity_gb,
        thin,
        d.file_name.as_deref().unwrap_or_default()
    )
}

fn nic_line(d: &VirtualDevice) -> String {
    format!(
        "{} | {} | {}",
        d.label,
        d.summary,
        d.mac_address.as_deref().unwrap_or_default()
    )
}

/// One line per device of `kind`, or "None".
pub fn device_summary(devices: &[VirtualDevice], kind: DeviceKind) -> String {
    let lines: Vec<String> = devices
        .iter()
        .filter(|d| d.kind() == kind)
        .map(|d| match kind {
            DeviceKind::Nic => nic_line(d),
            _ => disk_line(d),
        })
        .collect();
    if lines.is_empty() {
        "None".to_string()
    } else {
        lines.join("\n")
    }
}

fn core_section(config: &EntityConfig) -> ReportSection {
    let snapshots = if config.has_snapshots {
        "Snapshot(s) found"
    } else {
        "No Snapshots"
    };
    ReportSection::new(
        CORE_INFORMATION,
        vec![
            ReportRow::new("Virtual Machine Name", &config.name),
            ReportRow::new("Description", &config.annotation),
            ReportRow::new("Guest", &config.guest_full_name),
            ReportRow::new("Snapshot Status", snapshots),
            ReportRow::new("VM .vmx Path", &config.vm_path_name),
            ReportRow::new(
                "Virtual Disks",
                device_summary(&config.devices, DeviceKind::Disk),
            ),
            ReportRow::new(
                "Virtual NIC(s)",
                device_summary(&config.devices, DeviceKind::Nic),
            ),
        ],
    )
}

fn cpu_memory_section(config: &EntityConfig, m: &VmMetrics) -> Result<ReportSection> {
    let memory_row = |label: &str, mb: f64| -> Result<ReportRow> {
        let pct = memory_percent(mb, config.memory_size_mb, &config.name)?;
        Ok(ReportRow::new(label, format!("{:.0} %, {:.0} MB", pct, mb)))
    };
    let memory_mb = config.memory_size_mb.unwrap_or(0);

    Ok(ReportSection::new(
        CPU_AND_MEMORY,
        vec![
            ReportRow::new(
                "[VM] Limits",
                limits_display(&config.cpu_allocation, &config.memory_allocation),
            ),
            ReportRow::new(
                "[VM] Reservations",
                reservations_display(&config.cpu_allocation, &config.memory_allocation),
            ),
            ReportRow::new("[VM] Number of vCPUs", config.num_cpu.to_string()),
            ReportRow::new(
                "[VM] CPU Ready",
                format!(
                    "Average {:.1} %, Maximum {:.1} %",
                    m.cpu_ready_avg_percent, m.cpu_ready_max_percent
                ),
            ),
            ReportRow::new("[VM] CPU (%)", format!("{:.0} %", m.cpu_usage_percent)),
            ReportRow::new(
                "[VM] Memory",
                format!("{} MB ({:.1} GB)", memory_mb, memory_mb as f64 / 1024.0),
            ),
            memory_row("[VM] Memory Shared", m.mem_shared_mb)?,
            memory_row("[VM] Memory Balloon", m.mem_balloon_mb)?,
            memory_row("[VM] Memory Swapped", m.mem_swapped_mb)?,
            memory_row("[VM] Memory Active", m.mem_active_mb)?,
        ],
    ))
}

fn datastore_network_section(m: &VmMetrics) -> ReportSection {
    ReportSection::new(
        DATASTORE_AND_NETWORK,
        vec![
            ReportRow::new(
                "[VM] Datastore Average IO",
                format!(
                    "Read: {:.0} IOPS, Write: {:.0} IOPS",
                    m.datastore_read_iops, m.datastore_write_iops
                ),
            ),
            ReportRow::new(
                "[VM] Datastore Average Latency",
                format!(
                    "Read: {:.0} ms, Write: {:.0} ms",
                    m.datastore_read_latency_ms, m.datastore_write_latency_ms
                ),
            ),
            ReportRow::new(
                "[VM] Overall Network Usage",
                format!(
                    "Transmitted {:.3} Mbps, Received {:.3} Mbps",
                    m.net_transmitted_mbps, m.net_received_mbps
                ),
            ),
        ],
    )
}

fn host_section(host: &HostSummary) -> ReportSection {
    let cores_per_socket = host
        .num_cpu_cores
        .checked_div(host.num_cpu_pkgs)
        .unwrap_or(0);
    let total_mhz = host.cpu_mhz * u64::from(host.num_cpu_cores);
    ReportSection::new(
        PARENT_HOST,
        vec![
            ReportRow::new("[Host] Name", &host.name),
            ReportRow::new(
                "[Host] CPU Detail",
                format!(
                    "Processor Sockets: {}, Cores per Socket {}",
                    host.num_cpu_pkgs, cores_per_socket
                ),
            ),
            ReportRow::new("[Host] CPU Type", &host.cpu_model),
            ReportRow::new(
                "[Host] CPU Usage",
                format!(
                    "Used: {} Mhz, Total: {} Mhz",
                    host.overall_cpu_usage_mhz, total_mhz
                ),
            ),
            ReportRow::new(
                "[Host] Memory Usage",
                format!(
                    "Used: {:.0} GB, Total: {:.0} GB",
                    host.overall_memory_usage_mb as f64 / 1024.0,
                    host.memory_size_bytes as f64 / BYTES_PER_GB
                ),
            ),
        ],
    )
}

/// Fixed section order: core, vCPU/memory, datastore/network, parent host.
pub fn assemble(config: &EntityConfig, metrics: &VmMetrics, lookback_minutes: u32) -> Result<Report> {
    Ok(Report {
        entity_name: config.name.clone(),
        lookback_minutes,
        sections: vec![
            core_section(config),
            cpu_memory_section(config, metrics)?,
            datastore_network_section(metrics),
            host_section(&config.host),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk(key: i32, label: &str, kb: u64, thin: bool, file: &str) -> VirtualDevice {
        VirtualDevice {
            key,
            label: label.into(),
            summary: String::new(),
            capacity_kb: Some(kb),
            thin_provisioned: Some(thin),
            file_name: Some(file.into()),
            mac_address: None,
        }
    }

    fn nic(key: i32, label: &str, summary: &str, mac: &str) -> VirtualDevice {
        VirtualDevice {
            key,
            label: label.into(),
            summary: summary.into(),
            capacity_kb: None,
            thin_provisioned: None,
            file_name: None,
            mac_address: Some(mac.into()),
        }
    }

    #[test]
    fn limit_sentinel_displays_none() {
        let unset = ResourceAllocation {
            limit: -1,
            reservation: 0,
        };
        assert_eq!(limits_display(&unset, &unset), "CPU: None, Memory: None");
        assert_eq!(reservations_display(&unset, &unset), "CPU: None, Memory: None");
    }

    #[test]
    fn set_allocations_render_with_units() {
        let cpu = ResourceAllocation {
            limit: 2000,
            reservation: 500,
        };
        let mem = ResourceAllocation {
            limit: 4096,
            reservation: 1024,
        };
        assert_eq!(limits_display(&cpu, &mem), "CPU: 2000 Mhz, Memory: 4096 MB");
        assert_eq!(
            reservations_display(&cpu, &mem),
            "CPU: 500 Mhz, Memory: 1024 MB"
        );
    }

    #[test]
    fn zero_limit_is_not_a_sentinel() {
        let cpu = ResourceAllocation {
            limit: 0,
            reservation: -1,
        };
        assert_eq!(allocation_display(cpu.limit_value(), "Mhz"), "0 Mhz");
        assert_eq!(allocation_display(cpu.reservation_value(), "Mhz"), "-1 Mhz");
    }

    #[test]
    fn devices_are_classified_by_key_range() {
        let devices = vec![
            disk(2000, "Hard disk 1", 41_943_040, true, "[ds1] web/web.vmdk"),
            nic(4000, "Network adapter 1", "VM Network", "00:50:56:aa:bb:cc"),
            disk(2001, "Hard disk 2", 10_485_760, false, "[ds1] web/web_1.vmdk"),
            nic(100, "PCI controller 0", "", ""),
        ];
        assert_eq!(
            device_summary(&devices, DeviceKind::Disk),
            "Hard disk 1 | 40.0GB | Thin: true | [ds1] web/web.vmdk\n\
             Hard disk 2 | 10.0GB | Thin: false | [ds1] web/web_1.vmdk"
        );
        assert_eq!(
            device_summary(&devices, DeviceKind::Nic),
            "Network adapter 1 | VM Network | 00:50:56:aa:bb:cc"
        );
    }

    #[test]
    fn no_devices_of_kind_reads_none() {
        assert_eq!(device_summary(&[], DeviceKind::Disk), "None");
    }

    #[test]
    fn host_with_zero_sockets_does_not_divide_by_zero() {
        let host = HostSummary {
            name: "esx01".into(),
            cpu_model: "Xeon".into(),
            num_cpu_pkgs: 0,
            num_cpu_cores: 8,
            cpu_mhz: 2400,
            overall_cpu_usage_mhz: 1200,
            overall_memory_usage_mb: 2048,
            memory_size_bytes: 8 * 1024 * 1024 * 1024,
        };
        let section = host_section(&host);
        assert_eq!(
            section.row("[Host] CPU Detail").unwrap().value,
            "Processor Sockets: 0, Cores per Socket 0"
        );
        assert_eq!(
            section.row("[Host] CPU Usage").unwrap().value,
            "Used: 1200 Mhz, Total: 19200 Mhz"
        );
        assert_eq!(
            section.row("[Host] Memory Usage").unwrap().value,
            "Used: 2 GB, Total: 8 GB"
        );
    }
}
