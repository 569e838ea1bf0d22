// Model serialization and classification tests

use vminfo::models::{
    CatalogEntry, CounterCatalog, DeviceKind, EntityConfig, EntityRef, EntitySummary, InstanceSelector,
    MetricWindow, PowerState, ResourceAllocation, SampleQuery, SampleSeries, VirtualDevice,
};
use vminfo::test_utils::{fixed_now, sample_entity_config};

#[test]
fn power_state_uses_camel_case_on_the_wire() {
    assert_eq!(
        serde_json::to_string(&PowerState::PoweredOn).unwrap(),
        "\"poweredOn\""
    );
    let s: PowerState = serde_json::from_str("\"suspended\"").unwrap();
    assert_eq!(s, PowerState::Suspended);
    assert!(!s.is_running());
    assert!(PowerState::PoweredOn.is_running());
    assert_eq!(PowerState::PoweredOff.to_string(), "poweredOff");
}

#[test]
fn entity_summary_reads_ref_field() {
    let s: EntitySummary =
        serde_json::from_str(r#"{"ref":"vm-42","name":"web01","powerState":"poweredOn"}"#)
            .unwrap();
    assert_eq!(s.entity.as_str(), "vm-42");
    assert_eq!(s.name, "web01");
}

#[test]
fn sample_query_serializes_window_and_selector() {
    let window = MetricWindow::for_lookback(fixed_now(), 15);
    let q = SampleQuery::new(6, InstanceSelector::PerDevice, EntityRef::new("vm-42"), window);
    let json = serde_json::to_value(&q).unwrap();
    assert_eq!(json["counterId"], 6);
    assert_eq!(json["instance"], "*");
    assert_eq!(json["entity"], "vm-42");
    assert_eq!(json["intervalSeconds"], 20);
    assert_eq!(json["startTime"], "2024-03-01T11:44:00Z");
    assert_eq!(json["endTime"], "2024-03-01T11:59:00Z");

    let aggregate = SampleQuery::new(1, InstanceSelector::Aggregate, EntityRef::new("vm-42"), window);
    assert_eq!(serde_json::to_value(&aggregate).unwrap()["instance"], "");
}

#[test]
fn sample_series_decodes_instance_list() {
    let s: SampleSeries = serde_json::from_str(
        r#"[{"instance":"scsi0:0","values":[4,6]},{"instance":"scsi0:1","values":[2,2]}]"#,
    )
    .unwrap();
    assert_eq!(s.combined(), vec![4, 6, 2, 2]);
    assert!(!s.is_empty());
    let empty: SampleSeries = serde_json::from_str(r#"[{"values":[]}]"#).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn entity_config_defaults_optional_fields() {
    let json = r#"{
        "name": "web01",
        "numCpu": 4,
        "host": {
            "name": "esx01", "cpuModel": "Xeon", "numCpuPkgs": 2, "numCpuCores": 16,
            "cpuMhz": 2400, "overallCpuUsageMhz": 100, "overallMemoryUsageMb": 2048,
            "memorySizeBytes": 68719476736
        }
    }"#;
    let config: EntityConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.memory_size_mb, None);
    assert!(config.devices.is_empty());
    assert!(!config.has_snapshots);
    assert_eq!(config.cpu_allocation, ResourceAllocation::default());
    assert_eq!(config.cpu_allocation.limit_value(), None);
    assert_eq!(config.memory_allocation.reservation_value(), None);
}

#[test]
fn entity_config_round_trips_through_json() {
    let config = sample_entity_config("web01");
    let back: EntityConfig =
        serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
    assert_eq!(back, config);
}

#[test]
fn devices_are_classified_by_key() {
    let device = |key| VirtualDevice {
        key,
        label: String::new(),
        summary: String::new(),
        capacity_kb: None,
        thin_provisioned: None,
        file_name: None,
        mac_address: None,
    };
    assert_eq!(device(2000).kind(), DeviceKind::Disk);
    assert_eq!(device(2999).kind(), DeviceKind::Disk);
    assert_eq!(device(4000).kind(), DeviceKind::Nic);
    assert_eq!(device(4999).kind(), DeviceKind::Nic);
    assert_eq!(device(1000).kind(), DeviceKind::Other);
    assert_eq!(device(3000).kind(), DeviceKind::Other);
}

#[test]
fn catalog_lookup_by_full_name() {
    let catalog = CounterCatalog::resolve(&[CatalogEntry {
        group: "cpu".into(),
        name: "ready".into(),
        rollup: "summation".into(),
        id: 6,
    }]);
    assert_eq!(catalog.lookup("cpu.ready.summation").unwrap(), 6);
    assert!(catalog.lookup("cpu.ready.average").is_err());
}
