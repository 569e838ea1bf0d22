// In-memory MonitoringClient for unit and integration tests

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::client::MonitoringClient;
use crate::error::{ReportError, Result};
use crate::models::{
    CatalogEntry, EntityConfig, EntityRef, HostSummary, PowerState, ResourceAllocation,
    SampleQuery, SampleSeries, VirtualDevice,
};
use crate::report::counters::ReportCounter;
use crate::session::Session;

struct FakeEntity {
    entity: EntityRef,
    power_state: PowerState,
    config: EntityConfig,
}

/// Scripted endpoint. Every `query_metric` call is recorded; counters without scripted
/// samples return an empty series.
pub struct FakeMonitoringClient {
    now: DateTime<Utc>,
    catalog: Vec<CatalogEntry>,
    samples: HashMap<i32, SampleSeries>,
    entities: HashMap<String, FakeEntity>,
    queries: Mutex<Vec<SampleQuery>>,
}

/// Fixed endpoint clock used by the fake: 2024-03-01T12:00:00Z.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Counter id the fake assigns to a report counter (its position + 1).
pub fn counter_id(counter: ReportCounter) -> i32 {
    ReportCounter::ALL
        .iter()
        .position(|c| *c == counter)
        .map(|i| i as i32 + 1)
        .unwrap_or(0)
}

/// Catalog listing every counter the report needs.
pub fn standard_catalog() -> Vec<CatalogEntry> {
    ReportCounter::ALL
        .iter()
        .map(|&c| {
            let mut parts = c.name().splitn(3, '.');
            CatalogEntry {
                group: parts.next().unwrap_or_default().to_string(),
                name: parts.next().unwrap_or_default().to_string(),
                rollup: parts.next().unwrap_or_default().to_string(),
                id: counter_id(c),
            }
        })
        .collect()
}

/// A powered-on style configuration with one thin disk and one NIC.
pub fn sample_entity_config(name: &str) -> EntityConfig {
    EntityConfig {
        name: name.to_string(),
        annotation: "test machine".to_string(),
        guest_full_name: "Ubuntu Linux (64-bit)".to_string(),
        vm_path_name: format!("[datastore1] {name}/{name}.vmx"),
        num_cpu: 2,
        memory_size_mb: Some(4096),
        has_snapshots: false,
        devices: vec![
            VirtualDevice {
                key: 2000,
                label: "Hard disk 1".to_string(),
                summary: "41,943,040 KB".to_string(),
                capacity_kb: Some(41_943_040),
                thin_provisioned: Some(true),
                file_name: Some(format!("[datastore1] {name}/{name}.vmdk")),
                mac_address: None,
            },
            VirtualDevice {
                key: 4000,
                label: "Network adapter 1".to_string(),
                summary: "VM Network".to_string(),
                capacity_kb: None,
                thin_provisioned: None,
                file_name: None,
                mac_address: Some("00:50:56:aa:bb:cc".to_string()),
            },
        ],
        cpu_allocation: ResourceAllocation::default(),
        memory_allocation: ResourceAllocation::default(),
        host: HostSummary {
            name: "esx01.lab".to_string(),
            cpu_model: "Intel(R) Xeon(R) Gold 6130".to_string(),
            num_cpu_pkgs: 2,
            num_cpu_cores: 32,
            cpu_mhz: 2100,
            overall_cpu_usage_mhz: 8400,
            overall_memory_usage_mb: 131_072,
            memory_size_bytes: 274_877_906_944,
        },
    }
}

impl Default for FakeMonitoringClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeMonitoringClient {
    /// Standard catalog, no entities, no samples.
    pub fn new() -> Self {
        Self {
            now: fixed_now(),
            catalog: standard_catalog(),
            samples: HashMap::new(),
            entities: HashMap::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Every report counter answers with `values` as a single aggregate series.
    pub fn with_uniform_samples(mut self, values: &[i64]) -> Self {
        for c in ReportCounter::ALL {
            self.samples
                .insert(counter_id(c), SampleSeries::single(values.to_vec()));
        }
        self
    }

    pub fn with_samples(mut self, counter: ReportCounter, series: SampleSeries) -> Self {
        self.samples.insert(counter_id(counter), series);
        self
    }

    /// Drops one counter from the catalog, as an older endpoint would.
    pub fn without_counter(mut self, counter: ReportCounter) -> Self {
        self.catalog.retain(|e| e.full_name() != counter.name());
        self
    }

    pub fn with_entity(self, name: &str, power_state: PowerState) -> Self {
        let config = sample_entity_config(name);
        self.with_entity_config(name, power_state, config)
    }

    pub fn with_entity_config(
        mut self,
        name: &str,
        power_state: PowerState,
        config: EntityConfig,
    ) -> Self {
        let entity = EntityRef::new(format!("vm-{}", self.entities.len() + 1));
        self.entities.insert(
            name.to_string(),
            FakeEntity {
                entity,
                power_state,
                config,
            },
        );
        self
    }

    /// Queries received so far, in call order.
    pub fn queries(&self) -> Vec<SampleQuery> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    fn find(&self, entity: &EntityRef) -> Result<&FakeEntity> {
        self.entities
            .values()
            .find(|e| &e.entity == entity)
            .ok_or_else(|| ReportError::EntityNotFound {
                name: entity.to_string(),
            })
    }
}

#[async_trait]
impl MonitoringClient for FakeMonitoringClient {
    async fn current_time(&self) -> Result<DateTime<Utc>> {
        Ok(self.now)
    }

    async fn list_counter_catalog(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.catalog.clone())
    }

    async fn query_metric(&self, query: &SampleQuery) -> Result<SampleSeries> {
        if let Ok(mut q) = self.queries.lock() {
            q.push(query.clone());
        }
        Ok(self
            .samples
            .get(&query.counter_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn resolve_entity(&self, name: &str) -> Result<Option<EntityRef>> {
        Ok(self.entities.get(name).map(|e| e.entity.clone()))
    }

    async fn entity_power_state(&self, entity: &EntityRef) -> Result<PowerState> {
        Ok(self.find(entity)?.power_state)
    }

    async fn entity_snapshot(&self, entity: &EntityRef) -> Result<EntityConfig> {
        Ok(self.find(entity)?.config.clone())
    }
}

/// Opens a session over the fake, keeping a handle to inspect recorded queries.
pub async fn fake_session(fake: FakeMonitoringClient) -> (Arc<Session>, Arc<FakeMonitoringClient>) {
    let fake = Arc::new(fake);
    let client: Arc<dyn MonitoringClient> = fake.clone();
    let session = Session::open(client)
        .await
        .unwrap_or_else(|e| panic!("fake session: {e}"));
    (Arc::new(session), fake)
}
