// Domain models: counter catalog, metric queries, inventory, report

mod catalog;
mod entity;
mod report;
mod sample;

pub use catalog::{CatalogEntry, CounterCatalog};
pub use entity::{
    DeviceKind, EntityConfig, EntityRef, EntitySummary, HostSummary, PowerState,
    ResourceAllocation, VirtualDevice,
};
pub use report::{Report, ReportRow, ReportSection};
pub use sample::{
    InstanceSelector, InstanceSeries, MetricWindow, NATIVE_INTERVAL_SECS, SAMPLES_PER_MINUTE,
    SampleQuery, SampleSeries,
};
