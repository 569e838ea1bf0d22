// Fixed counter template queried for every report

use crate::models::InstanceSelector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportCounter {
    CpuReady,
    CpuUsage,
    MemActive,
    MemShared,
    MemBalloon,
    MemSwapped,
    DatastoreReadIops,
    DatastoreWriteIops,
    DatastoreReadLatency,
    DatastoreWriteLatency,
    NetTransmitted,
    NetReceived,
}

impl ReportCounter {
    /// Query order of a report build.
    pub const ALL: [ReportCounter; 12] = [
        ReportCounter::CpuReady,
        ReportCounter::CpuUsage,
        ReportCounter::MemActive,
        ReportCounter::MemShared,
        ReportCounter::MemBalloon,
        ReportCounter::MemSwapped,
        ReportCounter::DatastoreReadIops,
        ReportCounter::DatastoreWriteIops,
        ReportCounter::DatastoreReadLatency,
        ReportCounter::DatastoreWriteLatency,
        ReportCounter::NetTransmitted,
        ReportCounter::NetReceived,
    ];

    /// Catalog name ("<group>.<metric>.<rollup>").
    pub fn name(&self) -> &'static str {
        match self {
            ReportCounter::CpuReady => "cpu.ready.summation",
            ReportCounter::CpuUsage => "cpu.usage.average",
            ReportCounter::MemActive => "mem.active.average",
            ReportCounter::MemShared => "mem.shared.average",
            ReportCounter::MemBalloon => "mem.vmmemctl.average",
            ReportCounter::MemSwapped => "mem.swapped.average",
            ReportCounter::DatastoreReadIops => "datastore.numberReadAveraged.average",
            ReportCounter::DatastoreWriteIops => "datastore.numberWriteAveraged.average",
            ReportCounter::DatastoreReadLatency => "datastore.totalReadLatency.average",
            ReportCounter::DatastoreWriteLatency => "datastore.totalWriteLatency.average",
            ReportCounter::NetTransmitted => "net.transmitted.average",
            ReportCounter::NetReceived => "net.received.average",
        }
    }

    /// Datastore counters are reported per device and summed; the rest are aggregates.
    pub fn instance(&self) -> InstanceSelector {
        match self {
            ReportCounter::DatastoreReadIops
            | ReportCounter::DatastoreWriteIops
            | ReportCounter::DatastoreReadLatency
            | ReportCounter::DatastoreWriteLatency => InstanceSelector::PerDevice,
            _ => InstanceSelector::Aggregate,
        }
    }
}
