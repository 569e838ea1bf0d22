// Series reduction: time-weighted window averages and per-counter rescaling

use std::collections::HashMap;

use super::counters::ReportCounter;
use crate::error::{ReportError, Result};
use crate::models::SAMPLES_PER_MINUTE;

/// Length of one native sample in milliseconds; CPU ready is summed over it.
const NATIVE_SAMPLE_MS: f64 = 20_000.0;

/// `sum(samples) / (lookback_minutes * 3)`: average over the nominal sample count of the
/// window, not over the samples actually returned.
pub fn window_rate(samples: &[i64], lookback_minutes: u32) -> f64 {
    let sum: f64 = samples.iter().map(|&v| v as f64).sum();
    sum / (f64::from(lookback_minutes) * f64::from(SAMPLES_PER_MINUTE))
}

/// Ready milliseconds within a 20 s sample -> percent of that sample.
pub fn ready_percent(ready_ms: f64) -> f64 {
    ready_ms / NATIVE_SAMPLE_MS * 100.0
}

/// Share of the configured memory size, in percent.
pub fn memory_percent(value_mb: f64, memory_size_mb: Option<u64>, vm_name: &str) -> Result<f64> {
    match memory_size_mb {
        Some(size) if size > 0 => Ok(100.0 * value_mb / size as f64),
        _ => Err(ReportError::InvalidMemorySize {
            name: vm_name.to_string(),
        }),
    }
}

/// Combined samples per counter for one report build.
#[derive(Debug, Clone, Default)]
pub struct CounterSamples {
    samples: HashMap<ReportCounter, Vec<i64>>,
}

impl CounterSamples {
    pub fn insert(&mut self, counter: ReportCounter, samples: Vec<i64>) {
        self.samples.insert(counter, samples);
    }

    pub fn get(&self, counter: ReportCounter) -> &[i64] {
        self.samples.get(&counter).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Derived statistics of one virtual machine over the lookback window.
#[derive(Debug, Clone, PartialEq)]
pub struct VmMetrics {
    pub cpu_ready_avg_percent: f64,
    pub cpu_ready_max_percent: f64,
    pub cpu_usage_percent: f64,
    pub mem_active_mb: f64,
    pub mem_shared_mb: f64,
    pub mem_balloon_mb: f64,
    pub mem_swapped_mb: f64,
    pub datastore_read_iops: f64,
    pub datastore_write_iops: f64,
    pub datastore_read_latency_ms: f64,
    pub datastore_write_latency_ms: f64,
    pub net_transmitted_mbps: f64,
    pub net_received_mbps: f64,
}

impl VmMetrics {
    pub fn from_samples(samples: &CounterSamples, lookback_minutes: u32) -> Self {
        let rate = |c: ReportCounter| window_rate(samples.get(c), lookback_minutes);
        // memory counters arrive in KB
        let mem_mb = |c: ReportCounter| rate(c) / 1024.0;
        // network counters arrive in KBps
        let net_mbps = |c: ReportCounter| rate(c) * 8.0 / 1024.0;

        let ready_max = samples
            .get(ReportCounter::CpuReady)
            .iter()
            .copied()
            .max()
            .unwrap_or_default();

        Self {
            cpu_ready_avg_percent: ready_percent(rate(ReportCounter::CpuReady)),
            cpu_ready_max_percent: ready_percent(ready_max as f64),
            // usage is encoded in hundredths of a percent
            cpu_usage_percent: rate(ReportCounter::CpuUsage) / 100.0,
            mem_active_mb: mem_mb(ReportCounter::MemActive),
            mem_shared_mb: mem_mb(ReportCounter::MemShared),
            mem_balloon_mb: mem_mb(ReportCounter::MemBalloon),
            mem_swapped_mb: mem_mb(ReportCounter::MemSwapped),
            datastore_read_iops: rate(ReportCounter::DatastoreReadIops),
            datastore_write_iops: rate(ReportCounter::DatastoreWriteIops),
            datastore_read_latency_ms: rate(ReportCounter::DatastoreReadLatency),
            datastore_write_latency_ms: rate(ReportCounter::DatastoreWriteLatency),
            net_transmitted_mbps: net_mbps(ReportCounter::NetTransmitted),
            net_received_mbps: net_mbps(ReportCounter::NetReceived),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn window_rate_uses_nominal_denominator() {
        assert!(approx(window_rate(&[10, 20, 30, 40, 50], 1), 50.0));
    }

    #[test]
    fn window_rate_ignores_returned_sample_count() {
        // 15 minutes -> 45 nominal samples even though only 3 came back
        assert!(approx(window_rate(&[45, 45, 45], 15), 3.0));
    }

    #[test]
    fn window_rate_summed_devices() {
        let r = window_rate(&[4, 6, 2, 2], 1);
        assert!(approx(r, 14.0 / 3.0));
        assert_eq!(format!("{:.2}", r), "4.67");
    }

    #[test]
    fn ready_percent_of_twenty_second_sample() {
        assert!(approx(ready_percent(2000.0), 10.0));
        assert!(approx(ready_percent(20_000.0), 100.0));
    }

    #[test]
    fn memory_percent_of_configured_size() {
        assert!(approx(memory_percent(512.0, Some(2048), "vm").unwrap(), 25.0));
    }

    #[test]
    fn memory_percent_rejects_zero_or_missing_size() {
        assert!(matches!(
            memory_percent(512.0, Some(0), "web01"),
            Err(ReportError::InvalidMemorySize { ref name }) if name == "web01"
        ));
        assert!(matches!(
            memory_percent(512.0, None, "web01"),
            Err(ReportError::InvalidMemorySize { .. })
        ));
    }

    #[test]
    fn from_samples_rescales_each_counter() {
        let mut s = CounterSamples::default();
        // lookback 1 -> denominator 3
        s.insert(ReportCounter::CpuReady, vec![600, 1200, 4200]); // avg 2000 ms, max 4200 ms
        s.insert(ReportCounter::CpuUsage, vec![1500, 1500, 1500]); // 1500 hundredths
        s.insert(ReportCounter::MemActive, vec![3072, 3072, 3072]); // 3072 KB
        s.insert(ReportCounter::MemShared, vec![0]);
        s.insert(ReportCounter::MemBalloon, vec![0]);
        s.insert(ReportCounter::MemSwapped, vec![1536]);
        s.insert(ReportCounter::DatastoreReadIops, vec![4, 6, 2, 2]);
        s.insert(ReportCounter::DatastoreWriteIops, vec![3, 3, 3]);
        s.insert(ReportCounter::DatastoreReadLatency, vec![9]);
        s.insert(ReportCounter::DatastoreWriteLatency, vec![6]);
        s.insert(ReportCounter::NetTransmitted, vec![384]); // 128 KBps
        s.insert(ReportCounter::NetReceived, vec![192]);

        let m = VmMetrics::from_samples(&s, 1);
        assert!(approx(m.cpu_ready_avg_percent, 10.0));
        assert!(approx(m.cpu_ready_max_percent, 21.0));
        assert!(approx(m.cpu_usage_percent, 15.0));
        assert!(approx(m.mem_active_mb, 3.0));
        assert!(approx(m.mem_swapped_mb, 0.5));
        assert!(approx(m.datastore_read_iops, 14.0 / 3.0));
        assert!(approx(m.datastore_write_iops, 3.0));
        assert!(approx(m.datastore_read_latency_ms, 3.0));
        assert!(approx(m.datastore_write_latency_ms, 2.0));
        assert!(approx(m.net_transmitted_mbps, 1.0));
        assert!(approx(m.net_received_mbps, 0.5));
    }
}
