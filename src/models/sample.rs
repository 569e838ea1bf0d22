// Metric query value objects and returned sample series

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::EntityRef;

/// Native sampling granularity of the monitoring endpoint, in seconds.
pub const NATIVE_INTERVAL_SECS: u32 = 20;

/// Native samples per requested minute (60 / 20).
pub const SAMPLES_PER_MINUTE: u32 = 60 / NATIVE_INTERVAL_SECS;

/// Which device instances a query covers. Wire form: "" (aggregate) or "*" (per device).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum InstanceSelector {
    Aggregate,
    PerDevice,
}

impl InstanceSelector {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceSelector::Aggregate => "",
            InstanceSelector::PerDevice => "*",
        }
    }
}

impl From<InstanceSelector> for String {
    fn from(s: InstanceSelector) -> Self {
        s.as_str().to_string()
    }
}

impl TryFrom<String> for InstanceSelector {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "" => Ok(InstanceSelector::Aggregate),
            "*" => Ok(InstanceSelector::PerDevice),
            other => Err(format!("unsupported instance selector {:?}", other)),
        }
    }
}

/// Half-open query window `[start, end)` anchored on the endpoint clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MetricWindow {
    /// `[now - (lookback + 1) min, now - 1 min)`. The trailing minute is skipped because
    /// the endpoint may not have rolled up its most recent samples yet.
    pub fn for_lookback(endpoint_now: DateTime<Utc>, lookback_minutes: u32) -> Self {
        Self {
            start: endpoint_now - Duration::minutes(i64::from(lookback_minutes) + 1),
            end: endpoint_now - Duration::minutes(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleQuery {
    pub counter_id: i32,
    pub instance: InstanceSelector,
    pub entity: EntityRef,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub interval_seconds: u32,
}

impl SampleQuery {
    pub fn new(
        counter_id: i32,
        instance: InstanceSelector,
        entity: EntityRef,
        window: MetricWindow,
    ) -> Self {
        Self {
            counter_id,
            instance,
            entity,
            start_time: window.start,
            end_time: window.end,
            interval_seconds: NATIVE_INTERVAL_SECS,
        }
    }
}

/// Samples for one device instance ("" for the aggregate instance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSeries {
    #[serde(default)]
    pub instance: String,
    pub values: Vec<i64>,
}

/// Everything returned for one query; several instances when the selector is `PerDevice`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleSeries {
    pub instances: Vec<InstanceSeries>,
}

impl SampleSeries {
    pub fn single(values: Vec<i64>) -> Self {
        Self {
            instances: vec![InstanceSeries {
                instance: String::new(),
                values,
            }],
        }
    }

    /// True when no instance carries a single sample.
    pub fn is_empty(&self) -> bool {
        self.instances.iter().all(|s| s.values.is_empty())
    }

    /// All samples across instances, instance order preserved.
    pub fn combined(&self) -> Vec<i64> {
        self.instances
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_spans_lookback_and_skips_last_minute() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let w = MetricWindow::for_lookback(now, 15);
        assert_eq!(w.start, Utc.with_ymd_and_hms(2024, 5, 1, 11, 44, 0).unwrap());
        assert_eq!(w.end, Utc.with_ymd_and_hms(2024, 5, 1, 11, 59, 0).unwrap());
    }

    #[test]
    fn instance_selector_wire_form() {
        assert_eq!(
            serde_json::to_string(&InstanceSelector::Aggregate).unwrap(),
            "\"\""
        );
        assert_eq!(
            serde_json::to_string(&InstanceSelector::PerDevice).unwrap(),
            "\"*\""
        );
        let back: InstanceSelector = serde_json::from_str("\"*\"").unwrap();
        assert_eq!(back, InstanceSelector::PerDevice);
        assert!(serde_json::from_str::<InstanceSelector>("\"scsi0:0\"").is_err());
    }

    #[test]
    fn series_with_only_empty_instances_is_empty() {
        let s = SampleSeries {
            instances: vec![
                InstanceSeries {
                    instance: "a".into(),
                    values: vec![],
                },
                InstanceSeries {
                    instance: "b".into(),
                    values: vec![],
                },
            ],
        };
        assert!(s.is_empty());
        assert!(SampleSeries::default().is_empty());
        assert!(!SampleSeries::single(vec![0]).is_empty());
    }

    #[test]
    fn combined_concatenates_instances_in_order() {
        let s = SampleSeries {
            instances: vec![
                InstanceSeries {
                    instance: "d1".into(),
                    values: vec![4, 6],
                },
                InstanceSeries {
                    instance: "d2".into(),
                    values: vec![2, 2],
                },
            ],
        };
        assert_eq!(s.combined(), vec![4, 6, 2, 2]);
    }
}
