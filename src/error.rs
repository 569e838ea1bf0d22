// Error taxonomy for connecting, resolving targets and building reports.

use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

use crate::models::PowerState;

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    /// Cannot authenticate against or reach the monitoring endpoint.
    #[error("Could not connect to {endpoint}: {reason}")]
    ConnectionFailed { endpoint: String, reason: String },

    #[error("Virtual machine not found: {name}")]
    EntityNotFound { name: String },

    /// Target exists but is not powered on; no metrics are queried.
    #[error("Problem connecting to virtual machine {name}: it is {state}, not powered on")]
    EntityNotRunning { name: String, state: PowerState },

    /// Counter name absent from the session catalog (endpoint/version mismatch).
    #[error("Unknown performance counter: {name}")]
    UnknownCounter { name: String },

    #[error(
        "Performance results empty for {counter}. Check time drift on source and monitoring endpoint \
         (endpoint time: {endpoint_now}, window start: {start}, window end: {end})"
    )]
    MetricsUnavailable {
        counter: String,
        endpoint_now: DateTime<Utc>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Configured memory size of {name} is zero or missing")]
    InvalidMemorySize { name: String },

    #[error("Lookback interval must be at least 1 minute, got {minutes}")]
    InvalidLookback { minutes: u32 },

    /// `request` names a counter for metric queries, otherwise the inventory call.
    #[error("Request for {request} timed out after {}ms", timeout.as_millis())]
    QueryTimeout { request: String, timeout: Duration },

    /// Transport or decoding failure after the session was established.
    #[error("Monitoring endpoint request failed: {reason}")]
    Endpoint { reason: String },
}

impl ReportError {
    /// Errors that make every other target in the batch pointless too.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ReportError::ConnectionFailed { .. })
    }
}
