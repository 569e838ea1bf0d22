// Monitoring endpoint abstraction: counters, metric queries, inventory

mod http;

pub use http::HttpMonitoringClient;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::Result;
use crate::models::{CatalogEntry, EntityConfig, EntityRef, PowerState, SampleQuery, SampleSeries};

/// Everything the report core needs from the monitoring endpoint.
/// Shared read-only by all queries of a report build; the core never closes it.
#[async_trait]
pub trait MonitoringClient: Send + Sync {
    /// Endpoint clock; anchors every lookback window.
    async fn current_time(&self) -> Result<DateTime<Utc>>;

    /// All counters known to the endpoint; called once per session.
    async fn list_counter_catalog(&self) -> Result<Vec<CatalogEntry>>;

    async fn query_metric(&self, query: &SampleQuery) -> Result<SampleSeries>;

    /// `None` when no virtual machine has this exact name.
    async fn resolve_entity(&self, name: &str) -> Result<Option<EntityRef>>;

    async fn entity_power_state(&self, entity: &EntityRef) -> Result<PowerState>;

    async fn entity_snapshot(&self, entity: &EntityRef) -> Result<EntityConfig>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => f.write_str("http"),
            Scheme::Https => f.write_str("https"),
        }
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// How to reach and authenticate against the monitoring endpoint.
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    pub host: String,
    pub port: u16,
    pub scheme: Scheme,
    pub credentials: Credentials,
    pub skip_cert_verification: bool,
    pub query_timeout: Duration,
}

impl ConnectionOptions {
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}
