// Session: monitoring client handle + counter catalog resolved once per connection

use std::sync::Arc;
use tracing::info;

use crate::client::{ConnectionOptions, HttpMonitoringClient, MonitoringClient};
use crate::error::Result;
use crate::models::CounterCatalog;

pub struct Session {
    client: Arc<dyn MonitoringClient>,
    catalog: CounterCatalog,
}

impl Session {
    /// Connects over HTTP and resolves the counter catalog.
    pub async fn connect(options: &ConnectionOptions) -> Result<Self> {
        let client = HttpMonitoringClient::connect(options).await?;
        Self::open(Arc::new(client)).await
    }

    /// Wraps an existing client handle; the catalog is fetched exactly once here.
    pub async fn open(client: Arc<dyn MonitoringClient>) -> Result<Self> {
        let entries = client.list_counter_catalog().await?;
        let catalog = CounterCatalog::resolve(&entries);
        info!(counters = catalog.len(), "resolved performance counter catalog");
        Ok(Self { client, catalog })
    }

    pub fn client(&self) -> &dyn MonitoringClient {
        self.client.as_ref()
    }

    pub fn catalog(&self) -> &CounterCatalog {
        &self.catalog
    }
}
