// Shared test helpers
#![allow(dead_code)]

use std::sync::Arc;
use vminfo::config::AppConfig;
use vminfo::models::PowerState;
use vminfo::report::{ReportOptions, TargetOutcome, report_targets};
use vminfo::session::Session;
use vminfo::test_utils::{FakeMonitoringClient, fake_session};

pub const TEST_CONFIG: &str = r#"
[endpoint]
host = "vcenter.lab"
port = 443
user = "reporter"
password = "secret"

[report]
default_lookback_minutes = 15
concurrent_queries = true

[server]
port = 8081
host = "0.0.0.0"
"#;

pub fn test_app_config() -> AppConfig {
    AppConfig::load_from_str(TEST_CONFIG).unwrap()
}

/// Fake endpoint where every counter returns [10, 20, 30, 40, 50] and `names` are powered on.
pub fn healthy_fake(names: &[&str]) -> FakeMonitoringClient {
    names.iter().fold(
        FakeMonitoringClient::new().with_uniform_samples(&[10, 20, 30, 40, 50]),
        |fake, name| fake.with_entity(name, PowerState::PoweredOn),
    )
}

pub async fn run(
    fake: FakeMonitoringClient,
    names: &[&str],
    lookback: u32,
    options: &ReportOptions,
) -> (Vec<TargetOutcome>, Arc<FakeMonitoringClient>, Arc<Session>) {
    let (session, fake) = fake_session(fake).await;
    let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    let outcomes = report_targets(&session, &names, lookback, options)
        .await
        .expect("report_targets");
    (outcomes, fake, session)
}
