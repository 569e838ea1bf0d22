// Report builder: resolve counters, query the lookback window, reduce, assemble sections.
// Stateless across calls; everything it needs comes in through the Session.

pub mod counters;
pub mod sections;
pub mod stats;

use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::client::MonitoringClient;
use crate::config::AppConfig;
use crate::error::{ReportError, Result};
use crate::models::{EntityRef, MetricWindow, Report, SampleQuery};
use crate::session::Session;
use counters::ReportCounter;
use stats::{CounterSamples, VmMetrics};

/// Knobs for one report build.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Fan the counter queries out concurrently; any failure still aborts the report.
    pub concurrent_queries: bool,
    pub query_timeout: Duration,
}

impl ReportOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            concurrent_queries: config.report.concurrent_queries,
            query_timeout: Duration::from_secs(config.endpoint.query_timeout_secs),
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            concurrent_queries: true,
            query_timeout: Duration::from_secs(30),
        }
    }
}

/// Result for one requested target name, in request order.
#[derive(Debug)]
pub struct TargetOutcome {
    pub name: String,
    pub result: Result<Report>,
}

/// Splits a comma separated target list; trims, drops blanks and repeats.
pub fn parse_target_names(list: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

struct QueryContext<'a> {
    client: &'a dyn MonitoringClient,
    entity: &'a EntityRef,
    window: MetricWindow,
    endpoint_now: DateTime<Utc>,
    timeout: Duration,
}

async fn fetch_counter(
    ctx: &QueryContext<'_>,
    counter: ReportCounter,
    counter_id: i32,
) -> Result<(ReportCounter, Vec<i64>)> {
    let query = SampleQuery::new(counter_id, counter.instance(), ctx.entity.clone(), ctx.window);
    let series = tokio::time::timeout(ctx.timeout, ctx.client.query_metric(&query))
        .await
        .map_err(|_| ReportError::QueryTimeout {
            request: counter.name().to_string(),
            timeout: ctx.timeout,
        })??;

    if series.is_empty() {
        warn!(
            counter = counter.name(),
            entity = %ctx.entity,
            endpoint_time = %ctx.endpoint_now,
            start = %ctx.window.start,
            end = %ctx.window.end,
            "performance results empty"
        );
        return Err(ReportError::MetricsUnavailable {
            counter: counter.name().to_string(),
            endpoint_now: ctx.endpoint_now,
            start: ctx.window.start,
            end: ctx.window.end,
        });
    }
    debug!(
        counter = counter.name(),
        instances = series.instances.len(),
        "received samples"
    );
    Ok((counter, series.combined()))
}

/// Builds the report for one powered-on entity. Any empty series fails the whole build.
pub async fn build_report(
    session: &Session,
    entity: &EntityRef,
    lookback_minutes: u32,
    endpoint_now: DateTime<Utc>,
    options: &ReportOptions,
) -> Result<Report> {
    if lookback_minutes == 0 {
        return Err(ReportError::InvalidLookback {
            minutes: lookback_minutes,
        });
    }

    // Resolve every counter before issuing the first query.
    let resolved = ReportCounter::ALL
        .iter()
        .map(|&c| session.catalog().lookup(c.name()).map(|id| (c, id)))
        .collect::<Result<Vec<_>>>()?;

    let ctx = QueryContext {
        client: session.client(),
        entity,
        window: MetricWindow::for_lookback(endpoint_now, lookback_minutes),
        endpoint_now,
        timeout: options.query_timeout,
    };

    let fetched = if options.concurrent_queries {
        try_join_all(resolved.iter().map(|&(c, id)| fetch_counter(&ctx, c, id))).await?
    } else {
        let mut out = Vec::with_capacity(resolved.len());
        for &(c, id) in &resolved {
            out.push(fetch_counter(&ctx, c, id).await?);
        }
        out
    };

    let mut samples = CounterSamples::default();
    for (counter, values) in fetched {
        samples.insert(counter, values);
    }
    let metrics = VmMetrics::from_samples(&samples, lookback_minutes);

    let config = session.client().entity_snapshot(entity).await?;
    sections::assemble(&config, &metrics, lookback_minutes)
}

async fn report_for_target(
    session: &Session,
    name: &str,
    lookback_minutes: u32,
    endpoint_now: DateTime<Utc>,
    options: &ReportOptions,
) -> Result<Report> {
    let entity = session
        .client()
        .resolve_entity(name)
        .await?
        .ok_or_else(|| ReportError::EntityNotFound {
            name: name.to_string(),
        })?;

    let state = session.client().entity_power_state(&entity).await?;
    if !state.is_running() {
        return Err(ReportError::EntityNotRunning {
            name: name.to_string(),
            state,
        });
    }

    build_report(session, &entity, lookback_minutes, endpoint_now, options).await
}

/// Reports every named target. The endpoint clock is read once per batch; a failure of
/// one target never stops the others unless the endpoint itself became unreachable.
pub async fn report_targets(
    session: &Session,
    names: &[String],
    lookback_minutes: u32,
    options: &ReportOptions,
) -> Result<Vec<TargetOutcome>> {
    let endpoint_now = session.client().current_time().await?;
    info!(
        targets = names.len(),
        lookback_minutes,
        endpoint_time = %endpoint_now,
        "building reports"
    );

    let mut outcomes = Vec::with_capacity(names.len());
    for name in names {
        let result = report_for_target(session, name, lookback_minutes, endpoint_now, options).await;
        let result = match result {
            Err(e) if e.is_fatal() => {
                warn!(entity = %name, error = %e, "endpoint lost, abandoning batch");
                return Err(e);
            }
            other => other,
        };
        match &result {
            Ok(_) => info!(entity = %name, "report built"),
            Err(e) => warn!(entity = %name, error = %e, "report failed"),
        }
        outcomes.push(TargetOutcome {
            name: name.clone(),
            result,
        });
    }
    Ok(outcomes)
}
