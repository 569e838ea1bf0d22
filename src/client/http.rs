// JSON monitoring gateway client via reqwest

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

use super::{ConnectionOptions, Credentials, MonitoringClient};
use crate::error::{ReportError, Result};
use crate::models::{
    CatalogEntry, EntityConfig, EntityRef, EntitySummary, PowerState, SampleQuery, SampleSeries,
};
use crate::version::user_agent;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeResponse {
    current_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PowerResponse {
    power_state: PowerState,
}

pub struct HttpMonitoringClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    query_timeout: Duration,
}

impl HttpMonitoringClient {
    /// Builds the HTTP client and performs the login handshake (`GET /api/time`).
    pub async fn connect(options: &ConnectionOptions) -> Result<Self> {
        let endpoint = options.base_url();
        let failed = |reason: String| ReportError::ConnectionFailed {
            endpoint: endpoint.clone(),
            reason,
        };

        let base_url = Url::parse(&endpoint).map_err(|e| failed(e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(options.query_timeout)
            .user_agent(user_agent())
            .danger_accept_invalid_certs(options.skip_cert_verification)
            .build()
            .map_err(|e| failed(e.to_string()))?;
        let client = Self {
            http,
            base_url,
            credentials: options.credentials.clone(),
            query_timeout: options.query_timeout,
        };

        let url = client.url(&["api", "time"])?;
        let resp = client
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(failed(format!(
                "authentication rejected for user {}",
                client.credentials.user
            )));
        }
        if !status.is_success() {
            return Err(failed(format!("handshake returned {}", status)));
        }
        let time: TimeResponse = resp.json().await.map_err(|e| failed(e.to_string()))?;
        info!(
            endpoint = %endpoint,
            endpoint_time = %time.current_time,
            skip_cert_verification = options.skip_cert_verification,
            "connected to monitoring endpoint"
        );
        Ok(client)
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ReportError::Endpoint {
                reason: format!("{} cannot be used as a base URL", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.credentials.user, Some(&self.credentials.password))
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response> {
        builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ReportError::QueryTimeout {
                    request: what.to_string(),
                    timeout: self.query_timeout,
                }
            } else if e.is_connect() {
                ReportError::ConnectionFailed {
                    endpoint: self.base_url.as_str().trim_end_matches('/').to_string(),
                    reason: format!("{}: {}", what, e),
                }
            } else {
                ReportError::Endpoint {
                    reason: format!("{}: {}", what, e),
                }
            }
        })
    }

    async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ReportError::Endpoint {
                reason: format!("{} returned {}: {}", what, status, body.trim()),
            });
        }
        resp.json::<T>().await.map_err(|e| ReportError::Endpoint {
            reason: format!("decoding {}: {}", what, e),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], what: &str) -> Result<T> {
        let url = self.url(segments)?;
        let resp = self.send(self.request(Method::GET, url), what).await?;
        Self::decode(resp, what).await
    }

    /// Like `get_json`, but a 404 means the entity vanished from inventory.
    async fn get_entity_json<T: DeserializeOwned>(
        &self,
        entity: &EntityRef,
        leaf: &str,
    ) -> Result<T> {
        let what = format!("vm {} {}", entity, leaf);
        let url = self.url(&["api", "vms", entity.as_str(), leaf])?;
        let resp = self.send(self.request(Method::GET, url), &what).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ReportError::EntityNotFound {
                name: entity.to_string(),
            });
        }
        Self::decode(resp, &what).await
    }
}

#[async_trait]
impl MonitoringClient for HttpMonitoringClient {
    async fn current_time(&self) -> Result<DateTime<Utc>> {
        let time: TimeResponse = self.get_json(&["api", "time"], "endpoint time").await?;
        Ok(time.current_time)
    }

    async fn list_counter_catalog(&self) -> Result<Vec<CatalogEntry>> {
        self.get_json(&["api", "perf", "counters"], "counter catalog")
            .await
    }

    async fn query_metric(&self, query: &SampleQuery) -> Result<SampleSeries> {
        let what = format!("counter {}", query.counter_id);
        debug!(
            counter_id = query.counter_id,
            instance = query.instance.as_str(),
            entity = %query.entity,
            start = %query.start_time,
            end = %query.end_time,
            "querying metric"
        );
        let url = self.url(&["api", "perf", "query"])?;
        let resp = self
            .send(self.request(Method::POST, url).json(query), &what)
            .await?;
        Self::decode(resp, &what).await
    }

    async fn resolve_entity(&self, name: &str) -> Result<Option<EntityRef>> {
        let url = self.url(&["api", "vms"])?;
        let what = format!("inventory lookup of {}", name);
        let resp = self
            .send(
                self.request(Method::GET, url).query(&[("name", name)]),
                &what,
            )
            .await?;
        let found: Vec<EntitySummary> = Self::decode(resp, &what).await?;
        Ok(found
            .into_iter()
            .find(|e| e.name == name)
            .map(|e| e.entity))
    }

    async fn entity_power_state(&self, entity: &EntityRef) -> Result<PowerState> {
        let power: PowerResponse = self.get_entity_json(entity, "power").await?;
        Ok(power.power_state)
    }

    async fn entity_snapshot(&self, entity: &EntityRef) -> Result<EntityConfig> {
        self.get_entity_json(entity, "config").await
    }
}
