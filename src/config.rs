use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::client::{ConnectionOptions, Credentials, Scheme};

/// Env var that overrides `endpoint.password`.
pub const PASSWORD_ENV: &str = "VMINFO_PASSWORD";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub host: String,
    #[serde(default = "default_endpoint_port")]
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub scheme: Scheme,
    /// Accept self-signed or otherwise invalid TLS certificates.
    #[serde(default)]
    pub skip_cert_verification: bool,
    /// Upper bound for each individual request to the endpoint.
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
}

fn default_endpoint_port() -> u16 {
    443
}

fn default_query_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_lookback_minutes")]
    pub default_lookback_minutes: u32,
    /// Issue the counter queries of one report concurrently instead of one by one.
    #[serde(default = "default_concurrent_queries")]
    pub concurrent_queries: bool,
}

fn default_lookback_minutes() -> u32 {
    15
}

fn default_concurrent_queries() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_lookback_minutes: default_lookback_minutes(),
            concurrent_queries: default_concurrent_queries(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "0.0.0.0".into()
}

fn default_server_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        Self::load_from_path(Path::new(&path))
    }

    /// Reads the file, then applies the password env override.
    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;
        let mut config = Self::load_from_str(&s)?;
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            config.endpoint.password = Some(password);
        }
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.endpoint.host.trim().is_empty(),
            "endpoint.host must be non-empty"
        );
        anyhow::ensure!(
            self.endpoint.port > 0,
            "endpoint.port must be between 1 and 65535, got {}",
            self.endpoint.port
        );
        anyhow::ensure!(
            !self.endpoint.user.trim().is_empty(),
            "endpoint.user must be non-empty"
        );
        anyhow::ensure!(
            self.endpoint.query_timeout_secs > 0,
            "endpoint.query_timeout_secs must be > 0, got {}",
            self.endpoint.query_timeout_secs
        );
        anyhow::ensure!(
            self.report.default_lookback_minutes > 0,
            "report.default_lookback_minutes must be > 0, got {}",
            self.report.default_lookback_minutes
        );
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        Ok(())
    }

    /// Connection value object for the monitoring client. Fails when no password is known.
    pub fn connection_options(&self) -> anyhow::Result<ConnectionOptions> {
        self.connection_options_with(|_| Err(missing_password()))
    }

    /// Like `connection_options`, but asks `prompt` for the password when none is configured.
    pub fn connection_options_with<F>(&self, prompt: F) -> anyhow::Result<ConnectionOptions>
    where
        F: FnOnce(&str) -> anyhow::Result<String>,
    {
        let password = match &self.endpoint.password {
            Some(p) => p.clone(),
            None => prompt(&format!(
                "Enter password for host {} and user {}: ",
                self.endpoint.host, self.endpoint.user
            ))?,
        };
        Ok(ConnectionOptions {
            host: self.endpoint.host.clone(),
            port: self.endpoint.port,
            scheme: self.endpoint.scheme,
            credentials: Credentials {
                user: self.endpoint.user.clone(),
                password,
            },
            skip_cert_verification: self.endpoint.skip_cert_verification,
            query_timeout: Duration::from_secs(self.endpoint.query_timeout_secs),
        })
    }
}

/// Error for a connection attempt without any password source.
pub fn missing_password() -> anyhow::Error {
    anyhow::anyhow!(
        "endpoint.password is not set (use the config file, --password or {})",
        PASSWORD_ENV
    )
}
