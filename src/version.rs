// Package identity baked in at build time; also sent as the client User-Agent.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const NAME: &str = env!("CARGO_PKG_NAME");

/// "vminfo/<version>", sent with every request to the monitoring endpoint.
pub fn user_agent() -> String {
    format!("{}/{}", NAME, VERSION)
}
