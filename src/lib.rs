// Library for the binary and tests to access modules

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod report;
pub mod routes;
pub mod session;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
