//! # healthlens-client
//!
//! HTTP implementations of the HealthLens service traits, plus client
//! configuration loading.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use healthlens_client::{ClientConfig, HttpServiceClient};
//! use healthlens_core::driver::Services;
//!
//! let client = Arc::new(HttpServiceClient::new(ClientConfig::load(None)?)?);
//! let services = Services::new(client.clone(), client);
//! ```

pub mod config;
pub mod http;

use std::sync::Arc;

use healthlens_contracts::error::HealthlensResult;
use healthlens_core::driver::Services;

pub use config::ClientConfig;
pub use http::HttpServiceClient;

/// Build the service pair both front ends use, backed by one HTTP client.
pub fn http_services(config: ClientConfig) -> HealthlensResult<Services> {
    let client = Arc::new(HttpServiceClient::new(config)?);
    Ok(Services::new(client.clone(), client))
}
