//! Error types for talking to the HealthLens backing services.
//!
//! Every failure a service call can produce is a `ServiceError`. Sessions
//! never show these to the user; the request lifecycle logs them and turns
//! them into a fixed, non-technical message.

use thiserror::Error;

/// The unified error type for service calls and client setup.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request never produced a response (connection refused, DNS,
    /// timeout, broken body stream).
    #[error("request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    /// The service answered with a non-success HTTP status.
    #[error("{endpoint} responded with status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body did not match the expected contract shape.
    #[error("response from {endpoint} could not be decoded: {reason}")]
    Decode { endpoint: String, reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Convenience alias used throughout the HealthLens crates.
pub type HealthlensResult<T> = Result<T, ServiceError>;
