//! reqwest-backed implementation of both service traits.
//!
//! Each contract is one JSON `POST`. Every way a call can go wrong maps to
//! a `ServiceError` variant carrying the endpoint:
//!
//! - the request never completes        → `Transport`
//! - a non-2xx status                   → `Status` (with the response body)
//! - a 2xx body that is not the contract → `Decode`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use healthlens_contracts::{
    chat::{ChatReply, ChatRequest},
    error::{HealthlensResult, ServiceError},
    prediction::{PredictionRequest, PredictionResult},
};
use healthlens_core::traits::{ChatService, PredictionService};

use crate::config::ClientConfig;

/// HTTP client for the prediction and chat services.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpServiceClient {
    config: ClientConfig,
    client: Client,
}

impl HttpServiceClient {
    /// Build a client for `config`.
    ///
    /// Returns `ServiceError::Config` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: ClientConfig) -> HealthlensResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| ServiceError::Config {
            reason: format!("failed to build HTTP client: {}", e),
        })?;

        Ok(Self { config, client })
    }

    async fn post_json<B, T>(&self, endpoint: String, body: &B) -> HealthlensResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(endpoint = %endpoint, "POST");

        let response = self
            .client
            .post(&endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Transport {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ServiceError::Transport {
            endpoint: endpoint.clone(),
            reason: format!("failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            return Err(ServiceError::Status {
                endpoint,
                status: status.as_u16(),
                body: text,
            });
        }

        debug!(endpoint = %endpoint, status = status.as_u16(), bytes = text.len(), "response received");

        serde_json::from_str(&text).map_err(|e| ServiceError::Decode {
            endpoint,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl PredictionService for HttpServiceClient {
    async fn predict(&self, request: &PredictionRequest) -> HealthlensResult<PredictionResult> {
        self.post_json(self.config.predict_url(), request).await
    }
}

#[async_trait]
impl ChatService for HttpServiceClient {
    async fn send_message(&self, request: &ChatRequest) -> HealthlensResult<ChatReply> {
        self.post_json(self.config.chat_url(), request).await
    }
}
