//! Service seams the sessions' effects are executed against.
//!
//! - `PredictionService`: the remote inference/explanation service
//! - `ChatService`:       the remote sentiment-aware conversational service
//!
//! Both are external collaborators. The HTTP implementations live in
//! `healthlens-client`; tests substitute in-memory doubles.

use async_trait::async_trait;

use healthlens_contracts::{
    chat::{ChatReply, ChatRequest},
    error::HealthlensResult,
    prediction::{PredictionRequest, PredictionResult},
};

/// Scores a set of health parameters and explains the score.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Submit one prediction request.
    ///
    /// Any transport, status, or decode problem is returned as an error;
    /// implementations do not retry.
    async fn predict(&self, request: &PredictionRequest) -> HealthlensResult<PredictionResult>;
}

/// Classifies the user's mood and generates a reply.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send the latest user utterance and receive the assistant's reply.
    ///
    /// Only the single message is sent; the service owns any conversational
    /// memory.
    async fn send_message(&self, request: &ChatRequest) -> HealthlensResult<ChatReply>;
}
