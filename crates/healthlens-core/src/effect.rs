//! Side effects requested by session updates.
//!
//! Sessions never perform I/O themselves. When a submit is accepted, the
//! session returns an `Effect`; the runtime executes it (see
//! [`crate::driver`]) and feeds the outcome back as a `Settled` message
//! carrying the same `RequestId`.

use healthlens_contracts::{chat::ChatRequest, ids::RequestId, prediction::PredictionRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Call the prediction contract.
    Predict {
        id: RequestId,
        request: PredictionRequest,
    },
    /// Call the chat contract.
    Chat { id: RequestId, request: ChatRequest },
}

impl Effect {
    pub fn request_id(&self) -> RequestId {
        match self {
            Effect::Predict { id, .. } | Effect::Chat { id, .. } => *id,
        }
    }
}
