//! Executes session effects against the backing services.
//!
//! The driver is the only place a service is called. It never touches
//! session state: it turns an `Effect` into a `Settlement`, and the owner of
//! the session applies that settlement as a message. Front ends run
//! `execute` on a background task and post the settlement back to their
//! single-threaded event loop.

use std::sync::Arc;

use tracing::debug;

use healthlens_contracts::{
    chat::ChatReply,
    error::HealthlensResult,
    ids::RequestId,
    prediction::PredictionResult,
};

use crate::{
    chat::{ChatMsg, ChatSession},
    effect::Effect,
    prediction::{PredictionMsg, PredictionSession},
    traits::{ChatService, PredictionService},
};

/// The outcome of one executed effect, tagged with its request id.
#[derive(Debug)]
pub enum Settlement {
    Prediction {
        id: RequestId,
        outcome: HealthlensResult<PredictionResult>,
    },
    Chat {
        id: RequestId,
        outcome: HealthlensResult<ChatReply>,
    },
}

/// The pair of services a front end talks to.
#[derive(Clone)]
pub struct Services {
    pub prediction: Arc<dyn PredictionService>,
    pub chat: Arc<dyn ChatService>,
}

impl Services {
    pub fn new(prediction: Arc<dyn PredictionService>, chat: Arc<dyn ChatService>) -> Self {
        Self { prediction, chat }
    }

    /// Perform the network call an effect describes.
    ///
    /// Errors are returned inside the settlement untouched; turning them
    /// into user-facing fallbacks is the session's job.
    pub async fn execute(&self, effect: Effect) -> Settlement {
        match effect {
            Effect::Predict { id, request } => {
                debug!(request_id = %id, "calling prediction service");
                let outcome = self.prediction.predict(&request).await;
                Settlement::Prediction { id, outcome }
            }
            Effect::Chat { id, request } => {
                debug!(request_id = %id, "calling chat service");
                let outcome = self.chat.send_message(&request).await;
                Settlement::Chat { id, outcome }
            }
        }
    }
}

/// Route a settlement back to the session that issued it.
pub fn apply(settlement: Settlement, prediction: &mut PredictionSession, chat: &mut ChatSession) {
    match settlement {
        Settlement::Prediction { id, outcome } => {
            prediction.update(PredictionMsg::Settled { id, outcome });
        }
        Settlement::Chat { id, outcome } => {
            chat.update(ChatMsg::Settled { id, outcome });
        }
    }
}

/// Submit the prediction form and wait for it to settle.
///
/// Convenience for front ends without an event loop (the CLI). A submit
/// refused because one is already pending is a no-op.
pub async fn submit_prediction(session: &mut PredictionSession, services: &Services) {
    if let Some(effect) = session.update(PredictionMsg::Submit) {
        if let Settlement::Prediction { id, outcome } = services.execute(effect).await {
            session.update(PredictionMsg::Settled { id, outcome });
        }
    }
}

/// Send `text` as the next chat message and wait for the reply turn.
pub async fn submit_chat(session: &mut ChatSession, services: &Services, text: &str) {
    session.update(ChatMsg::UpdateDraft(text.to_string()));
    if let Some(effect) = session.update(ChatMsg::Submit) {
        if let Settlement::Chat { id, outcome } = services.execute(effect).await {
            session.update(ChatMsg::Settled { id, outcome });
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
