//! The conversational session.
//!
//! The transcript is append-only: every accepted submit appends exactly one
//! user turn immediately and exactly one assistant turn when the request
//! settles, whatever the outcome. Nothing is ever removed or edited.

use chrono::Utc;
use tracing::debug;

use healthlens_contracts::{
    chat::{ChatReply, ChatRequest, ChatTurn, Role, Sentiment},
    error::HealthlensResult,
    ids::{RequestId, SessionId},
};

use crate::{
    effect::Effect,
    lifecycle::{RequestLifecycle, Settled},
};

/// The assistant turn every conversation starts with.
pub const GREETING: &str = "Namaste! I'm MannMitra 🌿 - your compassionate companion for mental wellness. I'm here to listen and support you. How are you feeling today?";

/// The assistant turn appended when a chat request fails.
pub const APOLOGY: &str =
    "I apologize, I'm having trouble connecting right now. Please try again in a moment.";

// ── Transcript ────────────────────────────────────────────────────────────────

/// Ordered, append-only list of turns. Insertion order is conversation
/// order; `sequence` equals the index of the turn.
#[derive(Debug, Clone)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    /// A transcript holding only the assistant greeting.
    pub fn seeded() -> Self {
        let mut transcript = Self { turns: Vec::new() };
        transcript.append(Role::Assistant, GREETING.to_string(), None, None);
        transcript
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    fn append(
        &mut self,
        role: Role,
        content: String,
        sentiment: Option<Sentiment>,
        confidence: Option<f64>,
    ) -> &ChatTurn {
        let sequence = self.turns.len() as u64;
        self.turns.push(ChatTurn {
            sequence,
            role,
            content,
            sentiment,
            confidence,
            sent_at: Utc::now(),
        });
        &self.turns[self.turns.len() - 1]
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// One message per chat operation.
#[derive(Debug)]
pub enum ChatMsg {
    UpdateDraft(String),
    Submit,
    Settled {
        id: RequestId,
        outcome: HealthlensResult<ChatReply>,
    },
}

/// Client-owned state machine for one conversation.
#[derive(Debug, Clone)]
pub struct ChatSession {
    session_id: SessionId,
    transcript: Transcript,
    lifecycle: RequestLifecycle,
    draft: String,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        let session_id = SessionId::new();
        Self {
            session_id,
            transcript: Transcript::seeded(),
            lifecycle: RequestLifecycle::new("chat", session_id),
            draft: String::new(),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_pending(&self) -> bool {
        self.lifecycle.is_pending()
    }

    /// Whether a submit right now would be accepted.
    pub fn can_submit(&self) -> bool {
        !self.is_pending() && !self.draft.trim().is_empty()
    }

    /// Apply one message. Returns the network call to make, if any.
    pub fn update(&mut self, msg: ChatMsg) -> Option<Effect> {
        match msg {
            ChatMsg::UpdateDraft(text) => {
                self.draft = text;
                None
            }
            ChatMsg::Submit => self.submit(),
            ChatMsg::Settled { id, outcome } => {
                self.settle(id, outcome);
                None
            }
        }
    }

    fn submit(&mut self) -> Option<Effect> {
        let message = self.draft.trim();
        if message.is_empty() {
            return None;
        }
        let message = message.to_string();
        let id = self.lifecycle.begin()?;

        // The draft is free for the next message while this one is in flight.
        self.draft.clear();
        let turn = self
            .transcript
            .append(Role::User, message.clone(), None, None);

        debug!(
            session_id = %self.session_id,
            request_id = %id,
            turn = turn.sequence,
            "chat message submitted"
        );
        Some(Effect::Chat {
            id,
            request: ChatRequest { message },
        })
    }

    fn settle(&mut self, id: RequestId, outcome: HealthlensResult<ChatReply>) {
        let turn = match self.lifecycle.settle(id, outcome) {
            Some(Settled::Succeeded(reply)) => {
                let content = reply.content().to_string();
                self.transcript
                    .append(Role::Assistant, content, reply.sentiment, reply.confidence)
            }
            Some(Settled::Failed) => {
                self.transcript
                    .append(Role::Assistant, APOLOGY.to_string(), None, None)
            }
            None => return,
        };

        debug!(
            session_id = %self.session_id,
            request_id = %id,
            turn = turn.sequence,
            "assistant turn appended"
        );
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
