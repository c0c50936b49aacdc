//! Conversational contract and transcript turn types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content used when a chat response carries neither `response` nor `message`.
pub const DEFAULT_REPLY: &str = "I'm here to listen.";

/// Who authored a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Mood the chat service detected in the user's latest message.
///
/// `Other` keeps any value outside the three known tags so it can still be
/// displayed with the neutral appearance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Other(String),
}

impl Sentiment {
    pub fn as_str(&self) -> &str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Other(raw) => raw,
        }
    }
}

impl From<String> for Sentiment {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            "neutral" => Sentiment::Neutral,
            _ => Sentiment::Other(raw),
        }
    }
}

impl From<&str> for Sentiment {
    fn from(raw: &str) -> Self {
        Sentiment::from(raw.to_string())
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a chat transcript.
///
/// Turns are immutable once appended. `sentiment` and `confidence` are only
/// ever set on assistant turns built from a service reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Position in the transcript; the seeded greeting is 0.
    pub sequence: u64,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    /// Classifier confidence in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// When the turn was appended (UTC).
    pub sent_at: DateTime<Utc>,
}

/// Request body of the chat contract: only the latest user utterance.
/// Conversational memory, if any, lives on the service side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Successful response of the chat contract. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl ChatReply {
    /// The text to show for this reply: `response`, else `message`, else
    /// [`DEFAULT_REPLY`]. Empty strings count as missing.
    pub fn content(&self) -> &str {
        self.response
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.message.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(DEFAULT_REPLY)
    }
}
