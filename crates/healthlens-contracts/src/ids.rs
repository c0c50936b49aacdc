//! Session and request identifiers.
//!
//! Both appear as structured fields in every log line a session emits, so
//! a single conversation or prediction form can be followed end to end.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for one session instance (one chat window or one
/// prediction form).
///
/// A session never shares state with another, so this is purely a
/// diagnostic handle; nothing is keyed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    /// Create a new, unique session ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Monotonic identifier of one submission within a session.
///
/// Issued by the request lifecycle when a submission starts and echoed back
/// with its settlement. A settlement carrying any id other than the one in
/// flight is stale and gets dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl RequestId {
    /// The id that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
