//! The request lifecycle shared by both sessions.
//!
//! ```text
//!   Idle ──begin()──▶ Pending ──settle(Ok)──▶ Idle + Succeeded(value)
//!                        │
//!                        └──settle(Err)──▶ Idle + Failed
//! ```
//!
//! There is no cancel or timeout edge out of `Pending`. While pending,
//! `begin()` refuses to start another submission, which is what keeps the
//! submit affordance disabled.

use tracing::{debug, info, warn};

use healthlens_contracts::{
    error::HealthlensResult,
    ids::{RequestId, SessionId},
};

/// The outcome a session sees once its in-flight request settles.
///
/// Failures carry no cause. It has already been logged, and
/// the session only needs to know that it must show its fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum Settled<T> {
    Succeeded(T),
    Failed,
}

/// Tracks the single outstanding submission of one session.
#[derive(Debug, Clone)]
pub struct RequestLifecycle {
    /// Feature name used in log fields ("prediction", "chat").
    feature: &'static str,
    session_id: SessionId,
    next_id: RequestId,
    in_flight: Option<RequestId>,
}

impl RequestLifecycle {
    pub fn new(feature: &'static str, session_id: SessionId) -> Self {
        Self {
            feature,
            session_id,
            next_id: RequestId(0),
            in_flight: None,
        }
    }

    /// True between `begin()` and the matching `settle()`.
    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The id of the request currently in flight, if any.
    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    /// Start a new submission.
    ///
    /// Returns `None` if one is already pending; the caller must not issue
    /// a network call in that case.
    pub fn begin(&mut self) -> Option<RequestId> {
        if let Some(pending) = self.in_flight {
            debug!(
                session_id = %self.session_id,
                feature = self.feature,
                request_id = %pending,
                "submission ignored, request already pending"
            );
            return None;
        }

        let id = self.next_id;
        self.next_id = id.next();
        self.in_flight = Some(id);

        debug!(
            session_id = %self.session_id,
            feature = self.feature,
            request_id = %id,
            "request pending"
        );
        Some(id)
    }

    /// Finish the submission identified by `id`.
    ///
    /// Returns `None` when `id` is not the request in flight (a stale or
    /// duplicate settlement); session state must be left untouched then.
    /// Otherwise pending is cleared on both the success and the failure path.
    pub fn settle<T>(&mut self, id: RequestId, outcome: HealthlensResult<T>) -> Option<Settled<T>> {
        if self.in_flight != Some(id) {
            debug!(
                session_id = %self.session_id,
                feature = self.feature,
                request_id = %id,
                "discarding stale settlement"
            );
            return None;
        }
        self.in_flight = None;

        match outcome {
            Ok(value) => {
                info!(
                    session_id = %self.session_id,
                    feature = self.feature,
                    request_id = %id,
                    "request succeeded"
                );
                Some(Settled::Succeeded(value))
            }
            Err(error) => {
                warn!(
                    session_id = %self.session_id,
                    feature = self.feature,
                    request_id = %id,
                    error = %error,
                    "request failed"
                );
                Some(Settled::Failed)
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
