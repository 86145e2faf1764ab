//! Feature handlers.
//!
//! Every handler has the same shape: validate input, build a prompt, mark
//! the feature pending, call the LLM with the session unlocked, then lock
//! again to record the outcome. One LLM call may be in flight per session.

pub mod chat;
pub mod conditions;
pub mod parse;
pub mod profile;
pub mod reports;
pub mod symptoms;
pub mod treatments;

use chrono::Utc;

use crate::core_state::{CoreError, CoreState};
use crate::llm::LlmError;
use crate::models::{Feature, InvocationStatus, ModelError};
use crate::session::{SessionState, StateError};
use crate::session_cache::SessionHandle;

use parse::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Another AI request is still running for this session ({0})")]
    Busy(Feature),

    #[error("AI service failed: {0}")]
    Llm(#[from] LlmError),

    #[error("{message}")]
    InvalidAiResponse {
        message: &'static str,
        source: ParseError,
    },

    #[error("Session state error: {0}")]
    State(#[from] StateError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<ModelError> for FeatureError {
    fn from(err: ModelError) -> Self {
        FeatureError::InvalidInput(err.to_string())
    }
}

// ═══════════════════════════════════════════════════════════
// Invocation: Idle → Pending → Resolved | Failed
// ═══════════════════════════════════════════════════════════

/// One in-flight LLM call for a session.
///
/// Created in the pending state. If it is dropped without being settled
/// (the request was cancelled mid-call) it records a failure, so the
/// session never stays busy.
pub(crate) struct Invocation<'a> {
    core: &'a CoreState,
    session: &'a SessionHandle,
    feature: Feature,
    settled: bool,
}

impl<'a> Invocation<'a> {
    /// Mark `feature` pending on a locked session, or fail if the session
    /// already has a call in flight.
    pub(crate) fn begin(
        core: &'a CoreState,
        session: &'a SessionHandle,
        state: &mut SessionState,
        feature: Feature,
    ) -> Result<Self, FeatureError> {
        if let Some(running) = state.pending_feature() {
            return Err(FeatureError::Busy(running));
        }
        state.set_invocation(
            feature,
            &InvocationStatus::Pending {
                started_at: Utc::now(),
            },
        )?;
        Ok(Self {
            core,
            session,
            feature,
            settled: false,
        })
    }

    /// Run the completion. The session must not be locked by the caller.
    pub(crate) async fn complete(&self, prompt: String) -> Result<String, LlmError> {
        self.core
            .llm()
            .complete(self.session.id(), self.feature, prompt)
            .await
    }

    pub(crate) fn resolve(
        mut self,
        state: &mut SessionState,
        text: Option<String>,
    ) -> Result<InvocationStatus, FeatureError> {
        self.settled = true;
        let status = InvocationStatus::Resolved {
            finished_at: Utc::now(),
            text,
        };
        state.set_invocation(self.feature, &status)?;
        Ok(status)
    }

    pub(crate) fn fail(
        mut self,
        state: &mut SessionState,
        error: &str,
    ) -> Result<InvocationStatus, FeatureError> {
        self.settled = true;
        let status = InvocationStatus::Failed {
            finished_at: Utc::now(),
            error: error.to_string(),
        };
        state.set_invocation(self.feature, &status)?;
        Ok(status)
    }
}

impl Drop for Invocation<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        tracing::warn!(
            session_id = %self.session.id(),
            feature = %self.feature,
            "LLM call abandoned before completion"
        );
        if let Ok(mut state) = self.session.lock() {
            let _ = state.set_invocation(
                self.feature,
                &InvocationStatus::Failed {
                    finished_at: Utc::now(),
                    error: "Request was interrupted".into(),
                },
            );
        }
    }
}

/// Lock the session and start an invocation in one step.
pub(crate) fn start<'a>(
    core: &'a CoreState,
    session: &'a SessionHandle,
    feature: Feature,
) -> Result<Invocation<'a>, FeatureError> {
    let mut state = session.lock()?;
    Invocation::begin(core, session, &mut state, feature)
}
