//! Centralized LLM access: single point of entry for every completion.
//!
//! The client is blocking, so each call runs on the blocking thread pool
//! and the async request handler simply awaits it. The service also tracks
//! which operations are in flight, per session, for observability.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Serialize;
use uuid::Uuid;

use crate::llm::{GenerationParams, LlmClient, LlmError};
use crate::models::Feature;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Snapshot of a running completion.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveOperation {
    pub session_id: Uuid,
    pub feature: Feature,
    /// When the operation started (ISO 8601).
    pub started_at: String,
}

/// Read-only LLM configuration, safe to display.
#[derive(Debug, Clone, Serialize)]
pub struct LlmSettings {
    pub model_id: String,
    pub params: GenerationParams,
}

// ═══════════════════════════════════════════════════════════
// LlmService
// ═══════════════════════════════════════════════════════════

pub struct LlmService {
    client: Arc<dyn LlmClient>,
    active: Mutex<HashMap<Uuid, ActiveOperation>>,
}

impl LlmService {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            active: Mutex::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> LlmSettings {
        LlmSettings {
            model_id: self.client.model_id().to_string(),
            params: self.client.params().clone(),
        }
    }

    /// Run one completion for `session_id` off the async executor.
    ///
    /// One round trip, no retry. The in-flight record is cleared when the
    /// call finishes or the caller's future is dropped.
    pub async fn complete(
        &self,
        session_id: Uuid,
        feature: Feature,
        prompt: String,
    ) -> Result<String, LlmError> {
        let _op = self.track(session_id, feature);
        let client = Arc::clone(&self.client);
        let started = Instant::now();

        tracing::info!(%session_id, %feature, prompt_chars = prompt.len(), "LLM call started");

        let result = tokio::task::spawn_blocking(move || client.complete(&prompt))
            .await
            .map_err(|e| LlmError::Task(e.to_string()))?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(text) => {
                tracing::info!(%session_id, %feature, elapsed_ms, reply_chars = text.len(), "LLM call finished")
            }
            Err(e) => tracing::warn!(%session_id, %feature, elapsed_ms, error = %e, "LLM call failed"),
        }
        result
    }

    /// Operations currently in flight.
    pub fn active_operations(&self) -> Vec<ActiveOperation> {
        self.active
            .lock()
            .map(|ops| ops.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_busy(&self) -> bool {
        !self.active_operations().is_empty()
    }

    // ── Internal ────────────────────────────────────────────

    fn track(&self, session_id: Uuid, feature: Feature) -> OperationGuard<'_> {
        if let Ok(mut ops) = self.active.lock() {
            ops.insert(
                session_id,
                ActiveOperation {
                    session_id,
                    feature,
                    started_at: chrono::Utc::now().to_rfc3339(),
                },
            );
        }
        OperationGuard {
            service: self,
            session_id,
        }
    }

    fn clear(&self, session_id: Uuid) {
        if let Ok(mut ops) = self.active.lock() {
            ops.remove(&session_id);
        }
    }
}

/// Clears the in-flight record on drop.
struct OperationGuard<'a> {
    service: &'a LlmService,
    session_id: Uuid,
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.service.clear(self.session_id);
    }
}
