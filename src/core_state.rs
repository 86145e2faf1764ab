//! Transport-agnostic application state.
//!
//! `CoreState` is built once at startup, wrapped in `Arc`, and shared by
//! every request. It owns the session registry and the LLM service; all
//! per-user data lives inside the individual sessions.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use uuid::Uuid;

use crate::config::DEFAULT_SESSION_TIMEOUT_SECS;
use crate::llm::LlmClient;
use crate::llm_service::LlmService;
use crate::session_cache::{SessionHandle, SessionRegistry};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Internal lock poisoned")]
    LockPoisoned,
    #[error("Session not found")]
    SessionNotFound,
}

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    sessions: RwLock<SessionRegistry>,
    llm: LlmService,
    /// Inactivity threshold after which a session is evicted.
    pub session_timeout: Duration,
}

impl CoreState {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            sessions: RwLock::new(SessionRegistry::new()),
            llm: LlmService::new(client),
            session_timeout: Duration::from_secs(DEFAULT_SESSION_TIMEOUT_SECS),
        }
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    pub fn llm(&self) -> &LlmService {
        &self.llm
    }

    fn read_sessions(&self) -> Result<RwLockReadGuard<'_, SessionRegistry>, CoreError> {
        self.sessions.read().map_err(|_| CoreError::LockPoisoned)
    }

    fn write_sessions(&self) -> Result<RwLockWriteGuard<'_, SessionRegistry>, CoreError> {
        self.sessions.write().map_err(|_| CoreError::LockPoisoned)
    }

    // ── Session lifecycle ───────────────────────────────────

    /// Start a session, evicting idle ones first.
    pub fn create_session(&self) -> Result<Arc<SessionHandle>, CoreError> {
        let mut registry = self.write_sessions()?;
        let evicted = registry.evict_idle(self.session_timeout);
        if evicted > 0 {
            tracing::info!(evicted, "Idle sessions evicted");
        }
        let handle = registry.create();
        tracing::info!(session_id = %handle.id(), active = registry.len(), "Session created");
        Ok(handle)
    }

    /// Resolve a live session and mark it active.
    pub fn session(&self, id: &Uuid) -> Result<Arc<SessionHandle>, CoreError> {
        let handle = self
            .read_sessions()?
            .get(id)
            .ok_or(CoreError::SessionNotFound)?;
        if handle.idle_for() >= self.session_timeout {
            self.write_sessions()?.end(id);
            tracing::info!(session_id = %id, "Session expired");
            return Err(CoreError::SessionNotFound);
        }
        handle.touch();
        Ok(handle)
    }

    pub fn end_session(&self, id: &Uuid) -> Result<(), CoreError> {
        if self.write_sessions()?.end(id) {
            tracing::info!(session_id = %id, "Session ended");
            Ok(())
        } else {
            Err(CoreError::SessionNotFound)
        }
    }

    pub fn session_count(&self) -> usize {
        self.read_sessions().map(|r| r.len()).unwrap_or(0)
    }
}
