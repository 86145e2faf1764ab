//! Session registry.
//!
//! Holds one isolated `SessionState` per interactive user.
//!
//! Key properties:
//! - State exists only in memory: never persisted to disk
//! - Each session has its own lock; nothing is shared between sessions
//! - Ending a session drops its state
//! - Idle sessions are evicted once they exceed the inactivity timeout

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::core_state::CoreError;
use crate::session::SessionState;

// ═══════════════════════════════════════════════════════════
// SessionHandle: one live session
// ═══════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct SessionHandle {
    id: Uuid,
    state: Mutex<SessionState>,
    last_activity: Mutex<Instant>,
}

impl SessionHandle {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            state: Mutex::new(SessionState::new(id)),
            last_activity: Mutex::new(Instant::now()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Lock the session state. Never hold the guard across an `.await`.
    pub fn lock(&self) -> Result<MutexGuard<'_, SessionState>, CoreError> {
        self.state.lock().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn touch(&self) {
        if let Ok(mut last) = self.last_activity.lock() {
            *last = Instant::now();
        }
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity
            .lock()
            .map(|last| last.elapsed())
            .unwrap_or(Duration::ZERO)
    }
}

// ═══════════════════════════════════════════════════════════
// SessionRegistry: all live sessions
// ═══════════════════════════════════════════════════════════

pub struct SessionRegistry {
    sessions: HashMap<Uuid, Arc<SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Start a new session with freshly initialised state.
    pub fn create(&mut self) -> Arc<SessionHandle> {
        let id = Uuid::new_v4();
        let handle = Arc::new(SessionHandle::new(id));
        self.sessions.insert(id, Arc::clone(&handle));
        handle
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<SessionHandle>> {
        self.sessions.get(id).cloned()
    }

    /// Drop a session. Returns `false` if it did not exist.
    pub fn end(&mut self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Drop every session idle for at least `timeout`. Returns how many.
    pub fn evict_idle(&mut self, timeout: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, handle| handle.idle_for() < timeout);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
