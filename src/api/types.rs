//! Shared types for the API layer.

use std::sync::Arc;

use crate::core_state::CoreState;
use crate::session_cache::SessionHandle;

/// Header carrying the session id on every session-scoped route.
pub const SESSION_HEADER: &str = "X-Session-Id";

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

// ═══════════════════════════════════════════════════════════
// Session context: injected by the session middleware
// ═══════════════════════════════════════════════════════════

/// Resolved session, inserted into request extensions after the
/// `X-Session-Id` header has been validated.
#[derive(Clone)]
pub struct SessionContext {
    pub handle: Arc<SessionHandle>,
}

impl SessionContext {
    pub fn id(&self) -> uuid::Uuid {
        self.handle.id()
    }
}
