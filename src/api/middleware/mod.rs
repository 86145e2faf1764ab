//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Session resolver: `X-Session-Id` → live session
//! 2. Audit logger: logs after resolution, has the session id

pub mod audit;
pub mod session;
