//! HTTP API.
//!
//! Exposes the assistant's sections and features as JSON endpoints.
//! Routes are nested under `/api/`; session-scoped routes are protected
//! by a middleware stack: Session → Audit → Handler.
//!
//! The router is composable: `api_router()` returns a `Router` that can
//! be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ServerInfo};
pub use types::ApiContext;
