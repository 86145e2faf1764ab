//! API endpoint handlers.
//!
//! Each module corresponds to one section of the assistant. Handlers are
//! thin: they resolve the session and delegate to `crate::features`.

pub mod chat;
pub mod conditions;
pub mod debug;
pub mod health;
pub mod navigation;
pub mod profile;
pub mod reports;
pub mod sessions;
pub mod symptoms;
pub mod treatments;
