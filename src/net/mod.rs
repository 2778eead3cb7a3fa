//! Networking for the session verification service.
//!
//! SYSTEM CONTEXT
//! ==============
//! `types` defines the wire schema, errors, and the `SessionService` seam the
//! stores depend on; `api` is the `reqwest` implementation against the chat
//! backend's `/session` and `/verify` endpoints.

pub mod api;
pub mod types;

pub use api::HttpSessionService;
pub use types::{SessionError, SessionService, SessionStatus, VerificationResult};

#[cfg(test)]
pub mod mock;
