//! Session service types — wire DTOs, errors, and the service seam.
//!
//! DESIGN
//! ======
//! The guard and stores only see `SessionService`, so tests drive them with
//! hand-written mocks and the binary plugs in the HTTP client.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by session service operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The request could not complete (connect, DNS, reset, body read).
    #[error("session request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status.
    #[error("session service returned status {status}")]
    Status { status: u16 },

    /// The response body could not be decoded.
    #[error("session response parse failed: {0}")]
    Parse(String),

    /// The service answered but reported a failure for a non-verify call.
    #[error("session service rejected request: {0}")]
    Rejected(String),

    /// The service reported the presented credential as unauthorized.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Verification completed but the invitation code was not accepted.
    #[error("invalid invitation code: {0}")]
    InvalidCode(String),
}

impl SessionError {
    /// Stable code for display and logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_TRANSPORT",
            Self::Status { .. } => "E_STATUS",
            Self::Parse(_) => "E_PARSE",
            Self::Rejected(_) => "E_REJECTED",
            Self::Unauthorized(_) => "E_UNAUTHORIZED",
            Self::InvalidCode(_) => "E_INVALID_CODE",
        }
    }

    /// True for every failure where the exchange itself went wrong, as opposed
    /// to the service judging the invitation code.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::InvalidCode(_))
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Server-asserted session facts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Whether an invitation code is required to use the chat.
    #[serde(rename = "auth", alias = "authRequired")]
    pub auth_required: bool,
    /// Backend model label, when the service reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl SessionStatus {
    #[must_use]
    pub fn new(auth_required: bool) -> Self {
        Self { auth_required, model: None }
    }
}

/// Outcome of a successful invitation-code verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    /// Token to persist for later sessions.
    pub token: String,
    /// Optional human-readable confirmation from the service.
    pub message: Option<String>,
}

// =============================================================================
// SERVICE TRAIT
// =============================================================================

/// Remote capability answering session questions.
///
/// `token` is the locally stored credential, if any; implementations may
/// present it to the service.
#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    /// Fetch whether the service currently requires an invitation code.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the exchange fails or is rejected.
    async fn fetch_session(&self, token: Option<&str>) -> Result<SessionStatus, SessionError>;

    /// Exchange an invitation code for a token.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidCode`] when the code is rejected and a
    /// transport-kind error when the exchange fails.
    async fn verify(&self, code: &str, token: Option<&str>) -> Result<VerificationResult, SessionError>;
}
