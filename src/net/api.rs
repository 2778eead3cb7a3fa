//! HTTP client for the chat backend's session endpoints.
//!
//! Thin `reqwest` wrapper over `POST {base}/session` and `POST {base}/verify`.
//! Every response arrives in the backend's envelope
//! `{ status: "Success" | "Fail" | "Unauthorized", message, data }`; envelope
//! decoding is pure (`parse_session_response`, `parse_verify_response`) for
//! testability.
//!
//! No request timeout is set. A hung session fetch holds its navigation
//! until the transport resolves; only connecting is bounded.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{SessionError, SessionService, SessionStatus, VerificationResult};
use crate::config::GateConfig;

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpSessionService {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSessionService {
    /// Build a client for `base_url` (trailing slashes are ignored).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transport`] if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Result<Self, SessionError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| SessionError::Transport(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url })
    }

    /// Build a client from parsed gate config.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transport`] if the HTTP client fails to build.
    pub fn from_config(config: &GateConfig) -> Result<Self, SessionError> {
        Self::new(config.api_base_url.clone(), config.connect_timeout())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post(&self, path: &str, token: Option<&str>) -> reqwest::RequestBuilder {
        let request = self.http.post(endpoint(&self.base_url, path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<(u16, String), SessionError> {
        let response = request
            .send()
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))?;
        Ok((status, body))
    }
}

#[async_trait::async_trait]
impl SessionService for HttpSessionService {
    async fn fetch_session(&self, token: Option<&str>) -> Result<SessionStatus, SessionError> {
        let (status, body) = Self::send(self.post("session", token)).await?;
        debug!(status, "session response received");
        parse_session_response(status, &body)
    }

    async fn verify(&self, code: &str, token: Option<&str>) -> Result<VerificationResult, SessionError> {
        let request = self
            .post("verify", token)
            .json(&VerifyRequest { invitation_code: code });
        let (status, body) = Self::send(request).await?;
        debug!(status, "verify response received");
        parse_verify_response(code, status, &body)
    }
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{base_url}/{path}")
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyRequest<'a> {
    invitation_code: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
enum EnvelopeStatus {
    Success,
    Fail,
    Unauthorized,
}

#[derive(Deserialize)]
struct Envelope<T> {
    status: EnvelopeStatus,
    message: Option<String>,
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_owned()
    }
}

#[derive(Deserialize)]
struct VerifyData {
    token: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

fn decode_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<Envelope<T>, SessionError> {
    if !(200..300).contains(&status) {
        return Err(SessionError::Status { status });
    }
    serde_json::from_str(body).map_err(|e| SessionError::Parse(e.to_string()))
}

pub(crate) fn parse_session_response(status: u16, body: &str) -> Result<SessionStatus, SessionError> {
    let envelope: Envelope<SessionStatus> = decode_envelope(status, body)?;
    match envelope.status {
        EnvelopeStatus::Success => envelope
            .data
            .ok_or_else(|| SessionError::Parse("session response has no data".to_owned())),
        EnvelopeStatus::Fail => Err(SessionError::Rejected(envelope.message_or("session check failed"))),
        EnvelopeStatus::Unauthorized => Err(SessionError::Unauthorized(envelope.message_or("unauthorized"))),
    }
}

/// Decode a verify response. A success without a server-issued token keeps
/// the invitation code itself as the token.
pub(crate) fn parse_verify_response(code: &str, status: u16, body: &str) -> Result<VerificationResult, SessionError> {
    let envelope: Envelope<VerifyData> = decode_envelope(status, body)?;
    match envelope.status {
        EnvelopeStatus::Success => {
            let message = envelope.message.filter(|m| !m.is_empty());
            let token = envelope
                .data
                .and_then(|d| d.token)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| code.to_owned());
            Ok(VerificationResult { token, message })
        }
        EnvelopeStatus::Fail => Err(SessionError::InvalidCode(envelope.message_or("invitation code rejected"))),
        EnvelopeStatus::Unauthorized => Err(SessionError::Unauthorized(envelope.message_or("unauthorized"))),
    }
}
