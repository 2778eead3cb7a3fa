//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by the navigation guard to decide between the chat and invitation
//! screens, and by the invitation screen to exchange a code for a token.
//!
//! The session status is fetched lazily and cached for the store's lifetime;
//! a new store (a reload) fetches again. Errors from the service are never
//! swallowed here; the guard decides what they mean for navigation.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use tracing::{info, warn};

use crate::net::types::{SessionError, SessionService, SessionStatus, VerificationResult};
use crate::storage::{Storage, load_json, remove_key, save_json};

/// Storage key for the invitation token.
pub const TOKEN_KEY: &str = "SECRET_TOKEN";

/// Session facts and the stored credential.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    /// `None` until the first successful fetch.
    pub session: Option<SessionStatus>,
    pub token: Option<String>,
}

pub struct AuthStore {
    service: Arc<dyn SessionService>,
    storage: Arc<dyn Storage>,
    state: AuthState,
}

impl AuthStore {
    /// Create the store, loading any previously persisted token.
    pub fn new(service: Arc<dyn SessionService>, storage: Arc<dyn Storage>) -> Self {
        let token = load_json::<String>(storage.as_ref(), TOKEN_KEY).filter(|t| !t.is_empty());
        Self { service, storage, state: AuthState { session: None, token } }
    }

    #[must_use]
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    #[must_use]
    pub fn session(&self) -> Option<&SessionStatus> {
        self.state.session.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.state.token.is_some()
    }

    /// Return the cached session status, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Propagates the service error unchanged; the cache stays empty so the
    /// next call fetches again.
    pub async fn get_session(&mut self) -> Result<SessionStatus, SessionError> {
        if let Some(session) = &self.state.session {
            return Ok(session.clone());
        }
        let session = self.service.fetch_session(self.state.token.as_deref()).await?;
        info!(auth_required = session.auth_required, model = ?session.model, "session status fetched");
        self.state.session = Some(session.clone());
        Ok(session)
    }

    /// Drop the cached session so the next guard pass re-fetches it.
    pub fn reset_session(&mut self) {
        self.state.session = None;
    }

    /// Exchange an invitation code for a token and persist it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidCode`] for an empty or rejected code and
    /// a transport-kind error when the exchange fails. The stored token is
    /// left untouched on any error.
    pub async fn verify_invitation_code(&mut self, code: &str) -> Result<VerificationResult, SessionError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(SessionError::InvalidCode("invitation code is empty".to_owned()));
        }

        let outcome = self.service.verify(code, self.state.token.as_deref()).await;
        match outcome {
            Ok(result) => {
                info!("invitation code accepted");
                self.set_token(result.token.clone());
                Ok(result)
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "invitation code verification failed");
                Err(e)
            }
        }
    }

    /// Store a token and persist it.
    pub fn set_token(&mut self, token: impl Into<String>) {
        let token = token.into();
        save_json(self.storage.as_ref(), TOKEN_KEY, &token);
        self.state.token = Some(token);
    }

    /// Forget the stored token (logout).
    pub fn remove_token(&mut self) {
        remove_key(self.storage.as_ref(), TOKEN_KEY);
        self.state.token = None;
    }
}
