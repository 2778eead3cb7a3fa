//! Scripted `SessionService` for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::types::{SessionError, SessionService, SessionStatus, VerificationResult};

/// Replays scripted session outcomes and counts calls.
///
/// Session outcomes are consumed in order; the last one repeats forever.
/// Verification accepts every code (echoing it back as the token) unless a
/// verify outcome was scripted.
#[derive(Default)]
pub struct MockSessionService {
    sessions: Mutex<VecDeque<Result<SessionStatus, SessionError>>>,
    verify_outcome: Mutex<Option<Result<VerificationResult, SessionError>>>,
    session_calls: AtomicUsize,
    verify_calls: AtomicUsize,
    seen_tokens: Mutex<Vec<Option<String>>>,
    seen_codes: Mutex<Vec<String>>,
}

impl MockSessionService {
    pub fn scripted(outcomes: Vec<Result<SessionStatus, SessionError>>) -> Self {
        Self { sessions: Mutex::new(outcomes.into()), ..Self::default() }
    }

    pub fn auth_required(required: bool) -> Self {
        Self::scripted(vec![Ok(SessionStatus::new(required))])
    }

    pub fn unreachable() -> Self {
        Self::scripted(vec![Err(SessionError::Transport("connection refused".into()))])
    }

    pub fn with_verify(self, outcome: Result<VerificationResult, SessionError>) -> Self {
        *self.verify_outcome.lock().unwrap_or_else(PoisonError::into_inner) = Some(outcome);
        self
    }

    pub fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn seen_tokens(&self) -> Vec<Option<String>> {
        self.seen_tokens.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn seen_codes(&self) -> Vec<String> {
        self.seen_codes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait::async_trait]
impl SessionService for MockSessionService {
    async fn fetch_session(&self, token: Option<&str>) -> Result<SessionStatus, SessionError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(token.map(str::to_owned));
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        if sessions.len() > 1 {
            return sessions
                .pop_front()
                .unwrap_or_else(|| Err(SessionError::Transport("no scripted session".into())));
        }
        sessions
            .front()
            .cloned()
            .unwrap_or_else(|| Err(SessionError::Transport("no scripted session".into())))
    }

    async fn verify(&self, code: &str, _token: Option<&str>) -> Result<VerificationResult, SessionError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_codes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(code.to_owned());
        self.verify_outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_else(|| Ok(VerificationResult { token: code.to_owned(), message: None }))
    }
}
