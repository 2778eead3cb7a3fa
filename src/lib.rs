//! # chatgate
//!
//! Client-side session gate for the chat application. Decides on every
//! navigation whether the user may reach the chat screen or must enter an
//! invitation code first, and persists lightweight user/app preferences.
//!
//! The guard and stores depend only on the `SessionService` and `Storage`
//! traits; `reqwest` and JSON-file implementations are provided for the
//! `chatgate` binary.

pub mod config;
pub mod context;
pub mod net;
pub mod router;
pub mod state;
pub mod storage;
