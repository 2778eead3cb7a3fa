//! Shared client-side stores.
//!
//! DESIGN
//! ======
//! State is split by domain (`auth`, `app`, `user`) so consumers depend on
//! small focused models. Each store owns its state and writes it through to
//! `Storage` on every effective mutation.

pub mod app;
pub mod auth;
pub mod user;
