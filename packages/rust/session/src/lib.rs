//! HTTP session and SSO authentication.
//!
//! This crate provides:
//! - [`Session`] — cookie-bearing HTTP client reused for a whole run
//! - [`authenticate`] — the two-step login against the SSO gateway
//! - [`LoginCheck`] — pluggable "did the login work" predicate

pub mod auth;
pub mod client;

pub use auth::{
    LoginCheck, LoginForm, MarkerCheck, SUBMIT_EVENT, StatusCheck, authenticate, login_check_for,
};
pub use client::{Page, Session};
