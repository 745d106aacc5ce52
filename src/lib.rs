//! Exam-prep chat widget
//!
//! A study chat for JEE/NEET students: the student asks a question, the
//! widget posts it to an ask endpoint, shows the explanation, and may follow
//! up with a one-question quiz. The widget is rendered server-side with maud
//! and driven by htmx.
//!
//! # Architecture
//!
//! - **Widget**: typed state per page (append-only transcript, loading flag, quiz cards)
//! - **Ask client**: multipart POST to the backend's `/api/ask`
//! - **Server**: Axum router returning page and fragment HTML
//!
//! # Modules
//!
//! - [`widget`]: chat widget state and operations
//! - [`ask`]: ask endpoint contract and HTTP client
//! - [`session`]: per-page widget sessions
//! - [`ui`]: maud rendering
//! - [`server`]: routes and handlers

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod ask;
pub mod config;
pub mod error;
pub mod names;
pub mod server;
pub mod session;
pub mod ui;
pub mod widget;

use std::sync::Arc;

use crate::ask::AskBackend;
use crate::config::AppConfig;
use crate::session::SessionStore;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Where questions are sent.
    pub backend: Arc<dyn AskBackend>,
    /// One widget per page load.
    pub sessions: SessionStore,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(backend: Arc<dyn AskBackend>, config: Arc<AppConfig>) -> Self {
        Self {
            backend,
            sessions: SessionStore::new(),
            config,
        }
    }
}
