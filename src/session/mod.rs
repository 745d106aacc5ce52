//! Widget session management.
//!
//! Every page load gets its own [`Session`], identified by UUID, holding one
//! initialized [`ChatWidget`](crate::widget::ChatWidget). Sessions live in
//! memory only and are pruned once idle.
//!
//! # Architecture
//!
//! - [`Session`]: one widget plus activity timestamps
//! - [`SessionStore`]: thread-safe store for all active sessions
//!
//! # Example
//!
//! ```rust
//! use exam_prep_chat::session::SessionStore;
//!
//! let store = SessionStore::new();
//! let session = store.create("Ask a question", "Welcome!");
//! session.submit("What is inertia?");
//!
//! assert_eq!(session.entry_count(), 2);
//! ```

mod store;

pub use store::{DEFAULT_SESSION_TIMEOUT, Session, SessionStore};
