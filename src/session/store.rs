//! Widget sessions and their store.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::ask::AskBackend;
use crate::error::WidgetError;
use crate::widget::{ChatWidget, PendingReply, QuizId, QuizOutcome, ReplyId, Settled, Transcript};

/// Default idle timeout before a session is pruned (30 minutes).
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// One page's chat widget.
///
/// Cloning is cheap; clones share the same widget.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    /// Unique session identifier.
    id: String,
    /// Widget state; never locked across an `.await`.
    widget: RwLock<ChatWidget>,
    /// Session creation time.
    created_at: DateTime<Utc>,
    /// Last activity time.
    last_activity: RwLock<DateTime<Utc>>,
}

impl Session {
    /// Create a session whose widget is already initialized.
    fn new(id: String, placeholder: &str, welcome: &str) -> Self {
        let now = Utc::now();
        let mut widget = ChatWidget::new();
        widget.initialize(placeholder, welcome);

        Self {
            inner: Arc::new(SessionInner {
                id,
                widget: RwLock::new(widget),
                created_at: now,
                last_activity: RwLock::new(now),
            }),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Inspect the widget under a read lock.
    pub fn read<R>(&self, f: impl FnOnce(&ChatWidget) -> R) -> R {
        f(&read(&self.inner.widget))
    }

    /// Mutate the widget under a write lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut ChatWidget) -> R) -> R {
        let result = f(&mut write(&self.inner.widget));
        self.touch();
        result
    }

    /// Submit a query typed into the input.
    pub fn submit(&self, query: &str) -> Option<PendingReply> {
        self.update(|w| w.submit_query(query))
    }

    /// Settle a reply slot against the backend.
    ///
    /// The widget lock is released while the backend request is in flight,
    /// so other submits on this session are not blocked.
    pub async fn settle(
        &self,
        reply_id: ReplyId,
        backend: &dyn AskBackend,
    ) -> Result<Settled, WidgetError> {
        let reply = self.update(|w| w.take_pending(reply_id))?;
        let outcome = backend.ask(reply.query()).await;
        Ok(self.update(|w| w.apply_reply(&reply, outcome)))
    }

    /// Activate a quiz card's submit control.
    pub fn answer_quiz(
        &self,
        id: QuizId,
        selection: Option<&str>,
    ) -> Result<QuizOutcome, WidgetError> {
        self.update(|w| w.answer_quiz(id, selection))
    }

    /// Snapshot of the transcript.
    #[must_use]
    pub fn transcript(&self) -> Transcript {
        self.read(|w| w.transcript().clone())
    }

    /// Number of transcript entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.read(|w| w.transcript().len())
    }

    /// Update the last activity timestamp.
    fn touch(&self) {
        *write(&self.inner.last_activity) = Utc::now();
    }

    /// Check if the session has been idle longer than `timeout`.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        let last = *read(&self.inner.last_activity);
        // Negative durations mean clock skew; treat as fresh.
        (Utc::now() - last)
            .to_std()
            .is_ok_and(|idle| idle > timeout)
    }

    /// When the session was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }
}

/// Thread-safe store for sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    /// Create a new session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a freshly initialized session.
    #[must_use]
    pub fn create(&self, placeholder: &str, welcome: &str) -> Session {
        let id = Uuid::new_v4().to_string();
        let session = Session::new(id.clone(), placeholder, welcome);
        write(&self.inner).insert(id, session.clone());
        tracing::debug!(
            name: "session.created",
            session_id = %session.id(),
            "Created widget session"
        );
        session
    }

    /// Get a session by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Session> {
        read(&self.inner).get(id).cloned()
    }

    /// Get a session by ID or fail with [`WidgetError::SessionNotFound`].
    pub fn require(&self, id: &str) -> Result<Session, WidgetError> {
        self.get(id)
            .ok_or_else(|| WidgetError::SessionNotFound(id.to_string()))
    }

    /// Remove a session by ID.
    pub fn remove(&self, id: &str) -> Option<Session> {
        write(&self.inner).remove(id)
    }

    /// Get the number of active sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        read(&self.inner).len()
    }

    /// Check if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove sessions that have been inactive longer than the timeout.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let mut guard = write(&self.inner);
        let before = guard.len();
        guard.retain(|_, session| !session.is_expired_with_timeout(timeout));
        before - guard.len()
    }
}
