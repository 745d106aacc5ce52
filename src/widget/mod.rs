//! Chat widget state.
//!
//! [`ChatWidget`] owns everything one page of the chat shows: the transcript,
//! the loading flag, and the quiz cards embedded in the transcript. The UI
//! layer renders it; nothing else mutates it.
//!
//! A submit is split in two so the caller can release its lock while the
//! backend works:
//!
//! 1. [`ChatWidget::submit_query`] appends the user message, turns loading on
//!    and mints a [`PendingReply`].
//! 2. [`ChatWidget::apply_reply`] renders the backend outcome and turns
//!    loading off.
//!
//! [`ChatWidget::ask`] runs both halves for callers that own the widget.
//!
//! # Example
//!
//! ```rust
//! use exam_prep_chat::widget::{ChatWidget, DEFAULT_PLACEHOLDER, DEFAULT_WELCOME};
//!
//! let mut widget = ChatWidget::new();
//! widget.initialize(DEFAULT_PLACEHOLDER, DEFAULT_WELCOME);
//! assert_eq!(widget.transcript().len(), 1);
//!
//! assert!(widget.submit_query("   ").is_none());
//! let pending = widget.submit_query("What is inertia?").unwrap();
//! assert!(widget.is_loading());
//! assert_eq!(pending.query(), "What is inertia?");
//! ```

mod copy;
mod quiz;
mod transcript;

use std::collections::BTreeMap;
use std::ops::Range;

pub use copy::*;
pub use quiz::{Quiz, QuizCard, QuizError, QuizId, QuizOutcome, QuizState};
pub use transcript::{ChatMessage, MessageBody, Sender, Transcript, TranscriptEntry};

use crate::ask::{AskBackend, AskError, AskResponse};
use crate::error::WidgetError;

/// Identifier of a reply slot within one widget.
pub type ReplyId = u64;

/// Ticket for one outstanding ask request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    id: ReplyId,
    query: String,
}

impl PendingReply {
    #[must_use]
    pub fn id(&self) -> ReplyId {
        self.id
    }

    /// The trimmed query to send.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Result of settling a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    /// Transcript indices appended by this reply.
    pub appended: Range<usize>,
    /// Whether the apology was shown instead of an explanation.
    pub failed: bool,
}

/// State of one chat widget.
#[derive(Debug, Default)]
pub struct ChatWidget {
    transcript: Transcript,
    placeholder: String,
    loading: bool,
    pending: BTreeMap<ReplyId, String>,
    next_reply: ReplyId,
    next_quiz: QuizId,
}

impl ChatWidget {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the transcript to a single welcome message.
    pub fn initialize(&mut self, placeholder: &str, welcome: &str) {
        self.transcript.clear();
        self.placeholder = placeholder.to_string();
        self.transcript.push_message(ChatMessage::bot(welcome));
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Show or hide the loading indicator.
    ///
    /// The view scrolls the transcript to its bottom whenever this flips.
    pub fn toggle_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Number of replies minted but not yet settled.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Accept a query from the input.
    ///
    /// Whitespace-only input is ignored and returns `None`. Otherwise the user
    /// message is appended before the request is issued.
    pub fn submit_query(&mut self, raw: &str) -> Option<PendingReply> {
        let query = raw.trim();
        if query.is_empty() {
            return None;
        }

        self.transcript.push_message(ChatMessage::user(query));
        self.toggle_loading(true);

        let id = self.next_reply;
        self.next_reply += 1;
        self.pending.insert(id, query.to_string());

        Some(PendingReply {
            id,
            query: query.to_string(),
        })
    }

    /// Claim a pending reply by id so it can be settled exactly once.
    pub fn take_pending(&mut self, id: ReplyId) -> Result<PendingReply, WidgetError> {
        match self.pending.remove(&id) {
            Some(query) => Ok(PendingReply { id, query }),
            None if id < self.next_reply => Err(WidgetError::ReplyAlreadySettled(id)),
            None => Err(WidgetError::ReplyNotFound(id)),
        }
    }

    /// Render the backend outcome for a claimed reply.
    ///
    /// Loading is switched off last, on every path.
    pub fn apply_reply(
        &mut self,
        reply: &PendingReply,
        outcome: Result<AskResponse, AskError>,
    ) -> Settled {
        let start = self.transcript.len();
        let failed = match outcome {
            Ok(answer) => {
                self.render_answer(reply, answer);
                false
            }
            Err(e) => {
                tracing::error!(
                    name: "widget.reply.failed",
                    reply_id = reply.id,
                    error = %e,
                    "Ask request failed"
                );
                self.transcript.push_message(ChatMessage::bot(APOLOGY));
                true
            }
        };
        self.toggle_loading(false);

        Settled {
            appended: start..self.transcript.len(),
            failed,
        }
    }

    fn render_answer(&mut self, reply: &PendingReply, answer: AskResponse) {
        self.transcript
            .push_message(ChatMessage::bot_markup(answer.explanation));

        let Some(quiz) = answer.quiz else {
            return;
        };
        if let Err(e) = quiz.validate() {
            tracing::warn!(
                name: "widget.quiz.dropped",
                reply_id = reply.id,
                error = %e,
                "Ignoring malformed quiz"
            );
            return;
        }

        let id = self.next_quiz;
        self.next_quiz += 1;
        self.transcript.push_quiz(QuizCard::new(id, quiz));
    }

    /// Submit, wait for the backend, and render the outcome.
    ///
    /// Returns `None` when the query was empty and nothing was sent.
    pub async fn ask(&mut self, raw: &str, backend: &dyn AskBackend) -> Option<Settled> {
        let pending = self.submit_query(raw)?;
        let reply = self.take_pending(pending.id()).ok()?;
        let outcome = backend.ask(reply.query()).await;
        Some(self.apply_reply(&reply, outcome))
    }

    /// Activate a quiz card's submit control.
    ///
    /// On a graded answer the feedback message is appended as the last
    /// transcript entry.
    pub fn answer_quiz(
        &mut self,
        id: QuizId,
        selection: Option<&str>,
    ) -> Result<QuizOutcome, WidgetError> {
        let card = self
            .transcript
            .quiz_mut(id)
            .ok_or(WidgetError::QuizNotFound(id))?;

        let outcome = card.submit(selection);
        if let Some(feedback) = outcome.feedback() {
            self.transcript.push_message(feedback);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend that replays canned outcomes and records queries.
    #[derive(Debug, Default)]
    struct ScriptedBackend {
        replies: Mutex<Vec<Result<AskResponse, u16>>>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<AskResponse, u16>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                seen: Mutex::default(),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl AskBackend for ScriptedBackend {
        async fn ask(&self, query: &str) -> Result<AskResponse, AskError> {
            self.seen.lock().unwrap().push(query.to_string());
            match self.replies.lock().unwrap().remove(0) {
                Ok(answer) => Ok(answer),
                Err(status) => Err(AskError::Api {
                    status,
                    message: "boom".to_string(),
                }),
            }
        }
    }

    fn explanation(text: &str) -> AskResponse {
        AskResponse {
            explanation: text.to_string(),
            quiz: None,
        }
    }

    fn with_quiz() -> AskResponse {
        AskResponse {
            explanation: "Newton's first law".to_string(),
            quiz: Some(Quiz {
                question: "Q".to_string(),
                options: vec!["A".to_string(), "B".to_string()],
                answer: "B".to_string(),
            }),
        }
    }

    fn widget() -> ChatWidget {
        let mut widget = ChatWidget::new();
        widget.initialize(DEFAULT_PLACEHOLDER, DEFAULT_WELCOME);
        widget
    }

    #[test]
    fn test_initialize_resets_to_welcome() {
        let mut widget = widget();
        widget.submit_query("hello");
        widget.initialize("Ask me", "Welcome back");

        let messages: Vec<_> = widget.transcript().messages().collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0], &ChatMessage::bot("Welcome back"));
        assert_eq!(widget.placeholder(), "Ask me");
    }

    #[tokio::test]
    async fn test_blank_query_is_ignored() {
        let backend = ScriptedBackend::default();
        let mut widget = widget();

        assert!(widget.ask("", &backend).await.is_none());
        assert!(widget.ask(" \t\n ", &backend).await.is_none());

        assert_eq!(widget.transcript().len(), 1);
        assert_eq!(backend.calls(), 0);
        assert!(!widget.is_loading());
    }

    #[tokio::test]
    async fn test_success_appends_user_then_explanation() {
        let backend = ScriptedBackend::new(vec![Ok(explanation("Inertia is..."))]);
        let mut widget = widget();

        let pending = widget.submit_query("  What is inertia?  ").unwrap();
        assert!(widget.is_loading());
        assert_eq!(
            widget.transcript().messages().last(),
            Some(&ChatMessage::user("What is inertia?"))
        );

        let reply = widget.take_pending(pending.id()).unwrap();
        let outcome = backend.ask(reply.query()).await;
        let settled = widget.apply_reply(&reply, outcome);

        assert!(!widget.is_loading());
        assert!(!settled.failed);
        assert_eq!(settled.appended, 2..3);
        assert_eq!(
            widget.transcript().messages().last(),
            Some(&ChatMessage::bot_markup("Inertia is..."))
        );
        assert_eq!(backend.seen.lock().unwrap().as_slice(), ["What is inertia?"]);
    }

    #[tokio::test]
    async fn test_failure_shows_single_apology() {
        let backend = ScriptedBackend::new(vec![Err(500)]);
        let mut widget = widget();

        let settled = widget.ask("What is inertia?", &backend).await.unwrap();

        assert!(settled.failed);
        assert_eq!(settled.appended.len(), 1);
        let apologies = widget
            .transcript()
            .messages()
            .filter(|m| m.text() == APOLOGY)
            .count();
        assert_eq!(apologies, 1);
        assert!(!widget.is_loading());
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_quiz_incorrect_then_locked() {
        let backend = ScriptedBackend::new(vec![Ok(with_quiz())]);
        let mut widget = widget();
        let settled = widget.ask("inertia", &backend).await.unwrap();
        assert_eq!(settled.appended.len(), 2);

        let card_id = widget.transcript().entries()[settled.appended.end - 1]
            .as_quiz()
            .unwrap()
            .id();

        let outcome = widget.answer_quiz(card_id, Some("A")).unwrap();
        assert_eq!(
            outcome,
            QuizOutcome::Incorrect {
                answer: "B".to_string()
            }
        );
        let last = widget.transcript().messages().last().unwrap();
        assert!(last.text().contains("\"B\""));

        let len = widget.transcript().len();
        assert_eq!(
            widget.answer_quiz(card_id, Some("B")).unwrap(),
            QuizOutcome::AlreadyAnswered
        );
        assert_eq!(widget.transcript().len(), len);
        assert!(widget.transcript().quiz(card_id).unwrap().is_answered());
    }

    #[tokio::test]
    async fn test_quiz_correct_and_selection_required() {
        let backend = ScriptedBackend::new(vec![Ok(with_quiz())]);
        let mut widget = widget();
        widget.ask("inertia", &backend).await.unwrap();
        let len = widget.transcript().len();

        assert_eq!(
            widget.answer_quiz(0, None).unwrap(),
            QuizOutcome::SelectionRequired
        );
        assert_eq!(widget.transcript().len(), len);
        assert!(!widget.transcript().quiz(0).unwrap().is_answered());

        assert_eq!(widget.answer_quiz(0, Some("B")).unwrap(), QuizOutcome::Correct);
        assert_eq!(
            widget.transcript().messages().last(),
            Some(&ChatMessage::bot(CORRECT_ANSWER))
        );
    }

    #[test]
    fn test_unknown_quiz() {
        let mut widget = widget();
        assert!(matches!(
            widget.answer_quiz(3, Some("A")),
            Err(WidgetError::QuizNotFound(3))
        ));
    }

    #[tokio::test]
    async fn test_malformed_quiz_is_dropped() {
        let mut answer = with_quiz();
        if let Some(quiz) = answer.quiz.as_mut() {
            quiz.answer = "Z".to_string();
        }
        let backend = ScriptedBackend::new(vec![Ok(answer)]);
        let mut widget = widget();

        let settled = widget.ask("inertia", &backend).await.unwrap();
        assert_eq!(settled.appended.len(), 1);
        assert!(
            widget
                .transcript()
                .entries()
                .iter()
                .all(|e| e.as_quiz().is_none())
        );
    }

    #[test]
    fn test_reply_settles_once() {
        let mut widget = widget();
        let pending = widget.submit_query("q").unwrap();

        let reply = widget.take_pending(pending.id()).unwrap();
        assert!(matches!(
            widget.take_pending(pending.id()),
            Err(WidgetError::ReplyAlreadySettled(0))
        ));
        assert!(matches!(
            widget.take_pending(9),
            Err(WidgetError::ReplyNotFound(9))
        ));

        widget.apply_reply(&reply, Ok(explanation("x")));
        assert_eq!(widget.pending_count(), 0);
    }

    #[test]
    fn test_concurrent_submits_share_one_flag() {
        let mut widget = widget();
        let first = widget.submit_query("one").unwrap();
        let second = widget.submit_query("two").unwrap();
        assert_eq!(widget.pending_count(), 2);

        let first = widget.take_pending(first.id()).unwrap();
        widget.apply_reply(&first, Ok(explanation("1")));
        // The flag is a single boolean: the first settle hides it.
        assert!(!widget.is_loading());

        let second = widget.take_pending(second.id()).unwrap();
        widget.apply_reply(&second, Ok(explanation("2")));
        assert_eq!(widget.transcript().len(), 5);
    }

    #[tokio::test]
    async fn test_transcript_never_shrinks() {
        let backend = ScriptedBackend::new(vec![Ok(with_quiz()), Err(502), Ok(explanation("x"))]);
        let mut widget = widget();
        let mut last_len = widget.transcript().len();

        let mut check = |widget: &ChatWidget| {
            assert!(widget.transcript().len() >= last_len);
            last_len = widget.transcript().len();
        };

        widget.ask("a", &backend).await;
        check(&widget);
        widget.answer_quiz(0, None).unwrap();
        check(&widget);
        widget.answer_quiz(0, Some("A")).unwrap();
        check(&widget);
        widget.ask("  ", &backend).await;
        check(&widget);
        widget.ask("b", &backend).await;
        check(&widget);
        widget.ask("c", &backend).await;
        check(&widget);
        widget.answer_quiz(0, Some("B")).unwrap();
        check(&widget);
    }
}
