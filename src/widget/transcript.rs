//! Append-only chat transcript.

use serde::Serialize;

use super::quiz::{QuizCard, QuizId};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// CSS class prefix used by the widget stylesheet.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// Message payload.
///
/// Text is always escaped when rendered. Markup comes from the ask endpoint
/// and is rendered under the configured explanation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "format", content = "content", rename_all = "lowercase")]
pub enum MessageBody {
    Text(String),
    Markup(String),
}

/// A single chat bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub body: MessageBody,
}

impl ChatMessage {
    /// A message typed by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            body: MessageBody::Text(text.into()),
        }
    }

    /// Canned bot copy.
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            body: MessageBody::Text(text.into()),
        }
    }

    /// A bot explanation that may carry inline markup.
    pub fn bot_markup(html: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            body: MessageBody::Markup(html.into()),
        }
    }

    /// Raw message content, regardless of format.
    #[must_use]
    pub fn text(&self) -> &str {
        match &self.body {
            MessageBody::Text(s) | MessageBody::Markup(s) => s,
        }
    }
}

/// One transcript row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TranscriptEntry {
    Message(ChatMessage),
    Quiz(QuizCard),
}

impl TranscriptEntry {
    #[must_use]
    pub fn as_message(&self) -> Option<&ChatMessage> {
        match self {
            Self::Message(m) => Some(m),
            Self::Quiz(_) => None,
        }
    }

    #[must_use]
    pub fn as_quiz(&self) -> Option<&QuizCard> {
        match self {
            Self::Quiz(q) => Some(q),
            Self::Message(_) => None,
        }
    }
}

/// Ordered log of everything the widget has shown.
///
/// Entries are never removed or reordered; quiz cards only move from active
/// to answered in place.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its index.
    pub fn push_message(&mut self, message: ChatMessage) -> usize {
        self.entries.push(TranscriptEntry::Message(message));
        self.entries.len() - 1
    }

    /// Append a quiz card and return its index.
    pub fn push_quiz(&mut self, card: QuizCard) -> usize {
        self.entries.push(TranscriptEntry::Quiz(card));
        self.entries.len() - 1
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Iterate over chat messages only, skipping quiz cards.
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().filter_map(TranscriptEntry::as_message)
    }

    #[must_use]
    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn quiz(&self, id: QuizId) -> Option<&QuizCard> {
        self.entries
            .iter()
            .filter_map(TranscriptEntry::as_quiz)
            .find(|card| card.id() == id)
    }

    pub(crate) fn quiz_mut(&mut self, id: QuizId) -> Option<&mut QuizCard> {
        self.entries.iter_mut().find_map(|entry| match entry {
            TranscriptEntry::Quiz(card) if card.id() == id => Some(card),
            _ => None,
        })
    }

    /// Only used when the widget is (re)initialized.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
