//! Multiple-choice quiz cards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::copy::{CORRECT_ANSWER, incorrect_answer};
use super::transcript::ChatMessage;

/// A multiple-choice question as delivered by the ask endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    /// Question text.
    pub question: String,
    /// Options in display order.
    pub options: Vec<String>,
    /// The correct option; must equal one of `options`.
    pub answer: String,
}

/// Reasons a quiz payload cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    /// The quiz carries no options at all.
    #[error("quiz has no options")]
    NoOptions,

    /// The same option text appears more than once.
    #[error("duplicate quiz option: {0}")]
    DuplicateOption(String),

    /// The answer does not match any option.
    #[error("quiz answer {0:?} is not one of the options")]
    AnswerNotAnOption(String),
}

impl Quiz {
    /// Check the option and answer invariants.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.options.is_empty() {
            return Err(QuizError::NoOptions);
        }

        let mut seen = HashSet::with_capacity(self.options.len());
        for option in &self.options {
            if !seen.insert(option.as_str()) {
                return Err(QuizError::DuplicateOption(option.clone()));
            }
        }

        if !seen.contains(self.answer.as_str()) {
            return Err(QuizError::AnswerNotAnOption(self.answer.clone()));
        }
        Ok(())
    }

    /// Exact string comparison against the answer.
    #[must_use]
    pub fn is_correct(&self, choice: &str) -> bool {
        self.answer == choice
    }
}

/// Identifier of a quiz card within one widget.
pub type QuizId = u64;

/// Lifecycle of a quiz card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuizState {
    /// Options can still be selected and submitted.
    Active,
    /// Terminal: every control is disabled.
    Answered {
        /// The option the user submitted.
        choice: String,
        /// Whether it matched the answer.
        correct: bool,
    },
}

/// A quiz rendered into the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizCard {
    id: QuizId,
    quiz: Quiz,
    #[serde(flatten)]
    state: QuizState,
}

/// What happened when the quiz submit control was activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizOutcome {
    /// Nothing was selected; the card stays active.
    SelectionRequired,
    /// The selection matched the answer.
    Correct,
    /// The selection did not match; carries the expected answer.
    Incorrect {
        /// The correct option.
        answer: String,
    },
    /// The card was already answered; nothing changed.
    AlreadyAnswered,
}

impl QuizOutcome {
    /// The bot message this outcome appends, if any.
    #[must_use]
    pub fn feedback(&self) -> Option<ChatMessage> {
        match self {
            Self::Correct => Some(ChatMessage::bot(CORRECT_ANSWER)),
            Self::Incorrect { answer } => Some(ChatMessage::bot(incorrect_answer(answer))),
            Self::SelectionRequired | Self::AlreadyAnswered => None,
        }
    }
}

impl QuizCard {
    pub(crate) fn new(id: QuizId, quiz: Quiz) -> Self {
        Self {
            id,
            quiz,
            state: QuizState::Active,
        }
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn state(&self) -> &QuizState {
        &self.state
    }

    /// Whether the card has reached its terminal state.
    #[must_use]
    pub fn is_answered(&self) -> bool {
        matches!(self.state, QuizState::Answered { .. })
    }

    /// The submitted option, once answered.
    #[must_use]
    pub fn choice(&self) -> Option<&str> {
        match &self.state {
            QuizState::Answered { choice, .. } => Some(choice),
            QuizState::Active => None,
        }
    }

    /// Grade a selection and lock the card.
    ///
    /// A missing selection leaves the card active. Any call after the card
    /// is answered is a no-op.
    pub(crate) fn submit(&mut self, selection: Option<&str>) -> QuizOutcome {
        if self.is_answered() {
            return QuizOutcome::AlreadyAnswered;
        }
        let Some(choice) = selection else {
            return QuizOutcome::SelectionRequired;
        };

        let correct = self.quiz.is_correct(choice);
        self.state = QuizState::Answered {
            choice: choice.to_string(),
            correct,
        };

        if correct {
            QuizOutcome::Correct
        } else {
            QuizOutcome::Incorrect {
                answer: self.quiz.answer.clone(),
            }
        }
    }
}
