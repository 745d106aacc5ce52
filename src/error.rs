//! Errors raised by the widget host.
//!
//! Backend failures never surface here: the widget turns them into the
//! apology message. These variants cover requests that name something the
//! host does not know about.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::widget::{QuizId, ReplyId};

/// Host-level widget errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// No session with this id (never created, or expired).
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// No quiz card with this id in the session.
    #[error("Quiz not found: {0}")]
    QuizNotFound(QuizId),

    /// No reply slot with this id was ever minted.
    #[error("Reply not found: {0}")]
    ReplyNotFound(ReplyId),

    /// The reply slot was already settled.
    #[error("Reply already settled: {0}")]
    ReplyAlreadySettled(ReplyId),
}

impl WidgetError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::SessionNotFound(_) | Self::QuizNotFound(_) | Self::ReplyNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::ReplyAlreadySettled(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for WidgetError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(
            name: "widget.request.rejected",
            status = %status,
            error = %self,
            "Rejected widget request"
        );
        (status, self.to_string()).into_response()
    }
}
