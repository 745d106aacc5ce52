//! Client side of the `/api/ask` contract.
//!
//! The widget posts the user's question as a multipart form field named
//! `query` and expects either an explanation (optionally with a quiz) or an
//! error body with a non-2xx status.
//!
//! - [`AskBackend`]: the seam the widget talks to
//! - [`HttpAskBackend`]: reqwest implementation against a configured URL

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::widget::Quiz;
pub use http::HttpAskBackend;

/// Fallback message when an error response carries no usable body.
pub const GENERIC_FAILURE: &str = "Network response was not ok";

/// Successful answer from the ask endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    /// Explanation text; may contain simple inline HTML.
    pub explanation: String,
    /// Optional follow-up quiz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,
}

/// Body returned with non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Failures talking to the ask endpoint.
#[derive(Error, Debug)]
pub enum AskError {
    /// Connection, TLS, or body transfer failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured endpoint is not a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The endpoint answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// `error` field of the body, or a generic message.
        message: String,
    },

    /// A 2xx body that is not a valid answer.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything that can answer a student's question.
#[async_trait]
pub trait AskBackend: Send + Sync + std::fmt::Debug {
    /// Send one query. Implementations must not retry.
    async fn ask(&self, query: &str) -> Result<AskResponse, AskError>;
}
