//! Route paths and the element ids the widget script relies on.

use crate::widget::{QuizId, ReplyId};

pub const INDEX_URL: &str = "/";
pub const HEALTH_URL: &str = "/health";
pub const RECORD_URL: &str = "/widget/record";
pub const IMAGE_URL: &str = "/widget/image";
pub const STATIC_URL: &str = "/static";

pub const CHAT_FORM_ID: &str = "chat-form";
pub const USER_INPUT_ID: &str = "user-input";
pub const CHAT_WINDOW_ID: &str = "chat-window";
pub const LOADING_INDICATOR_ID: &str = "loading-indicator";
pub const RECORD_BUTTON_ID: &str = "record-btn";
pub const IMAGE_UPLOAD_ID: &str = "image-upload";

/// Form field carrying the question.
pub const QUERY_FIELD: &str = "query";
/// Radio group name inside a quiz card.
pub const QUIZ_OPTION_FIELD: &str = "quiz-option";

/// htmx event name the widget script turns into `window.alert`.
pub const ALERT_EVENT: &str = "widget:alert";

pub fn messages_url(session_id: &str) -> String {
    format!("/sessions/{session_id}/messages")
}

pub fn reply_url(session_id: &str, reply_id: ReplyId) -> String {
    format!("/sessions/{session_id}/replies/{reply_id}")
}

pub fn quiz_answer_url(session_id: &str, quiz_id: QuizId) -> String {
    format!("/sessions/{session_id}/quizzes/{quiz_id}/answer")
}

pub fn transcript_url(session_id: &str) -> String {
    format!("/sessions/{session_id}/transcript")
}

pub fn reply_slot_id(reply_id: ReplyId) -> String {
    format!("reply-{reply_id}")
}

pub fn quiz_card_id(quiz_id: QuizId) -> String {
    format!("quiz-{quiz_id}")
}
