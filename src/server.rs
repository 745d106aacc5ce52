use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::ask::HttpAskBackend;
use crate::config::AppConfig;
use crate::error::WidgetError;
use crate::names;
use crate::ui::app;
use crate::ui::chat::{
    append_to_window, chat_message, loading_indicator_oob, quiz_card, reply_slot,
    transcript_entry,
};
use crate::widget::{
    ChatMessage, QuizId, QuizOutcome, ReplyId, SELECT_AN_OPTION, Transcript, VOICE_INPUT_NOTICE,
    image_selected,
};

/// Response header htmx turns into client-side events.
const HX_TRIGGER: &str = "hx-trigger";

/// How often idle sessions are pruned.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let backend = HttpAskBackend::new(&config.backend.ask_url)?;
    info!(
        name: "backend.config.loaded",
        ask_url = %backend.endpoint(),
        markup = config.widget.explanation_markup.as_str(),
        "Ask backend configured"
    );

    let state = AppState::new(Arc::new(backend), Arc::clone(&config));

    let sessions = state.sessions.clone();
    let idle_timeout = config.widget.session_idle_timeout();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let removed = sessions.cleanup_expired_with_timeout(idle_timeout);
            if removed > 0 {
                tracing::debug!(name: "session.pruned", removed, "Pruned idle sessions");
            }
        }
    });

    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the widget router.
pub fn router(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();

    Router::new()
        .route(names::INDEX_URL, get(index_handler))
        .route(names::HEALTH_URL, get(health_handler))
        .route("/sessions/{id}/messages", post(submit_message))
        .route("/sessions/{id}/replies/{reply_id}", post(settle_reply))
        .route("/sessions/{id}/quizzes/{quiz_id}/answer", post(answer_quiz))
        .route("/sessions/{id}/transcript", get(get_transcript))
        .route(names::RECORD_URL, post(record_audio))
        .route(names::IMAGE_URL, post(image_picked))
        .nest_service(names::STATIC_URL, ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Page
// ─────────────────────────────────────────────────────────────────────────────

/// Open a fresh widget and render the page around it.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let widget_config = &state.config.widget;
    let session = state
        .sessions
        .create(&widget_config.placeholder, &widget_config.welcome_message);

    info!(name: "widget.session.opened", session_id = %session.id(), "Widget opened");

    let markup = widget_config.explanation_markup;
    let page = session.read(|widget| app::page(session.id(), widget, markup));
    Html(page.into_string())
}

async fn health_handler() -> &'static str {
    "ok"
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Chat form body.
#[derive(Debug, Deserialize)]
struct SubmitForm {
    #[serde(default)]
    query: String,
}

/// Append the user's message and hand back a slot that fetches the reply.
async fn submit_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<SubmitForm>,
) -> Result<Response, WidgetError> {
    let session = state.sessions.require(&id)?;

    let Some(pending) = session.submit(&form.query) else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    info!(
        name: "widget.query.submitted",
        session_id = %id,
        reply_id = pending.id(),
        "Query submitted"
    );

    let markup = state.config.widget.explanation_markup;
    let body = html! {
        (chat_message(&ChatMessage::user(pending.query()), markup))
        (reply_slot(&id, pending.id()))
        (loading_indicator_oob(true))
    };
    Ok(fragment(body))
}

/// Ask the backend for a pending reply and render what it appended.
async fn settle_reply(
    State(state): State<AppState>,
    Path((id, reply_id)): Path<(String, ReplyId)>,
) -> Result<Html<String>, WidgetError> {
    let session = state.sessions.require(&id)?;
    let settled = session.settle(reply_id, state.backend.as_ref()).await?;

    info!(
        name: "widget.reply.settled",
        session_id = %id,
        reply_id,
        failed = settled.failed,
        "Reply settled"
    );

    let markup = state.config.widget.explanation_markup;
    let body = session.read(|widget| {
        let entries = widget
            .transcript()
            .entries()
            .get(settled.appended.clone())
            .unwrap_or_default();
        let appended = html! {
            @for entry in entries {
                (transcript_entry(&id, entry, markup))
            }
        };
        // Out of band only: the slot is swapped for nothing and the entries
        // land at the end of the transcript in settle order.
        html! {
            (append_to_window(&appended))
            (loading_indicator_oob(widget.is_loading()))
        }
    });
    Ok(Html(body.into_string()))
}

/// Quiz form body; the radio group is absent when nothing is checked.
#[derive(Debug, Deserialize)]
struct AnswerForm {
    #[serde(rename = "quiz-option")]
    option: Option<String>,
}

/// Grade a quiz card and append the feedback.
async fn answer_quiz(
    State(state): State<AppState>,
    Path((id, quiz_id)): Path<(String, QuizId)>,
    Form(form): Form<AnswerForm>,
) -> Result<Response, WidgetError> {
    let session = state.sessions.require(&id)?;
    let outcome = session.answer_quiz(quiz_id, form.option.as_deref())?;

    if outcome == QuizOutcome::SelectionRequired {
        return Ok(alert(SELECT_AN_OPTION));
    }

    info!(
        name: "widget.quiz.answered",
        session_id = %id,
        quiz_id,
        correct = outcome == QuizOutcome::Correct,
        repeat = outcome == QuizOutcome::AlreadyAnswered,
        "Quiz answered"
    );

    let markup = state.config.widget.explanation_markup;
    let card = session.read(|widget| {
        widget
            .transcript()
            .quiz(quiz_id)
            .map(|card| quiz_card(&id, card))
    });
    let Some(card) = card else {
        return Err(WidgetError::QuizNotFound(quiz_id));
    };

    let body = html! {
        (card)
        @if let Some(feedback) = outcome.feedback() {
            (append_to_window(&chat_message(&feedback, markup)))
        }
    };
    Ok(fragment(body))
}

/// JSON view of a session.
#[derive(Debug, Serialize)]
struct TranscriptResponse {
    session_id: String,
    created_at: DateTime<Utc>,
    loading: bool,
    entries: Transcript,
}

async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TranscriptResponse>, WidgetError> {
    let session = state.sessions.require(&id)?;
    let (loading, entries) = session.read(|w| (w.is_loading(), w.transcript().clone()));

    Ok(Json(TranscriptResponse {
        session_id: id,
        created_at: session.created_at(),
        loading,
        entries,
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Input Placeholders
// ─────────────────────────────────────────────────────────────────────────────

async fn record_audio() -> Response {
    alert(VOICE_INPUT_NOTICE)
}

/// Image picker body; carries the chosen file's name only.
#[derive(Debug, Deserialize)]
struct ImageForm {
    #[serde(default)]
    filename: String,
}

async fn image_picked(Form(form): Form<ImageForm>) -> Response {
    if form.filename.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }
    alert(&image_selected(&form.filename))
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn fragment(body: Markup) -> Response {
    Html(body.into_string()).into_response()
}

#[derive(Debug, Serialize)]
struct AlertDetail<'a> {
    message: &'a str,
}

/// An empty response that makes the page raise `message` in an alert.
fn alert(message: &str) -> Response {
    let trigger = HashMap::from([(names::ALERT_EVENT, AlertDetail { message })]);
    let value = serde_json::to_string(&trigger)
        .map_err(|e| e.to_string())
        .and_then(|json| HeaderValue::from_str(&ascii_json(&json)).map_err(|e| e.to_string()));

    match value {
        Ok(value) => (StatusCode::NO_CONTENT, [(HX_TRIGGER, value)]).into_response(),
        Err(e) => {
            tracing::error!(name: "widget.alert.failed", error = %e, "Failed to encode alert");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Escape everything outside printable ASCII as `\uXXXX` so JSON fits in a header.
fn ascii_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() && c != '\u{7f}' {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut [0; 2]) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}
