#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, Response},
};
use exam_prep_chat::ask::{AskBackend, AskError, AskResponse, Quiz};
use exam_prep_chat::config::AppConfig;
use exam_prep_chat::{AppState, server};
use tower::ServiceExt;

/// Backend that replays canned answers and records every query.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<AskResponse, u16>>>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Result<AskResponse, u16>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::default(),
        })
    }

    pub fn queries(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AskBackend for ScriptedBackend {
    async fn ask(&self, query: &str) -> Result<AskResponse, AskError> {
        self.seen.lock().unwrap().push(query.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(answer)) => Ok(answer),
            Some(Err(status)) => Err(AskError::Api {
                status,
                message: "Model unavailable".to_string(),
            }),
            None => Err(AskError::Api {
                status: 500,
                message: "script exhausted".to_string(),
            }),
        }
    }
}

pub fn explanation(text: &str) -> AskResponse {
    AskResponse {
        explanation: text.to_string(),
        quiz: None,
    }
}

pub fn explanation_with_quiz(text: &str, options: &[&str], answer: &str) -> AskResponse {
    AskResponse {
        explanation: text.to_string(),
        quiz: Some(Quiz {
            question: "Which statement holds?".to_string(),
            options: options.iter().map(ToString::to_string).collect(),
            answer: answer.to_string(),
        }),
    }
}

pub fn app(backend: Arc<ScriptedBackend>) -> Router {
    app_with_config(backend, AppConfig::default())
}

pub fn app_with_config(backend: Arc<ScriptedBackend>, config: AppConfig) -> Router {
    server::router(AppState::new(backend, Arc::new(config)))
}

pub async fn send(app: &Router, method: Method, uri: &str, form: Option<&str>) -> Response<Body> {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match form {
        Some(form) => {
            req = req.header("content-type", "application/x-www-form-urlencoded");
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(req.body(body).expect("request build should succeed"))
        .await
        .expect("router should respond")
}

pub async fn body_text(resp: Response<Body>) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
}

/// Load the page and return the session id it was rendered for.
pub async fn open_widget(app: &Router) -> String {
    let page = body_text(send(app, Method::GET, "/", None).await).await;
    let start = page
        .find("/sessions/")
        .expect("page should carry a session url")
        + "/sessions/".len();
    let end = start + page[start..].find('/').expect("session url should continue");
    page[start..end].to_string()
}

pub async fn transcript(app: &Router, session: &str) -> serde_json::Value {
    let resp = send(app, Method::GET, &format!("/sessions/{session}/transcript"), None).await;
    serde_json::from_str(&body_text(resp).await).expect("transcript should be json")
}
