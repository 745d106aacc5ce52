//! reqwest-backed ask client.

use async_trait::async_trait;
use reqwest::multipart::Form;
use url::Url;

use super::{AskBackend, AskError, AskResponse, ErrorBody, GENERIC_FAILURE};

/// Posts queries to a fixed ask URL.
///
/// # Example
///
/// ```rust,no_run
/// use exam_prep_chat::ask::{AskBackend, HttpAskBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpAskBackend::new("http://127.0.0.1:5001/api/ask")?;
/// let answer = backend.ask("What is inertia?").await?;
/// println!("{}", answer.explanation);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpAskBackend {
    endpoint: Url,
    http: reqwest::Client,
}

impl HttpAskBackend {
    /// Create a backend for the given endpoint URL.
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self, AskError> {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    /// Create a backend with a custom reqwest client.
    pub fn with_client(endpoint: impl AsRef<str>, http: reqwest::Client) -> Result<Self, AskError> {
        let endpoint = Url::parse(endpoint.as_ref())?;
        Ok(Self { endpoint, http })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn handle_response(response: reqwest::Response) -> Result<AskResponse, AskError> {
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }

        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .map(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());

        Err(AskError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl AskBackend for HttpAskBackend {
    async fn ask(&self, query: &str) -> Result<AskResponse, AskError> {
        tracing::debug!(
            name: "ask.request",
            endpoint = %self.endpoint,
            query_length = query.len(),
            "Posting query"
        );

        let form = Form::new().text("query", query.to_owned());
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        Self::handle_response(response).await
    }
}
