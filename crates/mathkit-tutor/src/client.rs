//! Chat-completions client for tutor feedback.
//!
//! This module provides the [`TutorClient`] struct, a thin wrapper over a
//! `reqwest` client that sends a single user message and reads back the first
//! choice.

use std::time::Duration;

use mathkit_core::TutorConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{Result, TutorError, EMPTY_FEEDBACK, FAILED_FEEDBACK};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// # Example
///
/// ```no_run
/// use mathkit_core::TutorConfig;
/// use mathkit_tutor::TutorClient;
///
/// # async fn run() -> mathkit_tutor::Result<()> {
/// let client = TutorClient::new(&TutorConfig::default())?;
/// let text = client.feedback("Explain why 3 + 4 lands on 7.").await;
/// println!("{text}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TutorClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl TutorClient {
    /// Builds a client from configuration.
    ///
    /// The API key is read from the configured environment variable. A
    /// missing key is not an error here; requests will fail with
    /// [`TutorError::MissingApiKey`] instead.
    pub fn new(config: &TutorConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .build()?;
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Self {
            http,
            endpoint: format!(
                "{}/chat/completions",
                config.api_base.trim_end_matches('/')
            ),
            model: config.model.clone(),
            api_key,
            api_key_env: config.api_key_env.clone(),
        })
    }

    /// Replaces the API key read from the environment.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Full URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends `prompt` as a single user message.
    ///
    /// Returns the first choice's content, or `None` if the response had no
    /// content.
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    pub async fn complete(&self, prompt: &str) -> Result<Option<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| TutorError::MissingApiKey {
                env: self.api_key_env.clone(),
            })?;

        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TutorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content);
        debug!(has_content = content.is_some(), "Received completion");
        Ok(content)
    }

    /// Feedback text for `prompt`, never failing.
    ///
    /// An empty completion becomes [`EMPTY_FEEDBACK`]; any error is logged and
    /// becomes [`FAILED_FEEDBACK`].
    pub async fn feedback(&self, prompt: &str) -> String {
        match self.complete(prompt).await {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => EMPTY_FEEDBACK.to_string(),
            Err(e) => {
                warn!(error = %e, transient = e.is_transient(), "Tutor feedback failed");
                FAILED_FEEDBACK.to_string()
            }
        }
    }
}
