//! Completion client for the Gemini `generateContent` API.
//!
//! One call to [`CompletionBackend::complete`] is one HTTP exchange: no
//! retries, no timeout, no caching. Reply envelopes are read as
//! `serde_json::Value` and classified by [`interpret_reply`].

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use studykit_core::config::LlmConfig;

use crate::error::{LlmError, Result};
use crate::types::{CompletionResult, JSON_MIME_TYPE, PromptRequest};

/// Anything that can turn a prompt into a completion.
///
/// [`GeminiClient`] is the production implementation; tests substitute
/// scripted backends.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Perform one completion exchange.
    ///
    /// # Errors
    /// Returns the classified failure; see [`LlmError`].
    async fn complete(&self, request: &PromptRequest) -> Result<CompletionResult>;

    /// Model identifier used for requests.
    fn model(&self) -> &str;

    /// Complete a free-text prompt and return the reply verbatim.
    ///
    /// # Errors
    /// As [`CompletionBackend::complete`], plus `InvalidPrompt` for an empty prompt.
    async fn complete_text(&self, prompt: &str) -> Result<String> {
        let request = PromptRequest::plain(prompt)?;
        self.complete(&request).await?.into_text()
    }

    /// Complete a prompt in structured mode and return the parsed JSON.
    ///
    /// # Errors
    /// As [`CompletionBackend::complete`], plus `InvalidPrompt` for an empty prompt.
    async fn complete_json(&self, prompt: &str) -> Result<Value> {
        let request = PromptRequest::structured(prompt)?;
        self.complete(&request).await?.into_json()
    }
}

/// HTTP client bound to one endpoint, model and credential.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    /// Returns `LlmError::Config` if the API key, base URL or model is empty.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Self::with_http_client(config, Client::new())
    }

    /// Create a client that reuses an existing `reqwest::Client`.
    ///
    /// # Errors
    /// See [`GeminiClient::new`].
    pub fn with_http_client(config: &LlmConfig, http: Client) -> Result<Self> {
        if !config.has_api_key() {
            return Err(LlmError::Config("no API key configured".into()));
        }
        if config.base_url.trim().is_empty() {
            return Err(LlmError::Config("base_url must not be empty".into()));
        }
        if config.model.trim().is_empty() {
            return Err(LlmError::Config("model must not be empty".into()));
        }

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Endpoint URL without the credential.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CompletionBackend for GeminiClient {
    async fn complete(&self, request: &PromptRequest) -> Result<CompletionResult> {
        debug!(
            model = %self.model,
            structured = request.expects_structured(),
            prompt_len = request.text().len(),
            "Sending generateContent request"
        );

        let resp = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| {
                let err = LlmError::from(e);
                warn!(error = %err, "generateContent request did not complete");
                err
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            let err = LlmError::Transport {
                status: Some(status.as_u16()),
                body: e.without_url().to_string(),
            };
            warn!(error = %err, "generateContent response body could not be read");
            err
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "generateContent returned an error status");
            return Err(LlmError::Transport {
                status: Some(status.as_u16()),
                body,
            });
        }

        let envelope: Value = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "generateContent success body is not JSON");
            LlmError::UnexpectedShape(format!("response body is not JSON: {e}"))
        })?;

        interpret_reply(&envelope, request.expects_structured())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Build the JSON body for a request.
///
/// `generationConfig` is only present in structured mode.
#[must_use]
pub fn request_body(request: &PromptRequest) -> Value {
    let mut body = json!({
        "contents": [
            { "role": "user", "parts": [ { "text": request.text() } ] }
        ]
    });

    if request.expects_structured() {
        body["generationConfig"] = json!({ "responseMimeType": JSON_MIME_TYPE });
    }

    body
}

/// Classify a success envelope.
///
/// Reads `candidates[0].content.parts[0].text`. When it is absent, a
/// `promptFeedback.blockReason` makes the failure `BlockedContent`;
/// otherwise it is `UnexpectedShape`.
///
/// # Errors
/// `BlockedContent`, `UnexpectedShape`, or `MalformedOutput` (structured mode only).
pub fn interpret_reply(envelope: &Value, structured: bool) -> Result<CompletionResult> {
    let Some(text) = envelope["candidates"][0]["content"]["parts"][0]["text"].as_str() else {
        if let Some(reason) = envelope["promptFeedback"]["blockReason"].as_str() {
            let ratings = &envelope["promptFeedback"]["safetyRatings"];
            warn!(reason, "Prompt blocked by the service");
            return Err(LlmError::BlockedContent {
                reason: reason.to_string(),
                safety_ratings: (!ratings.is_null()).then(|| ratings.to_string()),
            });
        }

        let detail = match envelope["candidates"][0]["finishReason"].as_str() {
            Some(finish) => format!("no candidate text (finishReason: {finish})"),
            None => "no candidate text".to_string(),
        };
        warn!(%detail, "Unexpected generateContent response structure");
        return Err(LlmError::UnexpectedShape(detail));
    };

    if !structured {
        return Ok(CompletionResult::PlainText(text.to_string()));
    }

    serde_json::from_str(text)
        .map(CompletionResult::StructuredData)
        .map_err(|e| {
            warn!(error = %e, raw_len = text.len(), "Structured reply is not valid JSON");
            LlmError::MalformedOutput {
                raw: text.to_string(),
                detail: e.to_string(),
            }
        })
}
