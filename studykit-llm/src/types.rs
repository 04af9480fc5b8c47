//! Core types for completion requests and results.

use serde_json::Value;

use crate::error::{LlmError, Result};

/// MIME type requested from the service in structured mode.
pub const JSON_MIME_TYPE: &str = "application/json";

/// A single prompt to send. Built per call and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    text: String,
    expects_structured: bool,
}

impl PromptRequest {
    /// Create a request.
    ///
    /// # Errors
    /// Returns `LlmError::InvalidPrompt` if `text` is empty or whitespace.
    pub fn new(text: impl Into<String>, expects_structured: bool) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(LlmError::InvalidPrompt("prompt must not be empty".into()));
        }
        Ok(Self {
            text,
            expects_structured,
        })
    }

    /// A free-text request.
    ///
    /// # Errors
    /// See [`PromptRequest::new`].
    pub fn plain(text: impl Into<String>) -> Result<Self> {
        Self::new(text, false)
    }

    /// A request whose reply must be JSON.
    ///
    /// # Errors
    /// See [`PromptRequest::new`].
    pub fn structured(text: impl Into<String>) -> Result<Self> {
        Self::new(text, true)
    }

    /// The prompt text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the reply should be parsed as JSON.
    #[must_use]
    pub fn expects_structured(&self) -> bool {
        self.expects_structured
    }
}

/// What a successful completion yields.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionResult {
    /// Reply text, verbatim.
    PlainText(String),
    /// Reply text parsed as JSON. Shape is not yet checked.
    StructuredData(Value),
}

impl CompletionResult {
    /// Borrow the text of a plain reply.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::PlainText(text) => Some(text),
            Self::StructuredData(_) => None,
        }
    }

    /// Take the text of a plain reply.
    ///
    /// # Errors
    /// Returns `LlmError::UnexpectedShape` for a structured reply.
    pub fn into_text(self) -> Result<String> {
        match self {
            Self::PlainText(text) => Ok(text),
            Self::StructuredData(_) => Err(LlmError::UnexpectedShape(
                "expected plain text, got structured data".into(),
            )),
        }
    }

    /// Take the value of a structured reply.
    ///
    /// # Errors
    /// Returns `LlmError::UnexpectedShape` for a plain reply.
    pub fn into_json(self) -> Result<Value> {
        match self {
            Self::StructuredData(value) => Ok(value),
            Self::PlainText(_) => Err(LlmError::UnexpectedShape(
                "expected structured data, got plain text".into(),
            )),
        }
    }
}
