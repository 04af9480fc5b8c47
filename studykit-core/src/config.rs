//! Configuration for studykit.
//!
//! Maps directly to `studykit.toml`. Every section is optional; missing
//! values fall back to the defaults below. The API credential is usually
//! injected by the embedding program with [`LlmConfig::with_api_key`] rather
//! than written to disk.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Top-level studykit configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudykitConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Generative-language endpoint settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Quiz generation settings.
    #[serde(default)]
    pub quiz: QuizConfig,
}

impl StudykitConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `CoreError::Config` if the TOML is invalid or a value is out of range.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    /// Returns `CoreError::Config` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.llm.base_url.trim().is_empty() {
            return Err(CoreError::Config("llm.base_url must not be empty".into()));
        }
        if self.llm.model.trim().is_empty() {
            return Err(CoreError::Config("llm.model must not be empty".into()));
        }
        if self.quiz.question_count == 0 {
            return Err(CoreError::Config("quiz.question_count must be at least 1".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error. `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format: "pretty" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

/// Settings for the remote `generateContent` endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Scheme and host of the service, without a trailing path.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier placed in the request path.
    #[serde(default = "default_model")]
    pub model: String,
    /// API credential sent as the `key` query parameter.
    #[serde(default)]
    pub api_key: String,
    /// Extra attempts after a retryable failure. Zero means at-most-once.
    #[serde(default)]
    pub max_retries: u32,
}

impl LlmConfig {
    /// Replace the API credential.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Point the client at a different host (tests, proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether a credential has been supplied.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: String::new(),
            max_retries: 0,
        }
    }
}

// The credential must never reach logs.
impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &if self.has_api_key() { "<redacted>" } else { "<unset>" })
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Quiz generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Number of questions requested from the model.
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    /// Reject replies whose length differs from `question_count`.
    /// When false, any non-empty set of well-formed questions is accepted.
    #[serde(default = "default_true")]
    pub exact_count: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            exact_count: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }
fn default_base_url() -> String { "https://generativelanguage.googleapis.com".to_string() }
fn default_model() -> String { "gemini-2.0-flash".to_string() }
fn default_question_count() -> usize { 5 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = StudykitConfig::from_toml("").expect("empty config should parse");
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.llm.model, "gemini-2.0-flash");
        assert_eq!(config.llm.max_retries, 0);
        assert!(!config.llm.has_api_key());
        assert_eq!(config.quiz.question_count, 5);
        assert!(config.quiz.exact_count);
    }

    #[test]
    fn partial_sections_override_defaults() {
        let config = StudykitConfig::from_toml(
            r#"
            [llm]
            model = "gemini-1.5-pro"
            max_retries = 2

            [quiz]
            exact_count = false
            "#,
        )
        .expect("should parse");
        assert_eq!(config.llm.model, "gemini-1.5-pro");
        assert_eq!(config.llm.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.llm.max_retries, 2);
        assert!(!config.quiz.exact_count);
        assert_eq!(config.quiz.question_count, 5);
    }

    #[test]
    fn zero_question_count_is_rejected() {
        let err = StudykitConfig::from_toml("[quiz]\nquestion_count = 0").expect_err("should fail");
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn blank_model_is_rejected() {
        let err = StudykitConfig::from_toml("[llm]\nmodel = \"  \"").expect_err("should fail");
        assert!(err.to_string().contains("llm.model"));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = StudykitConfig::from_toml("[llm\nmodel = 1").expect_err("should fail");
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = LlmConfig::default().with_api_key("secret-key-123");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-key-123"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("studykit.toml");
        std::fs::write(&path, "[general]\nlog_level = \"debug\"\n").expect("write");
        let config = StudykitConfig::from_file(&path).expect("should load");
        assert_eq!(config.general.log_level, "debug");
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let err = StudykitConfig::from_file(std::path::Path::new("/nonexistent/studykit.toml"))
            .expect_err("should fail");
        assert!(matches!(err, CoreError::Io(_)));
    }
}
