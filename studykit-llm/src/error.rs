//! Completion and validation error types.

use thiserror::Error;

/// Errors that can occur during a completion round trip.
///
/// None of these are fatal to the process; each is returned to the caller
/// with enough detail to show the user and decide on a retry.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The HTTP call did not complete, or returned a non-success status.
    #[error("API request failed{}: {body}", status_suffix(.status))]
    Transport {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Response body, or the transport error text.
        body: String,
    },

    /// The service refused the prompt on policy/safety grounds.
    #[error("Request blocked by API due to: {reason}")]
    BlockedContent {
        /// The stated `blockReason`.
        reason: String,
        /// Raw `safetyRatings`, serialized, when the service sent them.
        safety_ratings: Option<String>,
    },

    /// A success response lacked the candidate/content/text envelope.
    #[error("Unexpected API response structure or content missing: {0}")]
    UnexpectedShape(String),

    /// Structured mode was requested but the reply text is not JSON.
    #[error("AI returned malformed JSON: {detail}")]
    MalformedOutput {
        /// The reply text as received.
        raw: String,
        /// Parser message.
        detail: String,
    },

    /// Valid JSON that does not describe a quiz.
    #[error("Received invalid quiz format{}: {reason}", index_suffix(.index))]
    InvalidQuizShape {
        /// Zero-based index of the offending question, if the fault is inside one.
        index: Option<usize>,
        /// What was wrong.
        reason: String,
    },

    /// Valid JSON that does not describe a timetable.
    #[error("AI returned an invalid timetable structure{}: {reason}", day_suffix(.day))]
    InvalidTimetableShape {
        /// Day label whose schedule is at fault, if any.
        day: Option<String>,
        /// What was wrong.
        reason: String,
    },

    /// The prompt (or the input it is built from) was rejected before sending.
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    /// Client or template configuration is unusable.
    #[error("LLM configuration error: {0}")]
    Config(String),
}

/// Fieldless classification of [`LlmError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`LlmError::Transport`].
    Transport,
    /// See [`LlmError::BlockedContent`].
    BlockedContent,
    /// See [`LlmError::UnexpectedShape`].
    UnexpectedShape,
    /// See [`LlmError::MalformedOutput`].
    MalformedOutput,
    /// See [`LlmError::InvalidQuizShape`].
    InvalidQuizShape,
    /// See [`LlmError::InvalidTimetableShape`].
    InvalidTimetableShape,
    /// See [`LlmError::InvalidPrompt`].
    InvalidPrompt,
    /// See [`LlmError::Config`].
    Config,
}

impl LlmError {
    /// Classification without the diagnostic payload.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::BlockedContent { .. } => ErrorKind::BlockedContent,
            Self::UnexpectedShape(_) => ErrorKind::UnexpectedShape,
            Self::MalformedOutput { .. } => ErrorKind::MalformedOutput,
            Self::InvalidQuizShape { .. } => ErrorKind::InvalidQuizShape,
            Self::InvalidTimetableShape { .. } => ErrorKind::InvalidTimetableShape,
            Self::InvalidPrompt(_) => ErrorKind::InvalidPrompt,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether sending the same prompt again may succeed.
    ///
    /// Blocked prompts, invalid prompts and configuration errors will fail
    /// the same way every time.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self.kind(),
            ErrorKind::BlockedContent | ErrorKind::InvalidPrompt | ErrorKind::Config
        )
    }

    pub(crate) fn quiz(index: Option<usize>, reason: impl Into<String>) -> Self {
        Self::InvalidQuizShape {
            index,
            reason: reason.into(),
        }
    }

    pub(crate) fn timetable(day: Option<&str>, reason: impl Into<String>) -> Self {
        Self::InvalidTimetableShape {
            day: day.map(str::to_string),
            reason: reason.into(),
        }
    }
}

// The request URL carries the API key, so it is stripped before the error
// text is kept.
impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        LlmError::Transport {
            status: err.status().map(|s| s.as_u16()),
            body: err.to_string(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
}

fn index_suffix(index: &Option<usize>) -> String {
    index.map(|i| format!(" (question {})", i + 1)).unwrap_or_default()
}

fn day_suffix(day: &Option<String>) -> String {
    day.as_ref().map(|d| format!(" for '{d}'")).unwrap_or_default()
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_message_includes_status() {
        let err = LlmError::Transport {
            status: Some(503),
            body: "overloaded".into(),
        };
        assert_eq!(err.to_string(), "API request failed with status 503: overloaded");

        let err = LlmError::Transport {
            status: None,
            body: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "API request failed: connection refused");
    }

    #[test]
    fn quiz_message_is_one_based() {
        let err = LlmError::quiz(Some(2), "missing options");
        assert_eq!(
            err.to_string(),
            "Received invalid quiz format (question 3): missing options"
        );
    }

    #[test]
    fn timetable_message_names_day() {
        let err = LlmError::timetable(Some("Monday"), "item 0 is missing 'activity'");
        assert!(err.to_string().contains("for 'Monday'"));
    }

    #[test]
    fn retry_guidance() {
        assert!(LlmError::UnexpectedShape("no candidates".into()).is_retryable());
        assert!(
            LlmError::MalformedOutput {
                raw: "{".into(),
                detail: "eof".into()
            }
            .is_retryable()
        );
        assert!(LlmError::quiz(None, "empty").is_retryable());
        assert!(
            !LlmError::BlockedContent {
                reason: "SAFETY".into(),
                safety_ratings: None
            }
            .is_retryable()
        );
        assert!(!LlmError::InvalidPrompt("empty".into()).is_retryable());
    }
}
