//! Error types for the studykit core library.

use thiserror::Error;

/// Top-level error type for core (non-network) operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration could not be parsed or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// User-supplied input failed validation.
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput {
        /// Which input field was rejected.
        field: &'static str,
        /// Human-readable explanation shown to the user.
        reason: String,
    },

    /// An answer was submitted without selecting an option.
    #[error("Please select an answer")]
    NoAnswerSelected,

    /// The quiz has already finished; no further answers are accepted.
    #[error("Quiz already finished with score {score}/{total}")]
    QuizFinished {
        /// Final score.
        score: usize,
        /// Number of questions in the quiz.
        total: usize,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, CoreError>;
