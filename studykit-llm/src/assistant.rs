//! Round trips for the three student tools.
//!
//! [`StudyAssistant`] builds the prompt, runs the completion, and applies
//! the matching shape check. Retrying is off unless `llm.max_retries` is
//! set; even then blocked or invalid prompts fail immediately.

use tracing::{debug, info, warn};

use studykit_core::config::StudykitConfig;
use studykit_core::quiz::QuizSession;
use studykit_core::sgpa::SgpaReport;
use studykit_core::timetable::{Timetable, TimetableRequest};

use crate::client::CompletionBackend;
use crate::error::{LlmError, Result};
use crate::prompt::PromptEngine;
use crate::types::{CompletionResult, PromptRequest};
use crate::validate::{self, QuizCountPolicy};

/// Front door for callers: one method per tool.
pub struct StudyAssistant<B> {
    backend: B,
    prompts: PromptEngine,
    question_count: usize,
    quiz_policy: QuizCountPolicy,
    max_retries: u32,
}

impl<B: CompletionBackend> StudyAssistant<B> {
    /// Create an assistant over `backend` with the built-in prompts.
    #[must_use]
    pub fn new(backend: B, config: &StudykitConfig) -> Self {
        Self {
            backend,
            prompts: PromptEngine::builtin(),
            question_count: config.quiz.question_count,
            quiz_policy: QuizCountPolicy::from_config(&config.quiz),
            max_retries: config.llm.max_retries,
        }
    }

    /// Use a different prompt set.
    #[must_use]
    pub fn with_prompts(mut self, prompts: PromptEngine) -> Self {
        self.prompts = prompts;
        self
    }

    /// The underlying completion backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Ask for study advice on reaching the report's target. The reply is
    /// returned exactly as the model wrote it.
    ///
    /// # Errors
    /// Any completion failure.
    pub async fn study_advice(&self, report: &SgpaReport) -> Result<String> {
        let request = self.prompts.study_advice(report)?;
        self.round_trip(&request, CompletionResult::into_text).await
    }

    /// Generate a quiz on `subject` and start a session on it.
    ///
    /// # Errors
    /// `InvalidPrompt` for a blank subject, otherwise any completion or
    /// quiz-shape failure.
    pub async fn generate_quiz(&self, subject: &str) -> Result<QuizSession> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(LlmError::InvalidPrompt("please enter a subject for the quiz".into()));
        }

        let request = self.prompts.quiz(subject, self.question_count)?;
        let policy = self.quiz_policy;
        let questions = self
            .round_trip(&request, |result| validate::validate_quiz(&result.into_json()?, policy))
            .await?;

        info!(subject, questions = questions.len(), "Quiz generated");
        Ok(QuizSession::new(subject, questions))
    }

    /// Generate a weekly timetable.
    ///
    /// # Errors
    /// `InvalidPrompt` for missing subjects or hours, otherwise any
    /// completion or timetable-shape failure.
    pub async fn generate_timetable(&self, request: &TimetableRequest) -> Result<Timetable> {
        request
            .validate()
            .map_err(|e| LlmError::InvalidPrompt(e.to_string()))?;

        let prompt = self.prompts.timetable(request)?;
        let timetable = self
            .round_trip(&prompt, |result| validate::validate_timetable(&result.into_json()?))
            .await?;

        info!(days = timetable.len(), slots = timetable.slot_count(), "Timetable generated");
        Ok(timetable)
    }

    /// Complete `request` and check the result, retrying retryable
    /// failures up to `max_retries` extra times.
    async fn round_trip<T, F>(&self, request: &PromptRequest, check: F) -> Result<T>
    where
        F: Fn(CompletionResult) -> Result<T>,
    {
        let mut attempt: u32 = 0;
        loop {
            if attempt > 0 {
                debug!(
                    "Retrying completion (attempt {}/{})",
                    attempt.saturating_add(1),
                    self.max_retries.saturating_add(1)
                );
            }

            match self.backend.complete(request).await.and_then(&check) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    warn!(kind = ?err.kind(), error = %err, "Completion attempt failed; retrying");
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
