//! Quiz questions, question sets and the play-through state machine.
//!
//! A [`QuizSession`] starts in [`QuizPhase::Playing`] with a validated
//! [`QuizSet`], advances one question per submitted answer, and ends in
//! [`QuizPhase::Finished`]. Starting over means building a new session.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    question: String,
    options: [String; OPTION_COUNT],
    correct_answer: String,
}

impl QuizQuestion {
    /// Build a question, enforcing unique options and a correct answer
    /// that is one of them.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidInput` if an invariant does not hold.
    pub fn new(
        question: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_answer: impl Into<String>,
    ) -> Result<Self> {
        let question = question.into();
        let correct_answer = correct_answer.into();

        if question.trim().is_empty() {
            return Err(CoreError::invalid("question", "question text is empty"));
        }
        let distinct: HashSet<&str> = options.iter().map(String::as_str).collect();
        if distinct.len() != OPTION_COUNT {
            return Err(CoreError::invalid("options", "options must be unique"));
        }
        if !options.contains(&correct_answer) {
            return Err(CoreError::invalid(
                "correctAnswer",
                format!("'{correct_answer}' is not one of the options"),
            ));
        }

        Ok(Self {
            question,
            options,
            correct_answer,
        })
    }

    /// The question text.
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// The answer options in presentation order.
    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    /// The correct option.
    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// Whether `answer` is the correct option.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

/// A non-empty, ordered set of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuizSet(Vec<QuizQuestion>);

impl QuizSet {
    /// Wrap a list of questions.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidInput` if `questions` is empty.
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self> {
        if questions.is_empty() {
            return Err(CoreError::invalid("questions", "a quiz needs at least one question"));
        }
        Ok(Self(questions))
    }

    /// Number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Question at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&QuizQuestion> {
        self.0.get(index)
    }

    /// Iterate over the questions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, QuizQuestion> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a QuizSet {
    type Item = &'a QuizQuestion;
    type IntoIter = std::slice::Iter<'a, QuizQuestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    /// Questions remain.
    Playing,
    /// Every question has been answered.
    Finished,
}

/// Outcome of one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerFeedback {
    /// The selected option was correct.
    Correct,
    /// The selected option was wrong.
    Incorrect {
        /// The option that would have been correct.
        correct_answer: String,
    },
}

impl AnswerFeedback {
    /// Message shown to the player.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Correct => "Correct!".to_string(),
            Self::Incorrect { correct_answer } => {
                format!("Incorrect. The correct answer was: {correct_answer}")
            }
        }
    }
}

/// A single play-through of a quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    subject: String,
    questions: QuizSet,
    current: usize,
    score: usize,
    phase: QuizPhase,
}

impl QuizSession {
    /// Start a session on the first question.
    #[must_use]
    pub fn new(subject: impl Into<String>, questions: QuizSet) -> Self {
        Self {
            subject: subject.into(),
            questions,
            current: 0,
            score: 0,
            phase: QuizPhase::Playing,
        }
    }

    /// Subject the quiz was generated for.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The underlying question set.
    #[must_use]
    pub fn questions(&self) -> &QuizSet {
        &self.questions
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    /// Zero-based index of the question awaiting an answer.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question awaiting an answer, or `None` once finished.
    #[must_use]
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            QuizPhase::Playing => self.questions.get(self.current),
            QuizPhase::Finished => None,
        }
    }

    /// Correct answers so far.
    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Number of questions in the session.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Answer the current question and advance.
    ///
    /// # Errors
    /// - `CoreError::NoAnswerSelected` if `selected` is empty.
    /// - `CoreError::InvalidInput` if `selected` is not one of the options.
    /// - `CoreError::QuizFinished` if every question was already answered.
    pub fn submit_answer(&mut self, selected: &str) -> Result<AnswerFeedback> {
        let Some(question) = self.current_question() else {
            return Err(CoreError::QuizFinished {
                score: self.score,
                total: self.total(),
            });
        };
        if selected.is_empty() {
            return Err(CoreError::NoAnswerSelected);
        }
        if !question.options().iter().any(|o| o == selected) {
            return Err(CoreError::invalid(
                "answer",
                format!("'{selected}' is not one of the options"),
            ));
        }

        let feedback = if question.is_correct(selected) {
            AnswerFeedback::Correct
        } else {
            AnswerFeedback::Incorrect {
                correct_answer: question.correct_answer().to_string(),
            }
        };

        if feedback == AnswerFeedback::Correct {
            self.score += 1;
        }
        if self.current + 1 < self.total() {
            self.current += 1;
        } else {
            self.phase = QuizPhase::Finished;
        }

        Ok(feedback)
    }
}
