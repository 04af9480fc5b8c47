//! # studykit-llm: Completion Layer for studykit
//!
//! Everything that talks to the generative-language service goes through
//! this crate:
//!
//!   - **Client**: one `generateContent` exchange per call, plain or JSON mode
//!   - **Validation**: quiz and timetable shape checks on parsed replies
//!   - **Prompts**: built-in templates, optionally overridden from TOML
//!   - **Assistant**: prompt → completion → shape check for each tool
//!
//! # Architecture
//!
//! ```text
//! caller ──► StudyAssistant ──► PromptEngine ──► PromptRequest
//!                 │
//!                 ▼
//!          CompletionBackend (GeminiClient) ──► CompletionResult
//!                 │
//!                 ▼
//!          validate_quiz / validate_timetable ──► QuizSet / Timetable
//! ```
//!
//! The client never knows which shape a caller expects; callers pick the
//! check explicitly.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assistant;
pub mod client;
pub mod error;
pub mod prompt;
pub mod types;
pub mod validate;

pub use assistant::StudyAssistant;
pub use client::{CompletionBackend, GeminiClient};
pub use error::{ErrorKind, LlmError};
pub use types::{CompletionResult, PromptRequest};
pub use validate::{QuizCountPolicy, validate_quiz, validate_timetable};
