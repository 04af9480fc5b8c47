//! # studykit-core
//!
//! Network-free building blocks for the studykit student tools:
//!
//! - **SGPA targets**: the semester average needed to reach a target CGPA
//! - **Quizzes**: validated question sets and a play-through state machine
//! - **Timetables**: ordered day → schedule maps and the request that asks for one
//! - **Advice display**: bullet rewriting for model-written advice
//!
//! Configuration (`studykit.toml`) and logging setup live here too, so that
//! `studykit-llm` and any front end share one source of settings.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod advice;
pub mod config;
pub mod error;
pub mod quiz;
pub mod sgpa;
pub mod telemetry;
pub mod timetable;

pub use config::{LlmConfig, QuizConfig, StudykitConfig};
pub use error::CoreError;
pub use quiz::{AnswerFeedback, QuizPhase, QuizQuestion, QuizSession, QuizSet};
pub use sgpa::{SgpaInputs, SgpaOutcome, SgpaReport};
pub use timetable::{DaySchedule, ScheduleItem, Timetable, TimetableRequest};
