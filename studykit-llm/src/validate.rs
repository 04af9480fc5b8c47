//! Shape checks for structured replies.
//!
//! Each check is a pure function from a parsed JSON value to a typed
//! domain value. Nothing is repaired or coerced: the first violation ends
//! the check with `InvalidQuizShape` or `InvalidTimetableShape`.

use std::collections::HashSet;

use serde_json::{Map, Value};

use studykit_core::config::QuizConfig;
use studykit_core::quiz::{OPTION_COUNT, QuizQuestion, QuizSet};
use studykit_core::timetable::{DaySchedule, ScheduleItem, Timetable};

use crate::error::{LlmError, Result};

/// How many questions a quiz reply must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCountPolicy {
    /// Exactly this many.
    Exactly(usize),
    /// Any non-empty count.
    AtLeastOne,
}

impl QuizCountPolicy {
    /// Policy described by the `[quiz]` config section.
    #[must_use]
    pub fn from_config(config: &QuizConfig) -> Self {
        if config.exact_count {
            Self::Exactly(config.question_count)
        } else {
            Self::AtLeastOne
        }
    }
}

impl Default for QuizCountPolicy {
    fn default() -> Self {
        Self::Exactly(5)
    }
}

/// Check that `value` is a quiz: an array of question objects, each with a
/// `question` string, exactly four unique string `options`, and a
/// `correctAnswer` that is one of the options.
///
/// # Errors
/// Returns `LlmError::InvalidQuizShape`, with the question index when the
/// fault lies inside a question.
pub fn validate_quiz(value: &Value, policy: QuizCountPolicy) -> Result<QuizSet> {
    let Some(items) = value.as_array() else {
        return Err(LlmError::quiz(None, format!("expected a JSON array, got {}", type_name(value))));
    };
    if items.is_empty() {
        return Err(LlmError::quiz(None, "no questions returned"));
    }

    let questions = items
        .iter()
        .enumerate()
        .map(|(i, item)| quiz_question(i, item))
        .collect::<Result<Vec<_>>>()?;

    if let QuizCountPolicy::Exactly(expected) = policy {
        if questions.len() != expected {
            return Err(LlmError::quiz(
                None,
                format!("expected {expected} questions, got {}", questions.len()),
            ));
        }
    }

    QuizSet::new(questions).map_err(|e| LlmError::quiz(None, e.to_string()))
}

fn quiz_question(index: usize, item: &Value) -> Result<QuizQuestion> {
    let fail = |reason: String| LlmError::quiz(Some(index), reason);

    let Some(obj) = item.as_object() else {
        return Err(fail(format!("expected an object, got {}", type_name(item))));
    };

    let question = match obj.get("question") {
        Some(Value::String(q)) if !q.trim().is_empty() => q.clone(),
        Some(Value::String(_)) => return Err(fail("'question' is empty".into())),
        Some(other) => return Err(fail(format!("'question' must be a string, got {}", type_name(other)))),
        None => return Err(fail("missing 'question'".into())),
    };

    let options = match obj.get("options") {
        Some(Value::Array(opts)) => opts,
        Some(other) => return Err(fail(format!("'options' must be an array, got {}", type_name(other)))),
        None => return Err(fail("missing 'options'".into())),
    };
    if options.len() != OPTION_COUNT {
        return Err(fail(format!("expected {OPTION_COUNT} options, got {}", options.len())));
    }
    let mut texts: Vec<String> = Vec::with_capacity(OPTION_COUNT);
    for (k, opt) in options.iter().enumerate() {
        match opt.as_str() {
            Some(s) => texts.push(s.to_string()),
            None => return Err(fail(format!("option {k} must be a string, got {}", type_name(opt)))),
        }
    }
    let distinct: HashSet<&str> = texts.iter().map(String::as_str).collect();
    if distinct.len() != OPTION_COUNT {
        return Err(fail("options must be unique".into()));
    }

    let correct = match obj.get("correctAnswer") {
        Some(Value::String(c)) => c.clone(),
        Some(other) => {
            return Err(fail(format!("'correctAnswer' must be a string, got {}", type_name(other))));
        }
        None => return Err(fail("missing 'correctAnswer'".into())),
    };
    if !texts.contains(&correct) {
        return Err(fail(format!("correctAnswer '{correct}' is not one of the options")));
    }

    let options: [String; OPTION_COUNT] = texts
        .try_into()
        .map_err(|_| fail(format!("expected {OPTION_COUNT} options")))?;
    QuizQuestion::new(question, options, correct).map_err(|e| fail(e.to_string()))
}

/// Check that `value` is a timetable: a non-empty object whose values are
/// arrays (possibly empty) of objects that each carry `time` and `activity`.
///
/// Only the presence of each key is checked. String fields are taken
/// verbatim, a `null` value becomes an empty string, and other values are
/// kept as their JSON text. Day order is preserved.
///
/// # Errors
/// Returns `LlmError::InvalidTimetableShape`, naming the day when the fault
/// lies inside one.
pub fn validate_timetable(value: &Value) -> Result<Timetable> {
    let Some(days) = value.as_object() else {
        return Err(LlmError::timetable(
            None,
            format!("expected a JSON object, got {}", type_name(value)),
        ));
    };
    if days.is_empty() {
        return Err(LlmError::timetable(None, "timetable has no days"));
    }

    let days = days
        .iter()
        .map(|(day, schedule)| -> Result<(String, DaySchedule)> {
            Ok((day.clone(), day_schedule(day, schedule)?))
        })
        .collect::<Result<Vec<_>>>()?;

    Timetable::new(days).map_err(|e| LlmError::timetable(None, e.to_string()))
}

fn day_schedule(day: &str, value: &Value) -> Result<DaySchedule> {
    let Some(items) = value.as_array() else {
        return Err(LlmError::timetable(
            Some(day),
            format!("expected an array of schedule items, got {}", type_name(value)),
        ));
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| -> Result<ScheduleItem> {
            let Some(obj) = item.as_object() else {
                return Err(LlmError::timetable(
                    Some(day),
                    format!("item {i} must be an object, got {}", type_name(item)),
                ));
            };
            Ok(ScheduleItem::new(
                required_field(day, i, obj, "time")?,
                required_field(day, i, obj, "activity")?,
            ))
        })
        .collect()
}

fn required_field(day: &str, index: usize, obj: &Map<String, Value>, field: &str) -> Result<String> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) => Ok(String::new()),
        Some(other) => Ok(other.to_string()),
        None => Err(LlmError::timetable(
            Some(day),
            format!("item {index} is missing '{field}'"),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
