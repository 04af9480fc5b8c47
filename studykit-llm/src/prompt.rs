//! Prompt templates for the three student tools.
//!
//! Templates use `{key}` placeholders filled by [`render_template`]. The
//! built-in set lives in the constants below; a directory of versioned TOML
//! files can replace any of them at startup.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use studykit_core::sgpa::SgpaReport;
use studykit_core::timetable::TimetableRequest;

use crate::error::{LlmError, Result};
use crate::types::PromptRequest;

/// Study advice for a required-SGPA result (free text).
pub const STUDY_ADVICE: &str = "I am a student with a current CGPA of {current_cgpa} over {completed_credits} credits. \
My target CGPA is {target_cgpa}. For my next semester of {next_semester_credits} credits, I need to score an SGPA of {required_sgpa}. \
Please provide concise, actionable study advice and motivational tips (max 3-4 bullet points) to help me achieve this. \
If the required SGPA is above 10, acknowledge the difficulty. \
If it's below 0, suggest checking inputs or acknowledge they are well on track.";

/// Multiple-choice quiz generation (JSON array).
pub const QUIZ_GENERATION: &str = r#"Generate {question_count} multiple-choice quiz questions on the topic of "{subject}".
Each question MUST be an object with "question" (string), "options" (array of 4 unique strings), and "correctAnswer" (string, which MUST be one of the options).
Return the response strictly as a JSON array of these question objects. Do not include any text before or after the JSON array.
Example: [{"question": "What is the capital of France?", "options": ["Berlin", "Madrid", "Paris", "Rome"], "correctAnswer": "Paris"}, ...]"#;

/// Weekly study timetable generation (JSON object).
pub const TIMETABLE_GENERATION: &str = r#"Generate a 5-day weekly study timetable (Monday to Friday) based on the following. Return the timetable as a JSON object.
The top-level keys should be days of the week (e.g., "Monday", "Tuesday", "Wednesday", "Thursday", "Friday").
The value for each day should be an array of schedule items.
Each schedule item MUST be an object with "time" (string, e.g., "09:00 - 10:00") and "activity" (string, e.g., "Subject Name", "Lunch Break", "Self-study: Subject Name").
Prioritize scheduling the listed subjects. Include breaks (e.g., a lunch break). If preferences mention specific timings for breaks or subjects, try to adhere to them.
Ensure activities cover the college duration from {day_start} to {day_end}.
Allocate time for all subjects: {subjects}.
Preferences: {preferences}.
Example for one day: "Monday": [{"time": "09:00 - 10:00", "activity": "Physics Lecture"}, {"time": "10:00 - 10:15", "activity": "Short Break"}, {"time": "10:15 - 11:15", "activity": "Maths Problem Solving"}]
The response MUST be a valid JSON object. Do not include any explanatory text before or after the JSON object."#;

/// Simple template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value. Unknown placeholders and
/// other braces are left untouched.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

// ---------------------------------------------------------------------------
// PromptEngine: built-in templates with optional TOML overrides
// ---------------------------------------------------------------------------

/// Identifies a prompt template by purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Advice for reaching a target CGPA.
    StudyAdvice,
    /// Topic quiz.
    QuizGeneration,
    /// Weekly timetable.
    TimetableGeneration,
}

impl PromptId {
    /// Returns the TOML filename (without path) for this prompt.
    #[must_use]
    pub fn filename(self) -> &'static str {
        match self {
            Self::StudyAdvice => "study_advice.toml",
            Self::QuizGeneration => "quiz_generation.toml",
            Self::TimetableGeneration => "timetable_generation.toml",
        }
    }

    /// All prompt IDs.
    #[must_use]
    pub fn all() -> &'static [PromptId] {
        &[Self::StudyAdvice, Self::QuizGeneration, Self::TimetableGeneration]
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StudyAdvice => "study_advice",
            Self::QuizGeneration => "quiz_generation",
            Self::TimetableGeneration => "timetable_generation",
        };
        write!(f, "{name}")
    }
}

impl FromStr for PromptId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "study_advice" => Ok(Self::StudyAdvice),
            "quiz_generation" => Ok(Self::QuizGeneration),
            "timetable_generation" => Ok(Self::TimetableGeneration),
            _ => Err(format!("unknown prompt id: '{s}'")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TomlPromptFile {
    prompt: TomlPromptData,
}

#[derive(Debug, Clone, Deserialize)]
struct TomlPromptData {
    version: String,
    structured: bool,
    text: String,
}

/// A loaded, ready-to-render prompt template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// Prompt version string (e.g., "1.0").
    pub version: String,
    /// Whether replies to this prompt are requested as JSON.
    pub structured: bool,
    /// Template text with `{key}` placeholders.
    pub text: String,
}

/// Holds one template per [`PromptId`] and renders them into requests.
///
/// # Example
///
/// ```
/// use studykit_llm::prompt::{PromptEngine, PromptId};
///
/// let engine = PromptEngine::builtin();
/// let request = engine
///     .render(PromptId::QuizGeneration, &[("subject", "Photosynthesis"), ("question_count", "5")])
///     .unwrap();
/// assert!(request.expects_structured());
/// assert!(request.text().contains("Photosynthesis"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptEngine {
    templates: HashMap<PromptId, PromptTemplate>,
}

impl PromptEngine {
    /// Create a `PromptEngine` with the compiled-in templates.
    #[must_use]
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();

        templates.insert(PromptId::StudyAdvice, PromptTemplate {
            version: "builtin".into(),
            structured: false,
            text: STUDY_ADVICE.into(),
        });

        templates.insert(PromptId::QuizGeneration, PromptTemplate {
            version: "builtin".into(),
            structured: true,
            text: QUIZ_GENERATION.into(),
        });

        templates.insert(PromptId::TimetableGeneration, PromptTemplate {
            version: "builtin".into(),
            structured: true,
            text: TIMETABLE_GENERATION.into(),
        });

        Self { templates }
    }

    /// Start from the built-in templates and replace any that have a TOML
    /// file in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if `dir` does not exist, or if a template
    /// file exists but cannot be read or parsed.
    pub fn with_overrides(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(LlmError::Config(format!(
                "prompt directory not found: {}",
                dir.display()
            )));
        }

        let mut engine = Self::builtin();
        for id in PromptId::all() {
            let path: PathBuf = dir.join(id.filename());
            if path.exists() {
                let template = load_template(&path)?;
                tracing::debug!(prompt = %id, version = %template.version, "Loaded prompt override");
                engine.templates.insert(*id, template);
            }
        }
        Ok(engine)
    }

    /// Get a loaded prompt template by ID.
    #[must_use]
    pub fn get(&self, id: PromptId) -> Option<&PromptTemplate> {
        self.templates.get(&id)
    }

    /// Render a template into a request, carrying the template's mode.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if the template is not loaded, or
    /// `LlmError::InvalidPrompt` if it renders to an empty prompt.
    pub fn render(&self, id: PromptId, vars: &[(&str, &str)]) -> Result<PromptRequest> {
        let tpl = self
            .get(id)
            .ok_or_else(|| LlmError::Config(format!("prompt template '{id}' not loaded")))?;
        PromptRequest::new(render_template(&tpl.text, vars), tpl.structured)
    }

    /// Advice request for an SGPA report.
    ///
    /// # Errors
    /// See [`PromptEngine::render`].
    pub fn study_advice(&self, report: &SgpaReport) -> Result<PromptRequest> {
        let current = format!("{:.2}", report.inputs.current_cgpa);
        let completed = report.inputs.completed_credits.to_string();
        let target = format!("{:.2}", report.inputs.target_cgpa);
        let next = report.inputs.next_semester_credits.to_string();
        let required = report.display_sgpa();
        self.render(PromptId::StudyAdvice, &[
            ("current_cgpa", current.as_str()),
            ("completed_credits", completed.as_str()),
            ("target_cgpa", target.as_str()),
            ("next_semester_credits", next.as_str()),
            ("required_sgpa", required.as_str()),
        ])
    }

    /// Quiz request for a subject.
    ///
    /// # Errors
    /// See [`PromptEngine::render`].
    pub fn quiz(&self, subject: &str, question_count: usize) -> Result<PromptRequest> {
        let count = question_count.to_string();
        self.render(PromptId::QuizGeneration, &[
            ("subject", subject),
            ("question_count", count.as_str()),
        ])
    }

    /// Timetable request.
    ///
    /// # Errors
    /// See [`PromptEngine::render`].
    pub fn timetable(&self, request: &TimetableRequest) -> Result<PromptRequest> {
        self.render(PromptId::TimetableGeneration, &[
            ("day_start", request.day_start.as_str()),
            ("day_end", request.day_end.as_str()),
            ("subjects", request.subjects.as_str()),
            ("preferences", request.preferences_or_none()),
        ])
    }

    /// Number of loaded templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no templates are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

fn load_template(path: &Path) -> Result<PromptTemplate> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| LlmError::Config(format!("failed to read {}: {e}", path.display())))?;
    let parsed: TomlPromptFile = toml::from_str(&content)
        .map_err(|e| LlmError::Config(format!("failed to parse {}: {e}", path.display())))?;

    let d = parsed.prompt;
    Ok(PromptTemplate {
        version: d.version,
        structured: d.structured,
        text: d.text,
    })
}
