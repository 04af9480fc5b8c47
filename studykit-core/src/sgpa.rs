//! Required-SGPA calculator.
//!
//! Given the grade average so far, the credits it covers, the credits of the
//! coming semester and a target cumulative average, computes the semester
//! average (SGPA) needed to reach the target:
//!
//! ```text
//! required = (target * (completed + next) - current * completed) / next
//! ```
//!
//! All averages use the 10-point scale.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Upper bound of the grading scale.
pub const GRADE_SCALE_MAX: f64 = 10.0;

/// Raw calculator inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SgpaInputs {
    /// Cumulative average so far, in `[0, 10]`.
    pub current_cgpa: f64,
    /// Credits already completed. Must be positive.
    pub completed_credits: u32,
    /// Credits of the coming semester. Must be positive.
    pub next_semester_credits: u32,
    /// Desired cumulative average after the coming semester, in `[0, 10]`.
    pub target_cgpa: f64,
}

impl SgpaInputs {
    /// Check ranges.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidInput` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        check_grade("current_cgpa", self.current_cgpa)?;
        check_grade("target_cgpa", self.target_cgpa)?;
        if self.completed_credits == 0 {
            return Err(CoreError::invalid("completed_credits", "credits must be positive"));
        }
        if self.next_semester_credits == 0 {
            return Err(CoreError::invalid(
                "next_semester_credits",
                "next semester credits cannot be zero",
            ));
        }
        Ok(())
    }
}

fn check_grade(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=GRADE_SCALE_MAX).contains(&value) {
        return Err(CoreError::invalid(
            field,
            format!("CGPA should be between 0 and {GRADE_SCALE_MAX}, got {value}"),
        ));
    }
    Ok(())
}

/// How reachable the target is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SgpaOutcome {
    /// The required SGPA lies on the grading scale.
    Achievable,
    /// The required SGPA exceeds the scale maximum.
    AboveScale,
    /// The target is met even with a zero SGPA.
    AlreadySecured,
}

impl SgpaOutcome {
    /// User-facing note for the outcome, if one is warranted.
    #[must_use]
    pub fn note(self) -> Option<&'static str> {
        match self {
            Self::Achievable => None,
            Self::AboveScale => Some(
                "Achieving this target CGPA is mathematically very challenging (Required SGPA > 10). \
                 Consider revising your target or discussing with an academic advisor.",
            ),
            Self::AlreadySecured => Some(
                "The target CGPA is lower than what can be achieved even with 0 SGPA next semester. \
                 You might have already surpassed your target or there's an input error.",
            ),
        }
    }
}

/// Result of a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SgpaReport {
    /// Inputs the report was computed from.
    pub inputs: SgpaInputs,
    /// Unrounded required semester average. May fall outside the scale.
    pub required_sgpa: f64,
    /// Classification of `required_sgpa`.
    pub outcome: SgpaOutcome,
}

impl SgpaReport {
    /// Required SGPA rounded to two decimals for display.
    #[must_use]
    pub fn display_sgpa(&self) -> String {
        format!("{:.2}", self.required_sgpa)
    }
}

/// Compute the SGPA needed next semester to reach `target_cgpa`.
///
/// # Errors
/// Returns `CoreError::InvalidInput` if the inputs are out of range.
pub fn required_sgpa(inputs: SgpaInputs) -> Result<SgpaReport> {
    inputs.validate()?;

    let completed = f64::from(inputs.completed_credits);
    let next = f64::from(inputs.next_semester_credits);

    let needed_total = inputs.target_cgpa * (completed + next);
    let earned = inputs.current_cgpa * completed;
    let required = (needed_total - earned) / next;

    let outcome = if required > GRADE_SCALE_MAX {
        SgpaOutcome::AboveScale
    } else if required < 0.0 {
        SgpaOutcome::AlreadySecured
    } else {
        SgpaOutcome::Achievable
    };

    Ok(SgpaReport {
        inputs,
        required_sgpa: required,
        outcome,
    })
}
