//! Weekly timetables.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{CoreError, Result};

/// One slot in a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    /// Free-form time range, e.g. "09:00 - 10:00".
    pub time: String,
    /// What happens in the slot.
    pub activity: String,
}

impl ScheduleItem {
    /// Create a slot.
    #[must_use]
    pub fn new(time: impl Into<String>, activity: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            activity: activity.into(),
        }
    }
}

/// Ordered slots for one day. May be empty.
pub type DaySchedule = Vec<ScheduleItem>;

/// Day label → schedule, in the order the days were produced.
///
/// Day labels are unconstrained strings; at least one day is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    days: Vec<(String, DaySchedule)>,
}

impl Timetable {
    /// Build a timetable from ordered `(day, schedule)` pairs.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidInput` if `days` is empty.
    pub fn new(days: Vec<(String, DaySchedule)>) -> Result<Self> {
        if days.is_empty() {
            return Err(CoreError::invalid("days", "a timetable needs at least one day"));
        }
        Ok(Self { days })
    }

    /// Schedule for `day`, if present.
    #[must_use]
    pub fn day(&self, day: &str) -> Option<&DaySchedule> {
        self.days.iter().find(|(d, _)| d == day).map(|(_, s)| s)
    }

    /// Day labels in order.
    pub fn day_labels(&self) -> impl Iterator<Item = &str> {
        self.days.iter().map(|(d, _)| d.as_str())
    }

    /// `(day, schedule)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DaySchedule)> {
        self.days.iter().map(|(d, s)| (d.as_str(), s))
    }

    /// Number of days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Total number of slots across all days.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.days.iter().map(|(_, s)| s.len()).sum()
    }
}

impl Serialize for Timetable {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (day, schedule) in &self.days {
            map.serialize_entry(day, schedule)?;
        }
        map.end()
    }
}

/// What the student asks a timetable for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableRequest {
    /// Comma-separated subjects to allocate time to.
    pub subjects: String,
    /// Start of the college day, e.g. "09:00".
    pub day_start: String,
    /// End of the college day, e.g. "17:00".
    pub day_end: String,
    /// Free-text preferences; empty means none.
    #[serde(default)]
    pub preferences: String,
}

impl TimetableRequest {
    /// Create a request with the default 09:00–17:00 day and no preferences.
    #[must_use]
    pub fn new(subjects: impl Into<String>) -> Self {
        Self {
            subjects: subjects.into(),
            day_start: "09:00".to_string(),
            day_end: "17:00".to_string(),
            preferences: String::new(),
        }
    }

    /// Set the college day bounds.
    #[must_use]
    pub fn with_hours(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.day_start = start.into();
        self.day_end = end.into();
        self
    }

    /// Set scheduling preferences.
    #[must_use]
    pub fn with_preferences(mut self, preferences: impl Into<String>) -> Self {
        self.preferences = preferences.into();
        self
    }

    /// Check the request is complete enough to build a prompt from.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidInput` for missing subjects or hours.
    pub fn validate(&self) -> Result<()> {
        if self.subjects.trim().is_empty() {
            return Err(CoreError::invalid("subjects", "please enter at least one subject"));
        }
        if self.day_start.trim().is_empty() || self.day_end.trim().is_empty() {
            return Err(CoreError::invalid(
                "hours",
                "please set valid start and end times for college",
            ));
        }
        Ok(())
    }

    /// Preferences, or "None" when blank.
    #[must_use]
    pub fn preferences_or_none(&self) -> &str {
        if self.preferences.trim().is_empty() {
            "None"
        } else {
            &self.preferences
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Timetable {
        Timetable::new(vec![
            ("Monday".into(), vec![ScheduleItem::new("09:00-10:00", "Maths")]),
            ("Tuesday".into(), Vec::new()),
        ])
        .expect("non-empty")
    }

    #[test]
    fn empty_timetable_rejected() {
        assert!(Timetable::new(Vec::new()).is_err());
    }

    #[test]
    fn lookup_and_counts() {
        let tt = sample();
        assert_eq!(tt.len(), 2);
        assert_eq!(tt.slot_count(), 1);
        assert_eq!(tt.day("Tuesday").map(Vec::len), Some(0));
        assert!(tt.day("Sunday").is_none());
    }

    #[test]
    fn serializes_as_ordered_map() {
        let json = serde_json::to_string(&sample()).expect("serialize");
        assert_eq!(
            json,
            r#"{"Monday":[{"time":"09:00-10:00","activity":"Maths"}],"Tuesday":[]}"#
        );
    }

    #[test]
    fn request_requires_subjects() {
        let err = TimetableRequest::new("   ").validate().expect_err("blank");
        assert!(matches!(err, CoreError::InvalidInput { field: "subjects", .. }));
    }

    #[test]
    fn request_requires_hours() {
        let req = TimetableRequest::new("Physics").with_hours("", "17:00");
        assert!(req.validate().is_err());
    }

    #[test]
    fn blank_preferences_render_as_none() {
        let req = TimetableRequest::new("Physics");
        assert_eq!(req.preferences_or_none(), "None");
        let req = req.with_preferences("lunch at 13:00");
        assert_eq!(req.preferences_or_none(), "lunch at 13:00");
    }
}
