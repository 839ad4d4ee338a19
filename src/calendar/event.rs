use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// A single academic deadline or activity: an exam, a practical
/// assignment, a homework task.
///
/// Events are value records. A collection is replaced wholesale on every
/// fetch cycle and never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub date: NaiveDate,
    pub title: String,
    pub event_type: String,
    pub subject: String,
    pub description: String,
}

impl Event {
    pub fn new(
        date: NaiveDate,
        title: impl Into<String>,
        event_type: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            title: title.into(),
            event_type: event_type.into(),
            subject: subject.into(),
            description: description.into(),
        }
    }

    /// Canonical form of this event's type tag.
    ///
    /// Live sheet data is already normalized at conversion time, but the
    /// bundled fallback dataset keeps its accented spellings
    /// (`"evaluación"`), so comparisons must normalize both sides.
    pub fn normalized_type(&self) -> String {
        normalize_type(&self.event_type)
    }
}

/// Lowercases, decomposes (NFD) and strips combining diacritics, so
/// `"Evaluación"` and `"evaluacion"` compare equal.
pub fn normalize_type(raw: &str) -> String {
    raw.to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accented_and_plain_spellings_normalize_alike() {
        assert_eq!(normalize_type("Evaluación"), "evaluacion");
        assert_eq!(normalize_type("evaluacion"), "evaluacion");
    }

    #[test]
    fn normalization_trims_and_lowercases() {
        assert_eq!(normalize_type("  TP "), "tp");
        assert_eq!(normalize_type("Tarea"), "tarea");
    }

    #[test]
    fn unrecognized_types_pass_through_normalized() {
        assert_eq!(normalize_type("Exposición Oral"), "exposicion oral");
    }

    #[test]
    fn normalized_type_reads_through_the_event() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let event = Event::new(date, "Parcial", "Evaluación", "Física II", "");

        assert_eq!(event.normalized_type(), "evaluacion");
    }
}
