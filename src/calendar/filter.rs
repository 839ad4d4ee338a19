use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::calendar::event::{Event, normalize_type};

/// Optional filter selections owned by the display layer.
///
/// `None` means unconstrained. Built from the addressable query-style
/// parameters via [`FilterState::from_params`], where empty strings
/// collapse to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub event_type: Option<String>,
    pub subject: Option<String>,
}

impl FilterState {
    pub fn from_params(event_type: Option<&str>, subject: Option<&str>) -> Self {
        fn non_empty(value: Option<&str>) -> Option<String> {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        Self {
            event_type: non_empty(event_type),
            subject: non_empty(subject),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.event_type.is_none() && self.subject.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Keeps events matching both selections, preserving source order.
///
/// Type matching normalizes both sides, so a `"tp"` filter matches events
/// stored with any accent or case variation. Subject matching is an exact,
/// case-sensitive string comparison.
pub fn filter_events(events: &[Event], filter: &FilterState) -> Vec<Event> {
    let wanted_type = filter.event_type.as_deref().map(normalize_type);

    events
        .iter()
        .filter(|event| {
            let type_matches = wanted_type
                .as_deref()
                .is_none_or(|wanted| event.normalized_type() == wanted);
            let subject_matches = filter
                .subject
                .as_deref()
                .is_none_or(|wanted| event.subject == wanted);
            type_matches && subject_matches
        })
        .cloned()
        .collect()
}

/// Groups events by calendar date, preserving source order inside each
/// group.
pub fn group_by_date(events: &[Event]) -> BTreeMap<NaiveDate, Vec<Event>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<Event>> = BTreeMap::new();
    for event in events {
        grouped.entry(event.date).or_default().push(event.clone());
    }
    grouped
}

/// Distinct subject values, lexicographically sorted. An empty subject
/// sorts first when present.
pub fn unique_subjects(events: &[Event]) -> Vec<String> {
    let mut subjects: Vec<String> = events.iter().map(|e| e.subject.clone()).collect();
    subjects.sort();
    subjects.dedup();
    subjects
}

/// Events dated today or later, at day granularity.
pub fn upcoming(events: &[Event], today: NaiveDate) -> Vec<Event> {
    events
        .iter()
        .filter(|event| event.date >= today)
        .cloned()
        .collect()
}

/// Stable sort by date; ties keep their source order.
pub fn sort_by_date(events: &[Event], order: SortOrder) -> Vec<Event> {
    let mut sorted = events.to_vec();
    match order {
        SortOrder::Ascending => sorted.sort_by_key(|event| event.date),
        SortOrder::Descending => sorted.sort_by_key(|event| std::cmp::Reverse(event.date)),
    }
    sorted
}
