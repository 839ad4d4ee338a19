use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::calendar::{
    Event, FilterState, SortOrder, filter_events, group_by_date, sort_by_date, unique_subjects,
    upcoming,
};
use crate::source::LoadOutcome;

/// Explicit view state for the display layer.
///
/// The event collection, fallback flag and error banner come from the
/// last applied [`LoadOutcome`]; month and filter selections come from
/// the addressable view-state parameters. All derivations are pure
/// functions over this snapshot.
pub struct AppState {
    pub events: Vec<Event>,
    pub using_fallback: bool,
    pub error: Option<String>,
    pub month: NaiveDate,
    pub filter: FilterState,
    fetch_generation: u64,
}

impl AppState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            events: Vec::new(),
            using_fallback: false,
            error: None,
            month: first_of_month(today),
            filter: FilterState::default(),
            fetch_generation: 0,
        }
    }

    /// Parses a `YYYY-MM` month selector. Returns false (leaving the
    /// current month alone) when the value does not name a real month.
    pub fn set_month_param(&mut self, raw: &str) -> bool {
        match NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d") {
            Ok(month) => {
                self.month = month;
                true
            }
            Err(_) => false,
        }
    }

    pub fn set_filter_params(&mut self, event_type: Option<&str>, subject: Option<&str>) {
        self.filter = FilterState::from_params(event_type, subject);
    }

    pub fn clear_filters(&mut self) {
        self.filter = FilterState::default();
    }

    pub fn next_month(&mut self) {
        self.month = shift_month(self.month, 1);
    }

    pub fn previous_month(&mut self) {
        self.month = shift_month(self.month, -1);
    }

    /// Starts a refetch cycle and returns its generation token.
    ///
    /// Overlapping refetches are not cancelled; instead the newest token
    /// wins and stale completions are ignored by [`Self::apply_outcome`].
    pub fn begin_refresh(&mut self) -> u64 {
        self.fetch_generation += 1;
        self.fetch_generation
    }

    /// Replaces the displayed collection wholesale, unless a newer
    /// refetch has started since `generation` was handed out.
    pub fn apply_outcome(&mut self, generation: u64, outcome: LoadOutcome) -> bool {
        if generation != self.fetch_generation {
            tracing::info!(
                "Ignoring stale fetch completion (generation {} < {})",
                generation,
                self.fetch_generation
            );
            return false;
        }

        self.using_fallback = outcome.using_fallback();
        self.error = outcome.error_message().map(str::to_string);
        self.events = outcome.into_events();
        true
    }

    /// Current collection narrowed by the active filters, source order
    /// preserved.
    pub fn visible_events(&self) -> Vec<Event> {
        filter_events(&self.events, &self.filter)
    }

    /// Visible events of the selected month, grouped per day for the
    /// month grid.
    pub fn month_events(&self) -> BTreeMap<NaiveDate, Vec<Event>> {
        let in_month: Vec<Event> = self
            .visible_events()
            .into_iter()
            .filter(|event| {
                event.date.year() == self.month.year() && event.date.month() == self.month.month()
            })
            .collect();
        group_by_date(&in_month)
    }

    /// Visible events dated `today` or later, sorted for the list view.
    pub fn upcoming_events(&self, today: NaiveDate, order: SortOrder) -> Vec<Event> {
        sort_by_date(&upcoming(&self.visible_events(), today), order)
    }

    /// Subjects offered by the filter dropdown, from the unfiltered
    /// collection.
    pub fn subjects(&self) -> Vec<String> {
        unique_subjects(&self.events)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

fn shift_month(month: NaiveDate, delta: i32) -> NaiveDate {
    let total = month.year() * 12 + month.month() as i32 - 1 + delta;
    let year = total.div_euclid(12);
    let new_month = total.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, new_month, 1).unwrap_or(month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn state_with_events(events: Vec<Event>) -> AppState {
        let mut state = AppState::new(date(2025, 1, 10));
        let generation = state.begin_refresh();
        state.apply_outcome(generation, LoadOutcome::Loaded(events));
        state
    }

    fn sample_events() -> Vec<Event> {
        vec![
            Event::new(date(2025, 1, 15), "Parcial", "evaluacion", "Matemática I", ""),
            Event::new(date(2025, 1, 20), "TP 1", "tp", "Algoritmos", ""),
            Event::new(date(2025, 2, 3), "TP 2", "tp", "Base de Datos", ""),
        ]
    }

    #[test]
    fn month_param_selects_a_month_and_rejects_garbage() {
        let mut state = AppState::new(date(2025, 1, 10));

        assert!(state.set_month_param("2025-02"));
        assert_eq!(state.month, date(2025, 2, 1));

        assert!(!state.set_month_param("2025-13"));
        assert!(!state.set_month_param("febrero"));
        assert_eq!(state.month, date(2025, 2, 1));
    }

    #[test]
    fn month_navigation_wraps_across_years() {
        let mut state = AppState::new(date(2025, 12, 25));
        state.next_month();
        assert_eq!(state.month, date(2026, 1, 1));

        state.previous_month();
        state.previous_month();
        assert_eq!(state.month, date(2025, 11, 1));
    }

    #[test]
    fn month_events_restrict_to_the_selected_month() {
        let mut state = state_with_events(sample_events());
        state.set_month_param("2025-01");

        let grouped = state.month_events();

        assert_eq!(grouped.len(), 2);
        assert!(grouped.contains_key(&date(2025, 1, 15)));
        assert!(!grouped.contains_key(&date(2025, 2, 3)));
    }

    #[test]
    fn filters_narrow_the_visible_collection() {
        let mut state = state_with_events(sample_events());
        state.set_filter_params(Some("tp"), None);

        assert_eq!(state.visible_events().len(), 2);

        state.clear_filters();
        assert_eq!(state.visible_events().len(), 3);
    }

    #[test]
    fn subjects_come_from_the_unfiltered_collection() {
        let mut state = state_with_events(sample_events());
        state.set_filter_params(Some("tp"), None);

        assert_eq!(
            state.subjects(),
            vec!["Algoritmos", "Base de Datos", "Matemática I"]
        );
    }

    #[test]
    fn upcoming_events_filter_and_sort() {
        let state = state_with_events(sample_events());

        let events = state.upcoming_events(date(2025, 1, 16), SortOrder::Ascending);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "TP 1");

        let events = state.upcoming_events(date(2025, 1, 16), SortOrder::Descending);
        assert_eq!(events[0].title, "TP 2");
    }

    #[test]
    fn stale_fetch_completions_are_ignored() {
        let mut state = AppState::new(date(2025, 1, 10));

        let old_generation = state.begin_refresh();
        let new_generation = state.begin_refresh();

        assert!(state.apply_outcome(new_generation, LoadOutcome::Loaded(sample_events())));
        assert!(!state.apply_outcome(
            old_generation,
            LoadOutcome::Fallback {
                events: Vec::new(),
                reason: "stale".to_string(),
            }
        ));

        // The newer result stayed in place.
        assert_eq!(state.events.len(), 3);
        assert!(!state.using_fallback);
        assert_eq!(state.error, None);
    }

    #[test]
    fn applying_a_fallback_outcome_sets_flag_and_banner() {
        let mut state = AppState::new(date(2025, 1, 10));
        let generation = state.begin_refresh();

        state.apply_outcome(
            generation,
            LoadOutcome::Fallback {
                events: sample_events(),
                reason: "sheet offline".to_string(),
            },
        );

        assert!(state.using_fallback);
        assert_eq!(state.error.as_deref(), Some("sheet offline"));
        assert_eq!(state.events.len(), 3);
    }
}
