pub mod event;
pub mod filter;

pub use event::{Event, normalize_type};
pub use filter::{
    FilterState, SortOrder, filter_events, group_by_date, sort_by_date, unique_subjects, upcoming,
};
