pub mod app;
pub mod calendar;
pub mod source;
pub mod storage;

pub use app::AppState;
pub use calendar::{Event, FilterState, SortOrder};
pub use source::{EventSource, LoadOutcome, SheetClient};
