pub mod convert;
pub mod csv;
pub mod fallback;
pub mod sheet;

pub use sheet::{EventSource, FetchError, LoadOutcome, SheetClient};
