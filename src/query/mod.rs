//! Read-side views over a loaded table
//!
//! Everything here is a pure function of the rows passed in; nothing touches
//! storage.
//!
//! - **`filter`** - code / category / date-window / text criteria
//! - **`current`** - current state per code, active records, history order
//! - **`aggregate`** - grouped means and rankings

pub mod aggregate;
pub mod current;
pub mod filter;

pub use aggregate::{grouped_mean, mean, ranking_by_max};
pub use current::{active, codes, current_state, latest_per_code, sort_recent_first};
pub use filter::{DateWindow, RecordFilter};
