//! CSV-backed record storage
//!
//! One [`TableStore`] handles one table file. Every operation is a full cycle:
//! load the whole table, change a local copy, write the whole table back.
//!
//! ## Guarantees
//!
//! - A missing file is created with the fixed header on first load
//! - Writes go to a temporary file in the same directory and are renamed over
//!   the target, so a crash never leaves a half-written table
//! - Out-of-range row positions are rejected before anything is written
//!
//! ## Known limitation
//!
//! There is no locking. Two processes writing the same table at the same time
//! can lose each other's changes; the store assumes one active writer.

mod row;
mod table;

pub use row::{HeaderIndex, Row};
pub use table::{write_csv, TableStore};

/// Fresh unique record identifier (UUID v4).
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
