//! # Plantlog
//!
//! Equipment ledgers for a galvanizing line: sink rolls in the degreasing
//! section, bath equipment per campaign and tension-leveller bending units.
//!
//! Each ledger keeps one CSV table. Moving equipment appends to its history;
//! mistakes are fixed by editing or deleting a row in place. Derived figures
//! (days in service, km per day) are recomputed on every read and never
//! trusted from the file.
//!
//! ```rust,no_run
//! use plantlog::{Ledger, Plant, RecordFilter, StorageConfig};
//!
//! let config = StorageConfig::load().unwrap_or_default();
//! let plant = Plant::open(&config);
//! for row in plant.rolls.active().unwrap() {
//!     println!("{} {} {:?}", row.record.code, row.record.location, row.derived.days);
//! }
//! let _history = plant.levellers.history(&RecordFilter::new().code("AC03"));
//! ```

pub mod config;
pub mod derived;
pub mod error;
pub mod help;
pub mod ledger;
pub mod model;
pub mod overlay;
pub mod query;
pub mod store;
pub mod value;

pub use config::StorageConfig;
pub use derived::Derived;
pub use error::{LedgerError, StoreError, ValidationError};
pub use ledger::{Clock, Ledger, Listed, Plant};
pub use query::{DateWindow, RecordFilter};
pub use store::TableStore;
