//! Record types, one per ledger
//!
//! Each table row decodes into a typed record exactly once, in
//! [`Record::from_row`]. Dates stay as [`DateText`] and decimals as text so a
//! malformed cell is carried through a save untouched; the parsed values are
//! computed when they're needed.
//!
//! # Example
//!
//! ```rust
//! use plantlog::model::{Location, Record, RollMovement};
//! use plantlog::value::DateText;
//!
//! let roll = RollMovement {
//!     code: "SR03".to_string(),
//!     location: Location::EmLinha,
//!     entry: DateText::new("2024-01-10"),
//!     ..RollMovement::default()
//! };
//! assert!(roll.is_open());
//! assert_eq!(roll.category(), "Em linha");
//! ```

mod label;

pub mod bath;
pub mod leveller;
pub mod roll;

use chrono::NaiveDate;

use crate::derived::Derived;
use crate::store::Row;
use crate::value::DateText;

pub use bath::{BathCampaign, Campaign, EquipmentSet};
pub use leveller::{LevellerRecord, Position, DISTANCE_TARGET_KM};
pub use roll::{Location, RollCampaign, RollMovement, Supplier};

/// A row type that can live in a [`TableStore`](crate::store::TableStore).
pub trait Record: Clone + std::fmt::Debug {
    /// Header written to new files, in column order
    const COLUMNS: &'static [&'static str];

    /// Unique identifier assigned at creation (empty until then)
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Decode a stored row. Never fails: absent or malformed cells become
    /// empty text and are dealt with at computation time.
    fn from_row(row: &Row<'_>) -> Self;

    /// Encode for storage, in [`Record::COLUMNS`] order. `today` is used by
    /// tables that also write derived columns for human readers.
    fn to_row(&self, today: NaiveDate) -> Vec<String>;

    /// Recompute derived metrics from the raw fields.
    fn derive(&self, today: NaiveDate) -> Derived;

    /// Equipment code, for tables tracked per code
    fn code(&self) -> Option<&str> {
        None
    }

    /// Label of the enumerated category used for filtering
    /// (location, position or campaign)
    fn category(&self) -> &str;

    /// Start of the record's interval (entry / campaign start)
    fn entry(&self) -> &DateText;

    /// End of the record's interval; empty while OPEN
    fn exit(&self) -> &DateText;

    /// Whether the record is OPEN (no exit date yet)
    fn is_open(&self) -> bool {
        self.exit().is_empty()
    }

    /// Every stored cell, used by free-text search
    fn cells(&self, today: NaiveDate) -> Vec<String> {
        self.to_row(today)
    }
}

/// Trimmed, uppercased equipment code as typed on the entry form.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
