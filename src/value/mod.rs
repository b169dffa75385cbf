//! Tolerant value parsing for operator-entered fields
//!
//! Every date and decimal that reaches a table goes through this module. Floor
//! operators type decimals with either `,` or `.` and dates arrive both as bare
//! days and as timestamps, so parsing here never fails loudly: it returns
//! `None` (or a documented default) and lets the caller decide how to show it.
//!
//! ## Contents
//!
//! - **`parse_decimal` / `tolerant_decimal_parse`** - comma-or-dot decimals
//! - **`normalize_decimal`** - canonical dot-decimal text for saving
//! - **`parse_date` / `format_date`** - `YYYY-MM-DD` with timestamp fallback
//! - **`DateText`** - a stored date column kept as text until it is needed

pub mod date;
pub mod decimal;
pub mod text;

pub use date::{format_date, parse_date, DATE_FORMAT, TIMESTAMP_FORMAT};
pub use decimal::{normalize_decimal, parse_decimal, tolerant_decimal_parse};
pub use text::DateText;
