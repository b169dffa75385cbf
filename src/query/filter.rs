//! Row filters: code, category, date window, free text

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{normalize_code, Record};
use crate::value::DateText;

/// Inclusive date window. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateWindow {
    #[must_use]
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Whether the interval `[entry, exit]` intersects this window.
    ///
    /// An empty exit means the record is still open and extends to infinity.
    /// An exit that can't be parsed is treated the same way, since it gives no
    /// usable bound. An unparsable entry never matches: the record can't be
    /// placed in time.
    #[must_use]
    pub fn overlaps(&self, entry: &DateText, exit: &DateText) -> bool {
        let Some(entry) = entry.date() else {
            return false;
        };
        let exit = exit.date();

        let starts_in_time = self.to.map_or(true, |to| entry <= to);
        let still_running = match (self.from, exit) {
            (Some(from), Some(exit)) => exit >= from,
            _ => true,
        };
        starts_in_time && still_running
    }
}

/// Criteria for listing rows. Every unset criterion matches everything.
///
/// # Example
///
/// ```rust
/// use plantlog::query::RecordFilter;
///
/// let filter = RecordFilter::new().code("sr03").category("Em linha");
/// assert!(!filter.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Equipment code, compared trimmed and case-insensitively
    pub code: Option<String>,
    /// Accepted category labels; empty accepts all
    pub categories: Vec<String>,
    pub window: Option<DateWindow>,
    /// Case-insensitive substring searched in every cell
    pub search: Option<String>,
    /// Only records without an exit date
    pub open_only: bool,
}

impl RecordFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn category(mut self, label: impl Into<String>) -> Self {
        self.categories.push(label.into());
        self
    }

    #[must_use]
    pub fn window(mut self, window: DateWindow) -> Self {
        self.window = Some(window);
        self
    }

    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    #[must_use]
    pub fn open_only(mut self) -> Self {
        self.open_only = true;
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `record` passes every criterion.
    #[must_use]
    pub fn matches<R: Record>(&self, record: &R, today: NaiveDate) -> bool {
        if let Some(code) = &self.code {
            let wanted = normalize_code(code);
            if record.code().map(normalize_code).as_deref() != Some(wanted.as_str()) {
                return false;
            }
        }

        if !self.categories.is_empty() {
            let category = record.category().trim();
            if !self.categories.iter().any(|label| label.trim() == category)
            {
                return false;
            }
        }

        if let Some(window) = &self.window {
            if !window.overlaps(record.entry(), record.exit()) {
                return false;
            }
        }

        if self.open_only && !record.is_open() {
            return false;
        }

        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            if !record
                .cells(today)
                .iter()
                .any(|cell| cell.to_lowercase().contains(&term))
            {
                return false;
            }
        }

        true
    }

    /// Matching rows with their table positions, in table order.
    #[must_use]
    pub fn apply<'a, R: Record>(&self, records: &'a [R], today: NaiveDate) -> Vec<(usize, &'a R)> {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.matches(*record, today))
            .collect()
    }
}
