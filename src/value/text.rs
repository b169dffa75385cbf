//! `DateText` - a date column kept as the text that was stored

use chrono::NaiveDate;
use serde::Serialize;

use super::date::{format_date, parse_date};

/// A stored date column.
///
/// Tables keep dates as text so a garbled cell survives a load/save cycle
/// untouched. The parsed value is computed on demand with [`DateText::date`].
/// An empty `DateText` is how an absent date (an OPEN record's exit) is
/// represented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DateText(String);

impl DateText {
    /// Wrap raw stored text. Surrounding whitespace is trimmed.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into().trim().to_string())
    }

    /// The absent date.
    #[must_use]
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Whether the column holds no text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parsed date, or `None` when empty or unparsable.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        parse_date(&self.0)
    }

    /// `None` when empty, otherwise the raw text (parsable or not).
    #[must_use]
    pub fn as_option(&self) -> Option<&str> {
        if self.0.is_empty() {
            None
        } else {
            Some(&self.0)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NaiveDate> for DateText {
    fn from(date: NaiveDate) -> Self {
        Self(format_date(date))
    }
}

impl From<Option<NaiveDate>> for DateText {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map(Self::from).unwrap_or_default()
    }
}

impl std::fmt::Display for DateText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
