//! Date parsing for stored `YYYY-MM-DD` columns

use chrono::{NaiveDate, NaiveDateTime};

/// Format used for every stored date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used for registration timestamps (`Data_Registro`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a stored date.
///
/// Bare dates are the normal case. Timestamps are accepted too (the date part
/// is kept) because some older rows were written with a time component.
/// Returns `None` for empty or unrecognized text.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Some(date);
    }

    // Try the timestamp shapes seen in older files
    for format in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.date());
        }
    }

    None
}

/// Render a date the way it is stored.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
