//! Current-state resolution per equipment code
//!
//! The current state of a code is its record with the latest entry date.
//! When several records share that date, the one stored later in the table
//! wins. Records whose entry can't be parsed rank below every dated record.

use std::collections::BTreeMap;

use crate::model::{normalize_code, Record};

fn recency<R: Record>(position: usize, record: &R) -> (Option<chrono::NaiveDate>, usize) {
    (record.entry().date(), position)
}

/// Current-state record of `code`, with its table position.
#[must_use]
pub fn current_state<'a, R: Record>(records: &'a [R], code: &str) -> Option<(usize, &'a R)> {
    let wanted = normalize_code(code);
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.code().map(normalize_code).as_deref() == Some(wanted.as_str()))
        .max_by_key(|(i, r)| recency(*i, *r))
}

/// Current-state record of every code, sorted by code.
///
/// Records without a code (tables not tracked per code, or blank cells) are
/// left out.
#[must_use]
pub fn latest_per_code<R: Record>(records: &[R]) -> Vec<(usize, &R)> {
    let mut latest: BTreeMap<String, (usize, &R)> = BTreeMap::new();

    for (i, record) in records.iter().enumerate() {
        let Some(code) = record.code().map(normalize_code).filter(|c| !c.is_empty()) else {
            continue;
        };
        let newer = latest
            .get(&code)
            .map_or(true, |(j, held)| recency(i, record) > recency(*j, *held));
        if newer {
            latest.insert(code, (i, record));
        }
    }

    latest.into_values().collect()
}

/// Codes whose current-state record is still OPEN, sorted by code.
#[must_use]
pub fn active<R: Record>(records: &[R]) -> Vec<(usize, &R)> {
    latest_per_code(records)
        .into_iter()
        .filter(|(_, r)| r.is_open())
        .collect()
}

/// Distinct codes, normalized and sorted.
#[must_use]
pub fn codes<R: Record>(records: &[R]) -> Vec<String> {
    let mut codes: Vec<String> = records
        .iter()
        .filter_map(|r| r.code().map(normalize_code))
        .filter(|c| !c.is_empty())
        .collect();
    codes.sort();
    codes.dedup();
    codes
}

/// Sort rows most recent entry first; later table rows first on ties.
pub fn sort_recent_first<R: Record>(rows: &mut [(usize, &R)]) {
    rows.sort_by(|(i, a), (j, b)| recency(*j, *b).cmp(&recency(*i, *a)));
}
