//! Grouped aggregates over loaded rows

use std::collections::BTreeMap;

/// Arithmetic mean, `None` for no values.
#[must_use]
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Mean of `value` grouped by `key`.
///
/// Rows whose value is `None` are skipped; a group with no values at all is
/// left out of the result.
pub fn grouped_mean<'a, R: 'a>(
    records: impl IntoIterator<Item = &'a R>,
    key: impl Fn(&R) -> String,
    value: impl Fn(&R) -> Option<f64>,
) -> BTreeMap<String, f64> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in records {
        if let Some(v) = value(record) {
            groups.entry(key(record)).or_default().push(v);
        }
    }
    groups
        .into_iter()
        .filter_map(|(k, values)| mean(values).map(|m| (k, m)))
        .collect()
}

/// Largest `value` per `key`, sorted descending by value (ties by key).
pub fn ranking_by_max<'a, R: 'a>(
    records: impl IntoIterator<Item = &'a R>,
    key: impl Fn(&R) -> String,
    value: impl Fn(&R) -> Option<f64>,
) -> Vec<(String, f64)> {
    let mut best: BTreeMap<String, f64> = BTreeMap::new();
    for record in records {
        if let Some(v) = value(record) {
            best.entry(key(record))
                .and_modify(|held| *held = held.max(v))
                .or_insert(v);
        }
    }
    let mut ranking: Vec<(String, f64)> = best.into_iter().collect();
    ranking.sort_by(|(ka, a), (kb, b)| b.total_cmp(a).then_with(|| ka.cmp(kb)));
    ranking
}
