//! Header-indexed access to a CSV row

use std::collections::HashMap;

use csv::StringRecord;

/// Column-name to position lookup built from a file's header row.
///
/// Files are looked up by column name rather than position, so a table written
/// with an older header (missing columns, different order) still loads.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(headers: &StringRecord) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim_start_matches('\u{feff}').trim().to_string(), i))
            .collect();
        Self { positions }
    }

    pub fn from_columns(columns: &[&str]) -> Self {
        Self::new(&StringRecord::from(columns.to_vec()))
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    /// Columns from `expected` that the header doesn't have.
    #[must_use]
    pub fn missing<'c>(&self, expected: &[&'c str]) -> Vec<&'c str> {
        expected
            .iter()
            .copied()
            .filter(|column| !self.contains(column))
            .collect()
    }
}

/// One data row viewed through a [`HeaderIndex`].
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    index: &'a HeaderIndex,
    record: &'a StringRecord,
}

impl<'a> Row<'a> {
    pub fn new(index: &'a HeaderIndex, record: &'a StringRecord) -> Self {
        Self { index, record }
    }

    /// Cell text for `column`, or `""` when the column or cell is absent.
    #[must_use]
    pub fn get(&self, column: &str) -> &'a str {
        self.index
            .positions
            .get(column)
            .and_then(|&i| self.record.get(i))
            .unwrap_or("")
    }

    /// Cell text with pandas' missing-value marker folded into `""`.
    #[must_use]
    pub fn text(&self, column: &str) -> String {
        let cell = self.get(column);
        if cell.eq_ignore_ascii_case("nan") {
            String::new()
        } else {
            cell.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name_in_any_order() {
        let index = HeaderIndex::new(&StringRecord::from(vec!["\u{feff}B", "A"]));
        let record = StringRecord::from(vec!["b", "a"]);
        let row = Row::new(&index, &record);
        assert_eq!(row.get("A"), "a");
        assert_eq!(row.get("B"), "b");
    }

    #[test]
    fn test_missing_column_is_empty() {
        let index = HeaderIndex::from_columns(&["A"]);
        let record = StringRecord::from(vec!["a"]);
        let row = Row::new(&index, &record);
        assert_eq!(row.get("Z"), "");
        assert_eq!(index.missing(&["A", "Z"]), vec!["Z"]);
    }

    #[test]
    fn test_short_row_is_empty() {
        let index = HeaderIndex::from_columns(&["A", "B"]);
        let record = StringRecord::from(vec!["a"]);
        assert_eq!(Row::new(&index, &record).get("B"), "");
    }

    #[test]
    fn test_nan_folds_to_empty() {
        let index = HeaderIndex::from_columns(&["Saída"]);
        let record = StringRecord::from(vec!["NaN"]);
        assert_eq!(Row::new(&index, &record).text("Saída"), "");
    }
}
