//! `TableStore` - whole-table load and atomic rewrite of one CSV file

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::{new_id, HeaderIndex, Row};
use crate::derived;
use crate::error::StoreError;
use crate::model::Record;

/// Decode a raw row, replacing invalid UTF-8 (e.g. cp1252 notes) instead of
/// dropping the row.
fn lossy(raw: &csv::ByteRecord) -> csv::StringRecord {
    raw.iter().map(String::from_utf8_lossy).collect()
}

/// Handle on one table file holding records of type `R`.
///
/// The handle itself holds no rows; each call reads the file fresh. Cloning a
/// handle is cheap and both clones point at the same file.
#[derive(Debug)]
pub struct TableStore<R: Record> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Clone for TableStore<R> {
    fn clone(&self) -> Self {
        Self::new(self.path.clone())
    }
}

impl<R: Record> TableStore<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record in file order.
    ///
    /// A missing file is created with the header and an empty table is
    /// returned. Cells that are not valid UTF-8 are decoded lossily so the row
    /// survives the next rewrite; only rows with broken CSV framing are
    /// skipped with a warning.
    /// Rows without an identifier (or with one already used by an earlier
    /// row) get a fresh one and the repaired table is written back
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file exists but can't be opened, its header
    /// can't be read, or the empty table / repaired table can't be written.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(path = %self.path.display())))]
    pub fn load(&self) -> Result<Vec<R>, StoreError> {
        if !self.path.exists() {
            log::info!("Creating empty table {}", self.path.display());
            self.write_all(&[])?;
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| self.csv_error(e))?;

        let headers = lossy(reader.byte_headers().map_err(|e| self.csv_error(e))?);
        let index = HeaderIndex::new(&headers);

        let missing = index.missing(R::COLUMNS);
        if !missing.is_empty() && !headers.is_empty() {
            log::debug!(
                "{} has no column(s) {:?}; they load as empty",
                self.path.display(),
                missing
            );
        }

        let mut records = Vec::new();
        let mut seen = HashSet::new();
        let mut repaired = 0usize;

        for (i, result) in reader.byte_records().enumerate() {
            let raw = match result {
                Ok(raw) => lossy(&raw),
                Err(e) => {
                    // Header is line 1
                    log::warn!(
                        "Skipping unreadable row at line {} of {}: {}",
                        i + 2,
                        self.path.display(),
                        e
                    );
                    continue;
                }
            };

            let mut record = R::from_row(&Row::new(&index, &raw));
            if record.id().is_empty() || seen.contains(record.id()) {
                record.set_id(new_id());
                repaired += 1;
            }
            seen.insert(record.id().to_string());
            records.push(record);
        }

        if repaired > 0 {
            log::warn!(
                "Assigned {} missing or duplicate identifier(s) in {}",
                repaired,
                self.path.display()
            );
            self.write_all(&records)?;
        }

        log::debug!("Loaded {} row(s) from {}", records.len(), self.path.display());
        Ok(records)
    }

    /// Append `record` with a freshly assigned identifier and return it.
    ///
    /// Whatever identifier the caller set is replaced.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the table can't be loaded or written.
    pub fn append(&self, mut record: R) -> Result<String, StoreError> {
        let mut records = self.load()?;
        let id = new_id();
        record.set_id(id.clone());
        records.push(record);
        self.write_all(&records)?;
        log::info!("Appended {} to {}", id, self.path.display());
        Ok(id)
    }

    /// Replace the whole table with `records`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the table can't be written.
    pub fn overwrite(&self, records: &[R]) -> Result<(), StoreError> {
        self.write_all(records)
    }

    /// Replace the record at `position` in place, keeping its identifier.
    /// Returns the record that was replaced.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RowNotFound` (before writing anything) if
    /// `position` is out of range, or an I/O error.
    pub fn update(&self, position: usize, mut record: R) -> Result<R, StoreError> {
        self.transact(|records| {
            let slot = slot_mut(records, position)?;
            record.set_id(slot.id().to_string());
            Ok(std::mem::replace(slot, record))
        })
    }

    /// Remove and return the record at `position`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RowNotFound` (before writing anything) if
    /// `position` is out of range, or an I/O error.
    pub fn delete(&self, position: usize) -> Result<R, StoreError> {
        let removed = self.transact(|records| {
            slot_mut(records, position)?;
            Ok::<_, StoreError>(records.remove(position))
        })?;
        log::info!("Deleted {} from {}", removed.id(), self.path.display());
        Ok(removed)
    }

    /// Position of the record with identifier `id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the table can't be loaded.
    pub fn position_of(&self, id: &str) -> Result<Option<usize>, StoreError> {
        Ok(self.load()?.iter().position(|r| r.id() == id))
    }

    /// Load, let `change` edit the rows, then write them back.
    ///
    /// If `change` returns an error nothing is written, so a rejected
    /// operation never leaves a partial update behind.
    ///
    /// # Errors
    ///
    /// Returns whatever `change` returns, or a `StoreError` from loading or
    /// writing.
    pub fn transact<T, E>(
        &self,
        change: impl FnOnce(&mut Vec<R>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut records = self.load()?;
        let out = change(&mut records)?;
        self.write_all(&records)?;
        Ok(out)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(path = %self.path.display(), rows = records.len())))]
    fn write_all(&self, records: &[R]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;

        let staged = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        write_csv(records, staged.as_file(), derived::today()).map_err(|e| self.csv_error(e))?;
        staged.as_file().sync_all().map_err(|e| self.io_error(e))?;
        staged
            .persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;

        log::debug!("Wrote {} row(s) to {}", records.len(), self.path.display());
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

fn slot_mut<R>(records: &mut [R], position: usize) -> Result<&mut R, StoreError> {
    let len = records.len();
    records
        .get_mut(position)
        .ok_or(StoreError::RowNotFound { position, len })
}

/// Write `records` as CSV (header first) to `writer`.
///
/// This is the exact on-disk layout, also used for exports.
///
/// # Errors
///
/// Returns `csv::Error` if writing fails.
pub fn write_csv<R: Record, W: Write>(
    records: &[R],
    writer: W,
    today: NaiveDate,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(R::COLUMNS)?;
    for record in records {
        writer.write_record(record.to_row(today))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Location, RollMovement};
    use crate::value::DateText;
    use tempfile::TempDir;

    fn roll(code: &str, entry: &str) -> RollMovement {
        RollMovement {
            code: code.to_string(),
            location: Location::EmLinha,
            entry: DateText::new(entry),
            ..RollMovement::default()
        }
    }

    #[test]
    fn test_missing_file_is_created_with_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("rolls.csv");
        let store: TableStore<RollMovement> = TableStore::new(&path);

        assert!(store.load().unwrap().is_empty());
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("ID,Codigo,Localização"));
    }

    #[test]
    fn test_append_assigns_fresh_id() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path().join("rolls.csv"));

        let mut record = roll("SR03", "2024-01-01");
        record.id = "caller-chosen".to_string();
        let id = store.append(record).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, id);
        assert_ne!(id, "caller-chosen");
    }

    #[test]
    fn test_update_out_of_range_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path().join("rolls.csv"));
        store.append(roll("SR03", "2024-01-01")).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let err = store.update(5, roll("SR09", "2024-01-02")).unwrap_err();
        assert!(matches!(err, StoreError::RowNotFound { position: 5, len: 1 }));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_update_keeps_identifier() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path().join("rolls.csv"));
        let id = store.append(roll("SR03", "2024-01-01")).unwrap();

        let previous = store.update(0, roll("SR03", "2024-01-02")).unwrap();
        assert_eq!(previous.entry.as_str(), "2024-01-01");

        let loaded = store.load().unwrap();
        assert_eq!(loaded[0].id, id);
        assert_eq!(loaded[0].entry.as_str(), "2024-01-02");
    }

    #[test]
    fn test_missing_and_duplicate_ids_are_repaired() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rolls.csv");
        fs::write(
            &path,
            "ID,Codigo,Localização,Entrada\n,SR01,Baia,2024-01-01\ndup,SR02,Baia,2024-01-02\ndup,SR03,Baia,2024-01-03\n",
        )
        .unwrap();
        let store: TableStore<RollMovement> = TableStore::new(&path);

        let loaded = store.load().unwrap();
        let ids: HashSet<_> = loaded.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids.len(), 3);
        assert!(!ids.contains(""));
        assert_eq!(loaded[1].id, "dup");

        // Repair was persisted: a second load sees the same identifiers
        let again = store.load().unwrap();
        assert_eq!(
            again.iter().map(|r| &r.id).collect::<Vec<_>>(),
            loaded.iter().map(|r| &r.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_overwrite_replaces_table() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path().join("rolls.csv"));
        store.append(roll("SR01", "2024-01-01")).unwrap();
        let mut kept = roll("SR02", "2024-01-02");
        kept.id = "kept".to_string();

        store.overwrite(&[kept]).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "kept");
        assert_eq!(loaded[0].code, "SR02");
    }

    #[test]
    fn test_transact_error_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path().join("rolls.csv"));
        store.append(roll("SR03", "2024-01-01")).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let result: Result<(), StoreError> = store.transact(|records| {
            records.clear();
            Err(StoreError::RowNotFound { position: 0, len: 0 })
        });
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_write_csv_matches_columns() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut out = Vec::new();
        write_csv(&[roll("SR03", "2024-01-01")], &mut out, today).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1].split(',').count(),
            RollMovement::COLUMNS.len()
        );
    }
}
