//! Tension-leveller ledger: bending units, their positions and distance run

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::StorageConfig;
use crate::derived::round2;
use crate::error::{LedgerError, StoreError, ValidationError};
use crate::model::{LevellerRecord, Position, Record, DISTANCE_TARGET_KM};
use crate::query::{self, RecordFilter};
use crate::store::{new_id, TableStore};
use crate::value::{parse_decimal, DateText};

use super::{optional_date, ordered, required_code, required_date, Clock, Ledger, Listed};

/// Fields of the bending registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevellerDraft {
    pub code: String,
    pub entry: String,
    pub exit: Option<String>,
    /// Km at exit; `,` or `.` as decimal separator
    pub exit_distance: Option<String>,
    pub position: String,
    pub note: String,
}

/// Moving a bending unit to a new position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevellerMove {
    /// Exit date and km to stamp on the current record first
    pub close: Option<(String, Option<String>)>,
    pub entry: String,
    pub position: String,
    /// `None` carries the current note over
    pub note: Option<String>,
}

/// Correction of an existing row; code and position stay as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevellerEdit {
    pub entry: String,
    /// Blank reopens the record
    pub exit: Option<String>,
    pub exit_distance: Option<String>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevellerDashboard {
    pub records: usize,
    /// Sum of every recorded exit distance
    pub total_km: f64,
    /// Distinct positions seen in the table
    pub positions: usize,
    /// Highest exit distance per code, largest first
    pub ranking: Vec<(String, f64)>,
}

/// Life-cycle figures for one bending unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BendingSummary {
    pub code: String,
    /// Last recorded exit distance in entry order, `0.0` if none
    pub last_km: f64,
    /// Span between first and last entry, inclusive; `1` for a single row
    pub days_in_operation: i64,
    /// Mean difference between consecutive exit distances
    pub mean_km_increment: Option<f64>,
    /// `last_km` against the distance target, capped at 100
    pub life_used_pct: f64,
    /// `(entry, exit distance)` in entry order, for the evolution chart
    pub series: Vec<(DateText, Option<f64>)>,
}

#[derive(Debug, Clone)]
pub struct TensionLeveller {
    store: TableStore<LevellerRecord>,
    clock: Clock,
}

fn distance_field(
    field: &'static str,
    text: Option<&str>,
) -> Result<String, ValidationError> {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        None => Ok(String::new()),
        Some(text) => match parse_decimal(text) {
            Some(km) if km >= 0.0 => Ok(km.to_string()),
            _ => Err(ValidationError::InvalidDecimal {
                field,
                value: text.to_string(),
            }),
        },
    }
}

impl TensionLeveller {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: TableStore::new(path),
            clock: Clock::system(),
        }
    }

    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.leveller_path())
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// # Errors
    ///
    /// See [`Ledger::create`].
    pub fn register(&self, draft: LevellerDraft) -> Result<String, LedgerError> {
        let code = draft.code.clone();
        let id = self.create(draft)?;
        log::info!("Registered bending {} ({})", code.trim(), id);
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the table can't be read.
    pub fn history(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<Listed<LevellerRecord>>, LedgerError> {
        self.list(filter)
    }

    /// Distinct bending codes, sorted.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the table can't be read.
    pub fn codes(&self) -> Result<Vec<String>, LedgerError> {
        Ok(query::codes(&self.load()?))
    }

    /// Move a bending unit: optionally close its current record with an exit
    /// date and km, then append an OPEN record at the new position.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnknownCode` or a validation error; nothing is
    /// written in either case.
    pub fn relocate(&self, code: &str, change: LevellerMove) -> Result<String, LedgerError> {
        let position = Position::parse_known("position", &change.position)?;
        let entry = required_date("entry", &change.entry)?;
        let close = match &change.close {
            Some((exit, km)) => Some((
                required_date("exit", exit)?,
                distance_field("exit distance", km.as_deref())?,
            )),
            None => None,
        };

        self.store.transact(|records| {
            let (index, current) = query::current_state(records, code)
                .map(|(i, r)| (i, r.clone()))
                .ok_or_else(|| LedgerError::UnknownCode(code.to_string()))?;

            if let Some((exit, km)) = close {
                if let Some(previous_entry) = current.entry.date() {
                    ordered(previous_entry, Some(exit))?;
                }
                let previous = &mut records[index];
                previous.exit = DateText::from(exit);
                previous.exit_distance = km;
            }

            let moved = LevellerRecord {
                id: new_id(),
                code: current.code.clone(),
                entry: DateText::from(entry),
                exit: DateText::empty(),
                exit_distance: String::new(),
                position,
                note: change.note.unwrap_or(current.note),
            };
            let id = moved.id.clone();
            records.push(moved);
            Ok::<_, LedgerError>(id)
        })
    }

    /// Correct dates, km and note of the row at `position`.
    ///
    /// # Errors
    ///
    /// Returns a validation error or `RowNotFound`, before writing.
    pub fn edit(&self, position: usize, edit: LevellerEdit) -> Result<(), LedgerError> {
        let entry = required_date("entry", &edit.entry)?;
        let exit = optional_date("exit", edit.exit.as_deref())?;
        ordered(entry, exit)?;
        let km = distance_field("exit distance", edit.exit_distance.as_deref())?;

        self.store.transact(|records| {
            let len = records.len();
            let record = records
                .get_mut(position)
                .ok_or(StoreError::RowNotFound { position, len })?;
            record.entry = DateText::from(entry);
            record.exit = DateText::from(exit);
            record.exit_distance = km;
            record.note = edit.note.trim().to_string();
            Ok::<_, LedgerError>(())
        })?;
        log::info!("Edited bending row {}", position);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the table can't be read.
    pub fn dashboard(&self) -> Result<LevellerDashboard, LedgerError> {
        let records = self.load()?;
        let positions: BTreeSet<&str> = records
            .iter()
            .map(Record::category)
            .filter(|p| !p.trim().is_empty())
            .collect();

        Ok(LevellerDashboard {
            records: records.len(),
            total_km: records.iter().filter_map(LevellerRecord::distance).sum(),
            positions: positions.len(),
            ranking: query::ranking_by_max(
                &records,
                |r: &LevellerRecord| r.code.clone(),
                LevellerRecord::distance,
            ),
        })
    }

    /// # Errors
    ///
    /// Returns `LedgerError::UnknownCode` if the code has no rows.
    pub fn bending_summary(&self, code: &str) -> Result<BendingSummary, LedgerError> {
        let records = self.load()?;
        let mut rows = RecordFilter::new().code(code).apply(&records, self.clock.today());
        if rows.is_empty() {
            return Err(LedgerError::UnknownCode(code.to_string()));
        }
        rows.sort_by_key(|(i, r)| (r.entry.date(), *i));

        let distances: Vec<Option<f64>> = rows.iter().map(|(_, r)| r.distance()).collect();
        let last_km = distances.iter().rev().find_map(|d| *d).unwrap_or(0.0);

        let dates: Vec<_> = rows.iter().filter_map(|(_, r)| r.entry.date()).collect();
        let days_in_operation = match (dates.iter().min(), dates.iter().max()) {
            (Some(first), Some(last)) if rows.len() > 1 => (*last - *first).num_days() + 1,
            _ => 1,
        };

        let increments = distances.windows(2).filter_map(|pair| match pair {
            [Some(a), Some(b)] => Some(b - a),
            _ => None,
        });

        Ok(BendingSummary {
            code: rows[0].1.code.clone(),
            last_km,
            days_in_operation,
            mean_km_increment: query::mean(increments).map(round2),
            life_used_pct: round2((last_km / DISTANCE_TARGET_KM * 100.0).min(100.0)),
            series: rows
                .iter()
                .map(|(_, r)| (r.entry.clone(), r.distance()))
                .collect(),
        })
    }
}

impl Ledger for TensionLeveller {
    type Record = LevellerRecord;
    type Draft = LevellerDraft;

    fn store(&self) -> &TableStore<LevellerRecord> {
        &self.store
    }

    fn clock(&self) -> Clock {
        self.clock
    }

    fn build(&self, draft: LevellerDraft) -> Result<LevellerRecord, ValidationError> {
        let code = required_code(&draft.code)?;
        let entry = required_date("entry", &draft.entry)?;
        let exit = optional_date("exit", draft.exit.as_deref())?;
        ordered(entry, exit)?;

        Ok(LevellerRecord {
            id: String::new(),
            code,
            entry: DateText::from(entry),
            exit: DateText::from(exit),
            exit_distance: distance_field("exit distance", draft.exit_distance.as_deref())?,
            position: Position::parse_known("position", &draft.position)?,
            note: draft.note.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn ledger(dir: &TempDir) -> TensionLeveller {
        TensionLeveller::new(dir.path().join("TL.csv"))
            .with_clock(Clock::fixed(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()))
    }

    fn draft(code: &str, entry: &str, exit: Option<&str>, km: Option<&str>) -> LevellerDraft {
        LevellerDraft {
            code: code.to_string(),
            entry: entry.to_string(),
            exit: exit.map(str::to_string),
            exit_distance: km.map(str::to_string),
            position: "#1 SUP".to_string(),
            note: String::new(),
        }
    }

    #[test]
    fn test_register_computes_rate() {
        let dir = TempDir::new().unwrap();
        let tl = ledger(&dir);
        tl.register(draft("ac03", "2024-01-01", Some("2024-01-05"), Some("100,0")))
            .unwrap();

        let rows = tl.history(&RecordFilter::new()).unwrap();
        assert_eq!(rows[0].record.code, "AC03");
        assert_eq!(rows[0].record.exit_distance, "100");
        assert_eq!(rows[0].derived.days, Some(4));
        assert_eq!(rows[0].derived.rate, Some(25.0));
    }

    #[test]
    fn test_register_rejects_garbled_km() {
        let dir = TempDir::new().unwrap();
        let tl = ledger(&dir);
        let err = tl
            .register(draft("AC03", "2024-01-01", None, Some("muito")))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Validation(ValidationError::InvalidDecimal { .. })
        ));
    }

    #[test]
    fn test_relocate_closes_with_km() {
        let dir = TempDir::new().unwrap();
        let tl = ledger(&dir);
        tl.register(draft("AC03", "2024-01-01", None, None)).unwrap();

        tl.relocate(
            "AC03",
            LevellerMove {
                close: Some(("2024-01-11".to_string(), Some("500".to_string()))),
                entry: "2024-01-12".to_string(),
                position: "Anticoil".to_string(),
                note: None,
            },
        )
        .unwrap();

        let records = tl.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].exit.as_str(), "2024-01-11");
        assert_eq!(tl.compute_derived(&records[0]).rate, Some(50.0));
        assert_eq!(records[1].position, Position::Anticoil);
        assert!(records[1].is_open());
        assert!(records[1].exit_distance.is_empty());
    }

    #[test]
    fn test_edit_can_reopen() {
        let dir = TempDir::new().unwrap();
        let tl = ledger(&dir);
        tl.register(draft("AC03", "2024-01-01", Some("2024-01-05"), Some("80")))
            .unwrap();

        tl.edit(
            0,
            LevellerEdit {
                entry: "2024-01-02".to_string(),
                exit: None,
                exit_distance: None,
                note: "voltou".to_string(),
            },
        )
        .unwrap();

        let record = &tl.load().unwrap()[0];
        assert!(record.is_open());
        assert_eq!(record.entry.as_str(), "2024-01-02");
        assert_eq!(record.position, Position::FirstUpper);
        assert!(tl.edit(3, LevellerEdit::default()).is_err());
    }

    #[test]
    fn test_dashboard_ignores_blank_positions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("TL.csv");
        std::fs::write(
            &path,
            "ID,Codigo,Entrada,Saída,Km de saída,Posição\n\
             t1,AC01,2024-01-01,2024-01-10,100,#1 SUP\n\
             t2,AC02,2024-01-02,2024-01-10,200,\n",
        )
        .unwrap();

        let dashboard = TensionLeveller::new(&path).dashboard().unwrap();
        assert_eq!(dashboard.records, 2);
        assert_eq!(dashboard.positions, 1);
    }

    #[test]
    fn test_dashboard_and_summary() {
        let dir = TempDir::new().unwrap();
        let tl = ledger(&dir);
        tl.register(draft("AC03", "2024-01-01", Some("2024-01-10"), Some("300"))).unwrap();
        tl.register(draft("AC03", "2024-01-11", Some("2024-01-20"), Some("700"))).unwrap();
        tl.register(draft("AC03", "2024-01-21", None, None)).unwrap();
        let mut other = draft("AC04", "2024-01-05", Some("2024-01-06"), Some("900"));
        other.position = "Anticross".to_string();
        tl.register(other).unwrap();

        let dashboard = tl.dashboard().unwrap();
        assert_eq!(dashboard.records, 4);
        assert_eq!(dashboard.total_km, 1900.0);
        assert_eq!(dashboard.positions, 2);
        assert_eq!(
            dashboard.ranking,
            vec![("AC04".to_string(), 900.0), ("AC03".to_string(), 700.0)]
        );

        let summary = tl.bending_summary("ac03").unwrap();
        assert_eq!(summary.last_km, 700.0);
        assert_eq!(summary.days_in_operation, 21);
        assert_eq!(summary.mean_km_increment, Some(400.0));
        assert_eq!(summary.life_used_pct, 35.0);
        assert_eq!(summary.series.len(), 3);

        let single = tl.bending_summary("AC04").unwrap();
        assert_eq!(single.days_in_operation, 1);
        assert_eq!(single.mean_km_increment, None);

        assert!(matches!(
            tl.bending_summary("AC99"),
            Err(LedgerError::UnknownCode(_))
        ));
    }
}
