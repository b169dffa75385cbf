//! Sink-roll register: where every roll is and where it has been

use std::path::PathBuf;

use crate::config::StorageConfig;
use crate::error::{LedgerError, StoreError, ValidationError};
use crate::model::{Location, RollCampaign, RollMovement, Supplier};
use crate::overlay::{Overlay, OverlayEntry, PlotMarker};
use crate::query::{self, RecordFilter};
use crate::store::{new_id, TableStore};
use crate::value::{format_date, DateText};

use super::{optional_date, ordered, required_code, required_date, Clock, Ledger, Listed};

/// Fields of the roll entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollDraft {
    pub code: String,
    pub location: String,
    pub reason: String,
    pub planned_service: String,
    pub entry: String,
    /// Blank or `None` keeps the stay OPEN
    pub exit: Option<String>,
    pub note: String,
}

/// Moving a roll to a new location.
///
/// Text fields left as `None` carry over from the roll's current record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relocation {
    pub location: String,
    pub entry: String,
    pub reason: Option<String>,
    pub planned_service: Option<String>,
    pub note: Option<String>,
    pub campaign: Option<String>,
    pub supplier: Option<String>,
    /// Exit date to stamp on the current record before moving
    pub close_previous: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RollRegister {
    store: TableStore<RollMovement>,
    clock: Clock,
    overlay: Overlay,
}

impl RollRegister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: TableStore::new(path),
            clock: Clock::system(),
            overlay: Overlay::default(),
        }
    }

    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            overlay: Overlay::new(config.overlay_stride),
            ..Self::new(config.roll_path())
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Register a roll at a location.
    ///
    /// # Errors
    ///
    /// See [`Ledger::create`].
    pub fn register(&self, draft: RollDraft) -> Result<String, LedgerError> {
        let id = self.create(draft)?;
        log::info!("Registered roll movement {}", id);
        Ok(id)
    }

    /// Movements matching `filter`, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the table can't be read.
    pub fn history(&self, filter: &RecordFilter) -> Result<Vec<Listed<RollMovement>>, LedgerError> {
        self.list(filter)
    }

    /// Current record of every roll, sorted by code.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the table can't be read.
    pub fn current_status(&self) -> Result<Vec<Listed<RollMovement>>, LedgerError> {
        let records = self.load()?;
        Ok(self.listed(query::latest_per_code(&records)))
    }

    /// Rolls whose current record is still OPEN, sorted by code.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the table can't be read.
    pub fn active(&self) -> Result<Vec<Listed<RollMovement>>, LedgerError> {
        let records = self.load()?;
        Ok(self.listed(query::active(&records)))
    }

    /// Current record of one roll, if it has any.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the table can't be read.
    pub fn last_movement(&self, code: &str) -> Result<Option<Listed<RollMovement>>, LedgerError> {
        let records = self.load()?;
        Ok(query::current_state(&records, code)
            .map(|row| self.listed(vec![row]))
            .and_then(|mut rows| rows.pop()))
    }

    /// Distinct roll codes, sorted.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the table can't be read.
    pub fn codes(&self) -> Result<Vec<String>, LedgerError> {
        Ok(query::codes(&self.load()?))
    }

    /// Move a roll: optionally close its current record, then append a new
    /// OPEN record at the new location. Returns the new record's id.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnknownCode` if the roll has no record, or a
    /// validation error. Nothing is written in either case.
    pub fn relocate(&self, code: &str, relocation: Relocation) -> Result<String, LedgerError> {
        let location = Location::parse_known("location", &relocation.location)?;
        let entry = required_date("entry", &relocation.entry)?;
        let campaign = relocation
            .campaign
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(|c| RollCampaign::parse_known("campaign", c))
            .transpose()?;
        let supplier = relocation
            .supplier
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| Supplier::parse_known("supplier", s))
            .transpose()?;
        let close = optional_date("close_previous", relocation.close_previous.as_deref())?;

        let id = self.store.transact(|records| {
            let (position, current) = query::current_state(records, code)
                .map(|(i, r)| (i, r.clone()))
                .ok_or_else(|| LedgerError::UnknownCode(code.to_string()))?;

            if let Some(exit) = close {
                if let Some(previous_entry) = current.entry.date() {
                    ordered(previous_entry, Some(exit))?;
                }
                records[position].exit = DateText::from(exit);
            }

            let moved = RollMovement {
                id: new_id(),
                code: current.code.clone(),
                location,
                reason: relocation.reason.unwrap_or(current.reason),
                planned_service: relocation.planned_service.unwrap_or(current.planned_service),
                entry: DateText::from(entry),
                exit: DateText::empty(),
                note: relocation.note.unwrap_or(current.note),
                campaign,
                supplier,
            };
            let id = moved.id.clone();
            records.push(moved);
            Ok::<_, LedgerError>(id)
        })?;

        log::info!(
            "Relocated {} to {} on {}",
            code,
            relocation.location,
            format_date(entry)
        );
        Ok(id)
    }

    /// Close the stay at `position` on `exit`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad date, or `RowNotFound`.
    pub fn close(&self, position: usize, exit: &str) -> Result<(), LedgerError> {
        let exit = required_date("exit", exit)?;
        self.store.transact(|records| {
            let len = records.len();
            let record = records
                .get_mut(position)
                .ok_or(StoreError::RowNotFound { position, len })?;
            if let Some(entry) = record.entry.date() {
                ordered(entry, Some(exit))?;
            }
            record.exit = DateText::from(exit);
            Ok::<_, LedgerError>(())
        })
    }

    /// Replace the note on the row at `position`.
    ///
    /// # Errors
    ///
    /// Returns `RowNotFound` before writing if `position` is out of range.
    pub fn edit_note(&self, position: usize, note: &str) -> Result<(), LedgerError> {
        self.store.transact(|records| {
            let len = records.len();
            let record = records
                .get_mut(position)
                .ok_or(StoreError::RowNotFound { position, len })?;
            record.note = note.trim().to_string();
            Ok::<_, LedgerError>(())
        })
    }

    /// Floor-plan markers for every active roll.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the table can't be read.
    pub fn overview(&self) -> Result<Vec<PlotMarker>, LedgerError> {
        let records = self.load()?;
        let entries: Vec<OverlayEntry> = query::active(&records)
            .into_iter()
            .map(|(_, roll)| overlay_entry(roll))
            .collect();
        Ok(self.overlay.plot(&entries))
    }

    fn listed(&self, rows: Vec<(usize, &RollMovement)>) -> Vec<Listed<RollMovement>> {
        rows.into_iter()
            .map(|(position, record)| Listed {
                position,
                derived: self.compute_derived(record),
                record: record.clone(),
            })
            .collect()
    }
}

fn overlay_entry(roll: &RollMovement) -> OverlayEntry {
    let supplier = roll
        .supplier
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    OverlayEntry {
        code: roll.code.clone(),
        location: roll.location.clone(),
        attributes: vec![
            ("Código".to_string(), roll.code.clone()),
            ("Fornecedor".to_string(), supplier),
            ("Entrada".to_string(), roll.entry.to_string()),
            ("Serviço".to_string(), roll.planned_service.clone()),
            ("Observação".to_string(), roll.note.clone()),
        ],
    }
}

impl Ledger for RollRegister {
    type Record = RollMovement;
    type Draft = RollDraft;

    fn store(&self) -> &TableStore<RollMovement> {
        &self.store
    }

    fn clock(&self) -> Clock {
        self.clock
    }

    fn build(&self, draft: RollDraft) -> Result<RollMovement, ValidationError> {
        let code = required_code(&draft.code)?;
        let location = Location::parse_known("location", &draft.location)?;
        let entry = required_date("entry", &draft.entry)?;
        let exit = optional_date("exit", draft.exit.as_deref())?;
        ordered(entry, exit)?;

        Ok(RollMovement {
            id: String::new(),
            code,
            location,
            reason: draft.reason.trim().to_string(),
            planned_service: draft.planned_service.trim().to_string(),
            entry: DateText::from(entry),
            exit: DateText::from(exit),
            note: draft.note.trim().to_string(),
            campaign: None,
            supplier: None,
        })
    }

    /// Corrections never drop what a relocation recorded.
    fn preserve_on_update(&self, previous: &RollMovement, record: &mut RollMovement) {
        record.campaign = previous.campaign.clone();
        record.supplier = previous.supplier.clone();
    }
}
