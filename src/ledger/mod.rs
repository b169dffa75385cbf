//! Ledgers: one per dashboard page, each owning one table
//!
//! A ledger is the boundary the presentation layer talks to. It collects
//! nothing and renders nothing; it validates submissions, runs them against
//! its [`TableStore`] and hands back rows with freshly computed
//! [`Derived`] metrics.
//!
//! ## Update contract
//!
//! Two kinds of change are supported and they mean different things:
//!
//! - **Append for history.** Moving equipment (`relocate`) closes the current
//!   record if asked and appends a new record with a new identifier. Nothing
//!   is overwritten; the table is the equipment's history.
//! - **In-place edit for corrections.** [`Ledger::update`] and
//!   [`Ledger::delete`] change or remove the row at a table position. They
//!   exist to fix mistakes, and reject positions that don't exist before
//!   writing anything.

pub mod bath_equipment;
pub mod roll_register;
pub mod tension_leveller;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::config::StorageConfig;
use crate::derived::Derived;
use crate::error::{LedgerError, ValidationError};
use crate::model::{normalize_code, Record};
use crate::query::{sort_recent_first, RecordFilter};
use crate::store::TableStore;
use crate::value::{format_date, parse_date};

pub use bath_equipment::{BathDraft, BathEquipment, BathIndicators, DiameterPoint, SetDraft};
pub use roll_register::{Relocation, RollDraft, RollRegister};
pub use tension_leveller::{
    BendingSummary, LevellerDashboard, LevellerDraft, LevellerEdit, LevellerMove, TensionLeveller,
};

/// A row as shown to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listed<R> {
    /// Position in the table, used for edit/delete
    pub position: usize,
    pub record: R,
    pub derived: Derived,
}

/// Source of "today" for derived metrics and registration stamps.
///
/// Defaults to the local clock; tests pin it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    fixed: Option<NaiveDate>,
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn fixed(date: NaiveDate) -> Self {
        Self { fixed: Some(date) }
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.fixed.unwrap_or_else(crate::derived::today)
    }

    /// Current timestamp; midnight of the fixed date when pinned.
    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        match self.fixed {
            Some(date) => date.and_time(chrono::NaiveTime::MIN),
            None => Local::now().naive_local(),
        }
    }
}

/// Operations every ledger offers.
pub trait Ledger {
    type Record: Record;
    /// Fields collected by an entry or edit form
    type Draft;

    fn store(&self) -> &TableStore<Self::Record>;

    fn clock(&self) -> Clock;

    /// Validate a draft into a record ready to store.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when the draft must be rejected.
    fn build(&self, draft: Self::Draft) -> Result<Self::Record, ValidationError>;

    /// Fields of the stored row that an in-place edit must keep.
    fn preserve_on_update(&self, _previous: &Self::Record, _record: &mut Self::Record) {}

    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the table can't be read.
    fn load(&self) -> Result<Vec<Self::Record>, LedgerError> {
        Ok(self.store().load()?)
    }

    /// Metrics recomputed from the raw fields of `record`.
    fn compute_derived(&self, record: &Self::Record) -> Derived {
        record.derive(self.clock().today())
    }

    /// Rows matching `filter`, most recent entry first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the table can't be read.
    fn list(&self, filter: &RecordFilter) -> Result<Vec<Listed<Self::Record>>, LedgerError> {
        let records = self.load()?;
        let today = self.clock().today();
        let mut rows = filter.apply(&records, today);
        sort_recent_first(&mut rows);
        Ok(rows
            .into_iter()
            .map(|(position, record)| Listed {
                position,
                derived: record.derive(today),
                record: record.clone(),
            })
            .collect())
    }

    /// Validate and append a new record; returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` (nothing written) or
    /// `LedgerError::Store`.
    fn create(&self, draft: Self::Draft) -> Result<String, LedgerError> {
        let record = self.build(draft)?;
        Ok(self.store().append(record)?)
    }

    /// Correct the row at `position` in place. Its identifier is kept.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` or a `RowNotFound` store error, in
    /// both cases before anything is written.
    fn update(&self, position: usize, draft: Self::Draft) -> Result<(), LedgerError> {
        let mut record = self.build(draft)?;
        self.store().transact(|records| {
            let len = records.len();
            let slot = records
                .get_mut(position)
                .ok_or(crate::error::StoreError::RowNotFound { position, len })?;
            self.preserve_on_update(slot, &mut record);
            record.set_id(slot.id().to_string());
            *slot = record;
            Ok::<_, LedgerError>(())
        })?;
        log::info!("Updated row {} of {}", position, self.store().path().display());
        Ok(())
    }

    /// Remove the row at `position` and return it.
    ///
    /// # Errors
    ///
    /// Returns a `RowNotFound` store error (nothing written) or an I/O error.
    fn delete(&self, position: usize) -> Result<Self::Record, LedgerError> {
        Ok(self.store().delete(position)?)
    }
}

/// All three data ledgers over one storage directory.
#[derive(Debug, Clone)]
pub struct Plant {
    pub rolls: RollRegister,
    pub baths: BathEquipment,
    pub levellers: TensionLeveller,
}

impl Plant {
    #[must_use]
    pub fn open(config: &StorageConfig) -> Self {
        Self::open_with_clock(config, Clock::system())
    }

    #[must_use]
    pub fn open_with_clock(config: &StorageConfig, clock: Clock) -> Self {
        Self {
            rolls: RollRegister::from_config(config).with_clock(clock),
            baths: BathEquipment::from_config(config).with_clock(clock),
            levellers: TensionLeveller::from_config(config).with_clock(clock),
        }
    }
}

// Shared draft validation

pub(crate) fn required_code(code: &str) -> Result<String, ValidationError> {
    let code = normalize_code(code);
    if code.is_empty() {
        return Err(ValidationError::EmptyCode);
    }
    if !crate::help::is_conventional_code(&code) {
        log::warn!("Code '{}' does not follow the PREFIX+number convention", code);
    }
    Ok(code)
}

pub(crate) fn required_date(field: &'static str, text: &str) -> Result<NaiveDate, ValidationError> {
    parse_date(text).ok_or_else(|| ValidationError::InvalidDate {
        field,
        value: text.to_string(),
    })
}

/// A blank optional date is `None`; a non-blank one must parse.
pub(crate) fn optional_date(
    field: &'static str,
    text: Option<&str>,
) -> Result<Option<NaiveDate>, ValidationError> {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => required_date(field, text).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn ordered(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), ValidationError> {
    match end {
        Some(end) if end < start => Err(ValidationError::EndBeforeStart {
            start: format_date(start),
            end: format_date(end),
        }),
        _ => Ok(()),
    }
}
