//! Bath equipment ledger: titular and reserve sets per campaign

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::StorageConfig;
use crate::derived::round1;
use crate::error::{LedgerError, StoreError, ValidationError};
use crate::model::{BathCampaign, Campaign, EquipmentSet, Record};
use crate::query::{self, RecordFilter};
use crate::store::{write_csv, TableStore};
use crate::value::{normalize_decimal, parse_decimal, DateText, TIMESTAMP_FORMAT};

use super::{ordered, required_date, Clock, Ledger, Listed};

/// One equipment set as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetDraft {
    pub set_id: String,
    pub roll_id: String,
    /// Millimetres; `,` or `.` as decimal separator
    pub diameter: String,
    pub blade_id: String,
    pub baffle_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BathDraft {
    pub campaign: String,
    pub start: String,
    pub end: String,
    pub titular: SetDraft,
    pub reserve: SetDraft,
    pub nozzle: String,
    pub notes: String,
}

/// Diameters of one campaign row, for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiameterPoint {
    pub campaign: Campaign,
    pub start: DateText,
    pub titular: f64,
    pub reserve: f64,
}

/// Summary figures for the indicators tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BathIndicators {
    /// Number of campaign rows considered
    pub campaigns: usize,
    pub mean_titular_diameter: Option<f64>,
    pub mean_reserve_diameter: Option<f64>,
    /// Mean days in bath per campaign label, one decimal
    pub mean_days_by_campaign: BTreeMap<String, f64>,
    pub diameter_series: Vec<DiameterPoint>,
}

#[derive(Debug, Clone)]
pub struct BathEquipment {
    store: TableStore<BathCampaign>,
    clock: Clock,
}

impl BathEquipment {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: TableStore::new(path),
            clock: Clock::system(),
        }
    }

    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.bath_path())
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Record the equipment used for a campaign.
    ///
    /// # Errors
    ///
    /// See [`Ledger::create`].
    pub fn record(&self, draft: BathDraft) -> Result<String, LedgerError> {
        let id = self.create(draft)?;
        log::info!("Recorded bath campaign {}", id);
        Ok(id)
    }

    /// Campaign rows matching `filter`, latest start first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the table can't be read.
    pub fn history(&self, filter: &RecordFilter) -> Result<Vec<Listed<BathCampaign>>, LedgerError> {
        self.list(filter)
    }

    /// Rows where any column contains `term`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the table can't be read.
    pub fn search(&self, term: &str) -> Result<Vec<Listed<BathCampaign>>, LedgerError> {
        self.list(&RecordFilter::new().search(term))
    }

    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the table can't be read.
    pub fn indicators(&self, filter: &RecordFilter) -> Result<BathIndicators, LedgerError> {
        let records = self.load()?;
        let today = self.clock.today();
        let rows: Vec<&BathCampaign> = filter
            .apply(&records, today)
            .into_iter()
            .map(|(_, r)| r)
            .collect();

        let mean_days_by_campaign = query::grouped_mean(
            rows.iter().copied(),
            |r: &BathCampaign| r.campaign.to_string(),
            // Campaigns without an end date stay out of the mean
            |r: &BathCampaign| r.end.as_option().and(r.derive(today).days).map(|d| d as f64),
        )
        .into_iter()
        .map(|(campaign, days)| (campaign, round1(days)))
        .collect();

        Ok(BathIndicators {
            campaigns: rows.len(),
            mean_titular_diameter: query::mean(rows.iter().map(|r| r.titular.diameter_mm())),
            mean_reserve_diameter: query::mean(rows.iter().map(|r| r.reserve.diameter_mm())),
            mean_days_by_campaign,
            diameter_series: rows
                .iter()
                .map(|r| DiameterPoint {
                    campaign: r.campaign.clone(),
                    start: r.start.clone(),
                    titular: r.titular.diameter_mm(),
                    reserve: r.reserve.diameter_mm(),
                })
                .collect(),
        })
    }

    /// Write the rows matching `filter` as CSV, in history order, using the
    /// stored column layout.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the table can't be read or `writer`
    /// fails.
    pub fn export<W: Write>(&self, filter: &RecordFilter, writer: W) -> Result<usize, LedgerError> {
        let rows: Vec<BathCampaign> = self.history(filter)?.into_iter().map(|l| l.record).collect();
        write_csv(&rows, writer, self.clock.today()).map_err(|source| StoreError::Csv {
            path: self.store.path().to_path_buf(),
            source,
        })?;
        Ok(rows.len())
    }
}

fn equipment_set(draft: SetDraft, field: &'static str) -> Result<EquipmentSet, ValidationError> {
    let diameter = match draft.diameter.trim() {
        "" => String::new(),
        text => match parse_decimal(text) {
            Some(mm) if mm >= 0.0 => normalize_decimal(text, 2),
            _ => {
                return Err(ValidationError::InvalidDecimal {
                    field,
                    value: text.to_string(),
                })
            }
        },
    };
    Ok(EquipmentSet {
        set_id: draft.set_id.trim().to_string(),
        roll_id: draft.roll_id.trim().to_string(),
        diameter,
        blade_id: draft.blade_id.trim().to_string(),
        baffle_id: draft.baffle_id.trim().to_string(),
    })
}

impl Ledger for BathEquipment {
    type Record = BathCampaign;
    type Draft = BathDraft;

    fn store(&self) -> &TableStore<BathCampaign> {
        &self.store
    }

    fn clock(&self) -> Clock {
        self.clock
    }

    fn build(&self, draft: BathDraft) -> Result<BathCampaign, ValidationError> {
        let campaign = Campaign::parse_known("campaign", &draft.campaign)?;
        let start = required_date("start", &draft.start)?;
        let end = required_date("end", &draft.end)?;
        ordered(start, Some(end))?;

        Ok(BathCampaign {
            id: String::new(),
            registered_at: self.clock.now().format(TIMESTAMP_FORMAT).to_string(),
            campaign,
            start: DateText::from(start),
            end: DateText::from(end),
            titular: equipment_set(draft.titular, "titular diameter")?,
            reserve: equipment_set(draft.reserve, "reserve diameter")?,
            nozzle: draft.nozzle.trim().to_string(),
            notes: draft.notes.trim().to_string(),
        })
    }

    fn preserve_on_update(&self, previous: &BathCampaign, record: &mut BathCampaign) {
        record.registered_at = previous.registered_at.clone();
    }
}
