//! Argument parsing that clap can't do on its own

use chrono::NaiveDate;
use clap::Args;
use plantlog::ledger::{BathDraft, SetDraft};
use plantlog::value::parse_date;
use plantlog::{DateWindow, RecordFilter};
use thiserror::Error;

/// Field order of an equipment set argument.
pub const SET_FORMAT: &str = "set;roll;diameter;blade;baffles";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    Date(String),

    #[error("window start {from} is after its end {to}")]
    Window { from: NaiveDate, to: NaiveDate },

    #[error("equipment set '{value}' must have 5 fields ({})", SET_FORMAT)]
    EquipmentSet { value: String },
}

/// Parse an optional date argument.
pub fn date_arg(text: Option<&str>) -> Result<Option<NaiveDate>, InputError> {
    text.map(|t| parse_date(t).ok_or_else(|| InputError::Date(t.to_string())))
        .transpose()
}

/// `--from` / `--to` into a window; `None` when neither is given.
pub fn window(from: Option<&str>, to: Option<&str>) -> Result<Option<DateWindow>, InputError> {
    let from = date_arg(from)?;
    let to = date_arg(to)?;
    match (from, to) {
        (None, None) => Ok(None),
        (Some(from), Some(to)) if from > to => Err(InputError::Window { from, to }),
        (from, to) => Ok(Some(DateWindow::new(from, to))),
    }
}

/// Common listing options.
#[derive(Debug, Clone, Default)]
pub struct FilterArgs {
    pub code: Option<String>,
    pub categories: Vec<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub search: Option<String>,
    pub open_only: bool,
}

impl FilterArgs {
    pub fn into_filter(self) -> Result<RecordFilter, InputError> {
        let mut filter = RecordFilter::new();
        if let Some(code) = self.code {
            filter = filter.code(code);
        }
        for category in self.categories {
            filter = filter.category(category);
        }
        if let Some(window) = window(self.from.as_deref(), self.to.as_deref())? {
            filter = filter.window(window);
        }
        if let Some(term) = self.search {
            filter = filter.search(term);
        }
        if self.open_only {
            filter = filter.open_only();
        }
        Ok(filter)
    }
}

/// Parse `set;roll;diameter;blade;baffles`. Empty fields are allowed.
pub fn equipment_set(text: &str) -> Result<SetDraft, InputError> {
    let fields: Vec<&str> = text.split(';').map(str::trim).collect();
    let [set_id, roll_id, diameter, blade_id, baffle_id] = fields.as_slice() else {
        return Err(InputError::EquipmentSet {
            value: text.to_string(),
        });
    };
    Ok(SetDraft {
        set_id: set_id.to_string(),
        roll_id: roll_id.to_string(),
        diameter: diameter.to_string(),
        blade_id: blade_id.to_string(),
        baffle_id: baffle_id.to_string(),
    })
}

/// Bath form fields, shared by `bath record` and `bath edit`.
#[derive(Debug, Clone, Args)]
pub struct BathArgs {
    #[arg(long)]
    pub campaign: String,
    #[arg(long)]
    pub start: String,
    #[arg(long)]
    pub end: String,
    /// Titular set as set;roll;diameter;blade;baffles
    #[arg(long)]
    pub titular: String,
    /// Reserve set as set;roll;diameter;blade;baffles
    #[arg(long)]
    pub reserve: String,
    #[arg(long, default_value = "")]
    pub nozzle: String,
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl BathArgs {
    pub fn into_draft(self) -> Result<BathDraft, InputError> {
        Ok(BathDraft {
            titular: equipment_set(&self.titular)?,
            reserve: equipment_set(&self.reserve)?,
            campaign: self.campaign,
            start: self.start,
            end: self.end,
            nozzle: self.nozzle,
            notes: self.notes,
        })
    }
}
