//! `BathCampaign` - titular and reserve bath equipment for one campaign

use chrono::NaiveDate;
use serde::Serialize;

use super::label::labeled_enum;
use super::Record;
use crate::derived::{days_between_at, Derived};
use crate::store::Row;
use crate::value::{tolerant_decimal_parse, DateText};

/// Stored column names for the bath-equipment table.
pub mod columns {
    pub const ID: &str = "ID";
    pub const REGISTERED_AT: &str = "Data_Registro";
    pub const CAMPAIGN: &str = "Campanha";
    pub const START: &str = "Data_Inicio";
    pub const END: &str = "Data_Fim";
    pub const NOZZLE: &str = "Tromba";
    pub const NOTES: &str = "Observacoes";

    /// Per-set columns, suffixed with `_Titular` or `_Reserva`.
    pub const SET: &str = "Conjunto";
    pub const ROLL: &str = "Rolo";
    pub const DIAMETER: &str = "Diametro";
    pub const BLADE: &str = "Navalha";
    pub const BAFFLES: &str = "Baffles";

    pub const TITULAR: &str = "Titular";
    pub const RESERVE: &str = "Reserva";
}

labeled_enum! {
    /// Campaign a bath configuration serves.
    Campaign {
        Gi => "GI",
        As => "AS",
        Gl => "GL",
    }
}

impl Default for Campaign {
    fn default() -> Self {
        Campaign::Gi
    }
}

/// One equipment set (titular or reserve).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EquipmentSet {
    pub set_id: String,
    pub roll_id: String,
    /// Dot-decimal text, two fraction digits when entered through a form
    pub diameter: String,
    pub blade_id: String,
    pub baffle_id: String,
}

impl EquipmentSet {
    /// Sink-roll diameter in millimetres; `0.0` when missing or garbled.
    #[must_use]
    pub fn diameter_mm(&self) -> f64 {
        tolerant_decimal_parse(&self.diameter)
    }

    fn from_row(row: &Row<'_>, suffix: &str) -> Self {
        let cell = |base: &str| row.text(&format!("{base}_{suffix}"));
        Self {
            set_id: cell(columns::SET),
            roll_id: cell(columns::ROLL),
            diameter: cell(columns::DIAMETER).trim().to_string(),
            blade_id: cell(columns::BLADE),
            baffle_id: cell(columns::BAFFLES),
        }
    }

    fn push_cells(&self, row: &mut Vec<String>) {
        row.push(self.set_id.clone());
        row.push(self.roll_id.clone());
        row.push(self.diameter.clone());
        row.push(self.blade_id.clone());
        row.push(self.baffle_id.clone());
    }
}

/// Bath equipment configuration for one campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BathCampaign {
    pub id: String,
    /// `YYYY-MM-DD HH:MM:SS` when the row was entered
    pub registered_at: String,
    pub campaign: Campaign,
    pub start: DateText,
    pub end: DateText,
    pub titular: EquipmentSet,
    pub reserve: EquipmentSet,
    /// Secondary nozzle ("tromba"), empty when the campaign has none
    pub nozzle: String,
    pub notes: String,
}

impl Record for BathCampaign {
    const COLUMNS: &'static [&'static str] = &[
        columns::ID,
        columns::REGISTERED_AT,
        columns::CAMPAIGN,
        columns::START,
        columns::END,
        "Conjunto_Titular",
        "Rolo_Titular",
        "Diametro_Titular",
        "Navalha_Titular",
        "Baffles_Titular",
        "Conjunto_Reserva",
        "Rolo_Reserva",
        "Diametro_Reserva",
        "Navalha_Reserva",
        "Baffles_Reserva",
        columns::NOZZLE,
        columns::NOTES,
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn from_row(row: &Row<'_>) -> Self {
        Self {
            id: row.text(columns::ID).trim().to_string(),
            registered_at: row.text(columns::REGISTERED_AT).trim().to_string(),
            campaign: Campaign::from_label(row.get(columns::CAMPAIGN)),
            start: DateText::new(row.text(columns::START)),
            end: DateText::new(row.text(columns::END)),
            titular: EquipmentSet::from_row(row, columns::TITULAR),
            reserve: EquipmentSet::from_row(row, columns::RESERVE),
            nozzle: row.text(columns::NOZZLE).trim().to_string(),
            notes: row.text(columns::NOTES),
        }
    }

    fn to_row(&self, _today: NaiveDate) -> Vec<String> {
        let mut row = Vec::with_capacity(Self::COLUMNS.len());
        row.push(self.id.clone());
        row.push(self.registered_at.clone());
        row.push(self.campaign.to_string());
        row.push(self.start.to_string());
        row.push(self.end.to_string());
        self.titular.push_cells(&mut row);
        self.reserve.push_cells(&mut row);
        row.push(self.nozzle.clone());
        row.push(self.notes.clone());
        row
    }

    /// Days in the bath (end - start). No rate for this table.
    fn derive(&self, today: NaiveDate) -> Derived {
        Derived::days_only(days_between_at(
            self.start.as_str(),
            self.end.as_option(),
            today,
        ))
    }

    fn category(&self) -> &str {
        self.campaign.as_str()
    }

    fn entry(&self) -> &DateText {
        &self.start
    }

    fn exit(&self) -> &DateText {
        &self.end
    }
}
