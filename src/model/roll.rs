//! `RollMovement` - one stay of a sink roll at a location

use chrono::NaiveDate;
use serde::Serialize;

use super::label::labeled_enum;
use super::Record;
use crate::derived::{days_between_at, Derived};
use crate::store::Row;
use crate::value::DateText;

/// Stored column names for the roll-register table.
pub mod columns {
    pub const ID: &str = "ID";
    pub const CODE: &str = "Codigo";
    pub const LOCATION: &str = "Localização";
    pub const REASON: &str = "Motivo da troca";
    pub const SERVICE: &str = "Serviço a realizar";
    pub const ENTRY: &str = "Entrada";
    pub const EXIT: &str = "Saída";
    pub const NOTE: &str = "Observação";
    pub const CAMPAIGN: &str = "Campanha";
    pub const SUPPLIER: &str = "Fornecedor";
}

labeled_enum! {
    /// Physical zone a sink roll can be in.
    Location {
        EmLinha => "Em linha",
        OficinaCentral => "Oficina central",
        OficinaOcp => "Oficina OCP",
        Usinagem => "Usinagem",
        Revestimento => "Revestimento",
        Baia => "Baia",
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::EmLinha
    }
}

labeled_enum! {
    /// Line campaign a roll was relocated for.
    RollCampaign {
        Nenhum => "Nenhum",
        Gi => "GI",
        Ga => "GA",
    }
}

labeled_enum! {
    /// Coating supplier recorded on relocation.
    Supplier {
        Fai => "FAI (Rev. Alpha)",
        Lbi => "LBI (Rev. ALPHA)",
    }
}

/// A roll's stay at one location.
///
/// An empty `exit` means this is where the roll is now (OPEN). Moving a roll
/// closes the previous stay and appends a new one, so the table is the roll's
/// full movement history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RollMovement {
    pub id: String,
    pub code: String,
    pub location: Location,
    pub reason: String,
    pub planned_service: String,
    pub entry: DateText,
    pub exit: DateText,
    pub note: String,
    /// Only set by relocations
    pub campaign: Option<RollCampaign>,
    /// Only set by relocations
    pub supplier: Option<Supplier>,
}

impl Record for RollMovement {
    const COLUMNS: &'static [&'static str] = &[
        columns::ID,
        columns::CODE,
        columns::LOCATION,
        columns::REASON,
        columns::SERVICE,
        columns::ENTRY,
        columns::EXIT,
        columns::NOTE,
        columns::CAMPAIGN,
        columns::SUPPLIER,
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
            code: row.text(columns::CODE).trim().to_string(),
            location: Location::from_label(row.get(columns::LOCATION)),
            reason: row.text(columns::REASON),
            planned_service: row.text(columns::SERVICE),
            entry: DateText::new(row.text(columns::ENTRY)),
            exit: DateText::new(row.text(columns::EXIT)),
            note: row.text(columns::NOTE),
            campaign: RollCampaign::from_cell(&row.text(columns::CAMPAIGN)),
            supplier: Supplier::from_cell(&row.text(columns::SUPPLIER)),
        }
    }

    fn to_row(&self, _today: NaiveDate) -> Vec<String> {
        vec![
            self.id.clone(),
            self.code.clone(),
            self.location.to_string(),
            self.reason.clone(),
            self.planned_service.clone(),
            self.entry.to_string(),
            self.exit.to_string(),
            self.note.clone(),
            self.campaign.as_ref().map(ToString::to_string).unwrap_or_default(),
            self.supplier.as_ref().map(ToString::to_string).unwrap_or_default(),
        ]
    }

    /// Days in service at this location.
    fn derive(&self, today: NaiveDate) -> Derived {
        Derived::days_only(days_between_at(
            self.entry.as_str(),
            self.exit.as_option(),
            today,
        ))
    }

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn category(&self) -> &str {
        self.location.as_str()
    }

    fn entry(&self) -> &DateText {
        &self.entry
    }

    fn exit(&self) -> &DateText {
        &self.exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::HeaderIndex;
    use csv::StringRecord;

    #[test]
    fn test_legacy_header_without_campaign_columns() {
        let index = HeaderIndex::from_columns(&[
            "ID",
            "Codigo",
            "Localização",
            "Motivo da troca",
            "Serviço a realizar",
            "Entrada",
            "Saída",
            "Observação",
        ]);
        let record = StringRecord::from(vec![
            "a1", "SR03", "Baia", "desgaste", "retífica", "2024-01-01", "", "ok",
        ]);
        let roll = RollMovement::from_row(&Row::new(&index, &record));

        assert_eq!(roll.code, "SR03");
        assert_eq!(roll.location, Location::Baia);
        assert!(roll.is_open());
        assert_eq!(roll.campaign, None);
        assert_eq!(roll.supplier, None);
    }

    #[test]
    fn test_to_row_follows_columns() {
        let roll = RollMovement {
            id: "x".to_string(),
            code: "SR04".to_string(),
            location: Location::Usinagem,
            entry: DateText::new("2024-02-01"),
            campaign: Some(RollCampaign::Gi),
            supplier: Some(Supplier::Fai),
            ..RollMovement::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        let row = roll.to_row(today);

        assert_eq!(row.len(), RollMovement::COLUMNS.len());
        assert_eq!(row[2], "Usinagem");
        assert_eq!(row[8], "GI");
        assert_eq!(row[9], "FAI (Rev. Alpha)");
        assert_eq!(roll.derive(today).days, Some(4));
    }
}
